use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    domain::{
        disability::DisabilityType,
        email::Email,
        lockout::LockoutPolicy,
        user_account::{UserAccount, UserAccountError},
        username::Username,
    },
    ports::filter::{FilterError, UserAccountFilter},
};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("User account already exists")]
    AlreadyExists,
    #[error("Username is already taken")]
    DuplicateUsername,
    #[error("Email is already registered")]
    DuplicateEmail,
    #[error("User account not found")]
    NotFound,
    #[error("User account was modified concurrently")]
    Conflict,
    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] FilterError),
    #[error(transparent)]
    Domain(#[from] UserAccountError),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for RepositoryError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyExists, Self::AlreadyExists) => true,
            (Self::DuplicateUsername, Self::DuplicateUsername) => true,
            (Self::DuplicateEmail, Self::DuplicateEmail) => true,
            (Self::NotFound, Self::NotFound) => true,
            (Self::Conflict, Self::Conflict) => true,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::Domain(a), Self::Domain(b)) => a == b,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Persistence port for the account aggregate.
///
/// Implementations receive fully validated aggregates and must store them as
/// they are. Writers are serialized with optimistic concurrency: `update`
/// takes the `updated_at` the caller loaded and fails with
/// [`RepositoryError::Conflict`] if the stored copy has moved on since.
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    // Commands
    async fn create(&self, account: UserAccount) -> Result<(), RepositoryError>;
    async fn update(
        &self,
        account: &UserAccount,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    /// Soft delete through the aggregate's own `delete` transition.
    async fn delete(&self, id: &str, deleted_by: &str) -> Result<(), RepositoryError>;
    /// Counts a failed login against the stored copy while holding the write
    /// side, so concurrent failures all land. Returns the updated account.
    async fn record_failed_login(
        &self,
        id: &str,
        ip_address: &str,
        policy: &LockoutPolicy,
    ) -> Result<UserAccount, RepositoryError>;

    // Single lookups
    async fn find_by_id(&self, id: &str) -> Result<UserAccount, RepositoryError>;
    async fn find_by_username(&self, username: &Username) -> Result<UserAccount, RepositoryError>;
    async fn find_by_email(&self, email: &Email) -> Result<UserAccount, RepositoryError>;

    // Filtered listing
    async fn find(&self, filter: &UserAccountFilter) -> Result<Vec<UserAccount>, RepositoryError>;
    async fn count(&self, filter: &UserAccountFilter) -> Result<u64, RepositoryError>;
    /// One page and the total number of matches, taken from the same snapshot.
    async fn find_page(
        &self,
        filter: &UserAccountFilter,
    ) -> Result<(Vec<UserAccount>, u64), RepositoryError>;

    // Existence checks
    async fn exists_by_id(&self, id: &str) -> Result<bool, RepositoryError>;
    async fn exists_by_username(&self, username: &Username) -> Result<bool, RepositoryError>;
    async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError>;

    // Specialized queries
    async fn find_active_by_email(&self, email: &Email) -> Result<UserAccount, RepositoryError>;
    async fn find_verified_by_username(
        &self,
        username: &Username,
    ) -> Result<UserAccount, RepositoryError>;
    /// Accounts disabled as expired whose last change predates `expired_before`.
    async fn find_expired_accounts(
        &self,
        expired_before: DateTime<Utc>,
    ) -> Result<Vec<UserAccount>, RepositoryError>;
    /// Soft-deleted accounts deleted before `deleted_before`.
    async fn find_accounts_for_cleanup(
        &self,
        deleted_before: DateTime<Utc>,
    ) -> Result<Vec<UserAccount>, RepositoryError>;

    // Disability queries
    async fn find_disabled_accounts(
        &self,
        disability_type: Option<DisabilityType>,
    ) -> Result<Vec<UserAccount>, RepositoryError>;
    async fn find_suspended_accounts(&self) -> Result<Vec<UserAccount>, RepositoryError> {
        self.find_disabled_accounts(Some(DisabilityType::Suspended))
            .await
    }
    async fn find_blocked_accounts(&self) -> Result<Vec<UserAccount>, RepositoryError> {
        self.find_disabled_accounts(Some(DisabilityType::Blocked))
            .await
    }
    /// Active accounts with no login (or, never having logged in, no
    /// creation) since `inactive_since`.
    async fn find_inactive_accounts(
        &self,
        inactive_since: DateTime<Utc>,
    ) -> Result<Vec<UserAccount>, RepositoryError>;
}
