use accounts_core::{
    AccountStatus, Email, HasherError, LockoutPolicy, PasswordHasher, RepositoryError,
    UserAccount, UserAccountError, UserAccountRepository, Username,
};
use chrono::{DateTime, Utc};
use secrecy::Secret;

use crate::hashing::verify_password_hash;

/// What the caller typed into the login form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Username(Username),
    Email(Email),
}

impl LoginIdentifier {
    /// Anything containing `@` is treated as an email address.
    pub fn parse(raw: &str) -> Result<Self, UserAccountError> {
        if raw.contains('@') {
            Ok(Self::Email(Email::parse(raw)?))
        } else {
            Ok(Self::Username(Username::parse(raw)?))
        }
    }
}

/// Error types specific to login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is locked until {until}")]
    Locked { until: DateTime<Utc> },
    #[error("Account cannot log in while {0}")]
    NotAllowed(AccountStatus),
    #[error("Account error: {0}")]
    AccountError(#[from] UserAccountError),
    #[error("Password hasher error: {0}")]
    HasherError(#[from] HasherError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Login use case - checks credentials and tracks attempts
pub struct LoginUseCase<R, H>
where
    R: UserAccountRepository,
    H: PasswordHasher + Clone + 'static,
{
    repository: R,
    hasher: H,
    lockout_policy: LockoutPolicy,
}

impl<R, H> LoginUseCase<R, H>
where
    R: UserAccountRepository,
    H: PasswordHasher + Clone + 'static,
{
    pub fn new(repository: R, hasher: H, lockout_policy: LockoutPolicy) -> Self {
        Self {
            repository,
            hasher,
            lockout_policy,
        }
    }

    /// Execute the login use case
    ///
    /// # Arguments
    /// * `identifier` - Username or email of the account
    /// * `password` - Password candidate
    /// * `ip_address` - Client address recorded on the account
    ///
    /// # Returns
    /// The account after the successful login was recorded
    ///
    /// Unknown and deleted accounts are reported as `InvalidCredentials`. A
    /// wrong password counts towards the lockout policy even when the account
    /// could not log in anyway.
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        identifier: LoginIdentifier,
        password: Secret<String>,
        ip_address: &str,
    ) -> Result<UserAccount, LoginError> {
        let mut account = match self.lookup(&identifier).await {
            Ok(account) if !account.is_soft_deleted() => account,
            Ok(_) | Err(RepositoryError::NotFound) => return Err(LoginError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if account.is_locked_at(Utc::now()) {
            if let Some(until) = account.locked_until() {
                tracing::warn!(account_id = %account.id(), "login attempt on locked account");
                return Err(LoginError::Locked { until });
            }
        }

        let expected_updated_at = account.updated_at();
        let matched =
            verify_password_hash(&self.hasher, account.password_hash().clone(), password).await?;

        // Failures are counted by the store against its own copy; a success
        // still needs the copy it was checked against to be current.

        if !matched {
            let recorded = self
                .repository
                .record_failed_login(account.id(), ip_address, &self.lockout_policy)
                .await
                .map_err(|e| match e {
                    RepositoryError::Domain(e) => LoginError::AccountError(e),
                    e => LoginError::RepositoryError(e),
                })?;
            tracing::warn!(
                account_id = %recorded.id(),
                failed_attempts = recorded.failed_login_attempts(),
                locked = recorded.is_locked(),
                "failed login"
            );
            return Err(LoginError::InvalidCredentials);
        }

        if !account.can_login() {
            return Err(LoginError::NotAllowed(account.status()));
        }

        account.record_successful_login(ip_address)?;
        self.repository.update(&account, expected_updated_at).await?;
        tracing::info!(account_id = %account.id(), "login succeeded");
        Ok(account)
    }

    async fn lookup(&self, identifier: &LoginIdentifier) -> Result<UserAccount, RepositoryError> {
        match identifier {
            LoginIdentifier::Username(username) => self.repository.find_by_username(username).await,
            LoginIdentifier::Email(email) => self.repository.find_by_email(email).await,
        }
    }
}
