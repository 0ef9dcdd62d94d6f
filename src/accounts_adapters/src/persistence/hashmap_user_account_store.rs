use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use accounts_core::{
    AccountStatus, DisabilityType, Email, LockoutPolicy, OrderBy, RepositoryError, SortOrder,
    UserAccount, UserAccountFilter, UserAccountRepository, Username,
};
use chrono::{DateTime, Utc};

/// In-memory account repository keyed by account id.
///
/// Usernames and emails are unique among accounts that are not soft deleted.
#[derive(Default, Clone)]
pub struct HashMapUserAccountStore {
    accounts: Arc<RwLock<HashMap<String, UserAccount>>>,
}

impl HashMapUserAccountStore {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn select<P>(&self, predicate: P) -> Vec<UserAccount>
    where
        P: Fn(&UserAccount) -> bool,
    {
        self.accounts
            .read()
            .await
            .values()
            .filter(|account| predicate(account))
            .cloned()
            .collect()
    }

    async fn select_one<P>(&self, predicate: P) -> Result<UserAccount, RepositoryError>
    where
        P: Fn(&UserAccount) -> bool,
    {
        self.accounts
            .read()
            .await
            .values()
            .find(|account| predicate(account))
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

fn ensure_unique(
    accounts: &HashMap<String, UserAccount>,
    candidate: &UserAccount,
) -> Result<(), RepositoryError> {
    let others = accounts
        .values()
        .filter(|a| a.id() != candidate.id() && !a.is_soft_deleted());
    for other in others {
        if other.username() == candidate.username() {
            return Err(RepositoryError::DuplicateUsername);
        }
        if other.email() == candidate.email() {
            return Err(RepositoryError::DuplicateEmail);
        }
    }
    Ok(())
}

/// Without an explicit status, soft-deleted accounts are left out.
fn matches_filter(account: &UserAccount, filter: &UserAccountFilter) -> bool {
    if let Some(search) = filter.search.as_deref() {
        let needle = search.trim().to_lowercase();
        if !needle.is_empty()
            && !account.username().as_str().to_lowercase().contains(&needle)
            && !account.email().as_str().contains(&needle)
        {
            return false;
        }
    }

    let status_matches = match filter.status {
        Some(status) => account.status() == status,
        None => !account.is_soft_deleted(),
    };

    status_matches
        && filter
            .account_type
            .is_none_or(|t| account.account_type() == t)
        && filter
            .disability_type
            .is_none_or(|d| account.disability_type() == Some(d))
        && filter.is_verified.is_none_or(|v| account.is_verified() == v)
        && filter.created_after.is_none_or(|t| account.created_at() >= t)
        && filter.created_before.is_none_or(|t| account.created_at() <= t)
}

/// Sorted page of the matches plus the total match count
fn page_of(
    accounts: &HashMap<String, UserAccount>,
    filter: &UserAccountFilter,
) -> (Vec<UserAccount>, u64) {
    let mut matching: Vec<&UserAccount> = accounts
        .values()
        .filter(|a| matches_filter(a, filter))
        .collect();
    let total = matching.len() as u64;

    let order_by = filter.order_by();
    matching.sort_by(|a, b| match filter.sort_order() {
        SortOrder::Asc => compare_by(order_by, a, b),
        SortOrder::Desc => compare_by(order_by, b, a),
    });
    let page = matching
        .into_iter()
        .skip(filter.offset as usize)
        .take(filter.limit as usize)
        .cloned()
        .collect();
    (page, total)
}

fn compare_by(order_by: OrderBy, a: &UserAccount, b: &UserAccount) -> Ordering {
    let primary = match order_by {
        OrderBy::CreatedAt => a.created_at().cmp(&b.created_at()),
        OrderBy::Username => a.username().cmp(b.username()),
        OrderBy::LastLoginAt => a.last_login_at().cmp(&b.last_login_at()),
        OrderBy::Email => a.email().cmp(b.email()),
        OrderBy::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
    };
    primary.then_with(|| a.id().cmp(b.id()))
}

#[async_trait::async_trait]
impl UserAccountRepository for HashMapUserAccountStore {
    #[tracing::instrument(name = "Adding account to memory store", skip_all)]
    async fn create(&self, account: UserAccount) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(account.id()) {
            return Err(RepositoryError::AlreadyExists);
        }
        ensure_unique(&accounts, &account)?;

        accounts.insert(account.id().to_owned(), account);
        Ok(())
    }

    #[tracing::instrument(name = "Updating account in memory store", skip_all)]
    async fn update(
        &self,
        account: &UserAccount,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .get(account.id())
            .ok_or(RepositoryError::NotFound)?;
        if stored.updated_at() != expected_updated_at {
            return Err(RepositoryError::Conflict);
        }
        if !account.is_soft_deleted() {
            ensure_unique(&accounts, account)?;
        }

        accounts.insert(account.id().to_owned(), account.clone());
        Ok(())
    }

    #[tracing::instrument(name = "Soft deleting account in memory store", skip(self))]
    async fn delete(&self, id: &str, deleted_by: &str) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts.get_mut(id).ok_or(RepositoryError::NotFound)?;
        stored.delete(deleted_by)?;
        Ok(())
    }

    #[tracing::instrument(name = "Recording failed login in memory store", skip(self, policy))]
    async fn record_failed_login(
        &self,
        id: &str,
        ip_address: &str,
        policy: &LockoutPolicy,
    ) -> Result<UserAccount, RepositoryError> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts.get_mut(id).ok_or(RepositoryError::NotFound)?;
        stored.record_failed_login_with(ip_address, policy)?;
        Ok(stored.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<UserAccount, RepositoryError> {
        let accounts = self.accounts.read().await;
        accounts.get(id).cloned().ok_or(RepositoryError::NotFound)
    }

    async fn find_by_username(&self, username: &Username) -> Result<UserAccount, RepositoryError> {
        self.select_one(|a| a.username() == username && !a.is_soft_deleted())
            .await
    }

    async fn find_by_email(&self, email: &Email) -> Result<UserAccount, RepositoryError> {
        self.select_one(|a| a.email() == email && !a.is_soft_deleted())
            .await
    }

    #[tracing::instrument(name = "Listing accounts from memory store", skip(self))]
    async fn find(&self, filter: &UserAccountFilter) -> Result<Vec<UserAccount>, RepositoryError> {
        filter.validate()?;
        let (page, _) = page_of(&*self.accounts.read().await, filter);
        Ok(page)
    }

    async fn count(&self, filter: &UserAccountFilter) -> Result<u64, RepositoryError> {
        filter.validate()?;
        let accounts = self.accounts.read().await;
        let total = accounts
            .values()
            .filter(|a| matches_filter(a, filter))
            .count();
        Ok(total as u64)
    }

    #[tracing::instrument(name = "Paging accounts from memory store", skip(self))]
    async fn find_page(
        &self,
        filter: &UserAccountFilter,
    ) -> Result<(Vec<UserAccount>, u64), RepositoryError> {
        filter.validate()?;
        Ok(page_of(&*self.accounts.read().await, filter))
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.accounts.read().await.contains_key(id))
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, RepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .any(|a| a.username() == username && !a.is_soft_deleted()))
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .any(|a| a.email() == email && !a.is_soft_deleted()))
    }

    async fn find_active_by_email(&self, email: &Email) -> Result<UserAccount, RepositoryError> {
        self.select_one(|a| a.email() == email && a.is_active())
            .await
    }

    async fn find_verified_by_username(
        &self,
        username: &Username,
    ) -> Result<UserAccount, RepositoryError> {
        self.select_one(|a| a.username() == username && a.is_verified() && !a.is_soft_deleted())
            .await
    }

    async fn find_expired_accounts(
        &self,
        expired_before: DateTime<Utc>,
    ) -> Result<Vec<UserAccount>, RepositoryError> {
        Ok(self
            .select(|a| a.is_expired() && a.updated_at() < expired_before)
            .await)
    }

    async fn find_accounts_for_cleanup(
        &self,
        deleted_before: DateTime<Utc>,
    ) -> Result<Vec<UserAccount>, RepositoryError> {
        Ok(self
            .select(|a| {
                a.is_soft_deleted() && a.deleted_at().is_some_and(|at| at < deleted_before)
            })
            .await)
    }

    async fn find_disabled_accounts(
        &self,
        disability_type: Option<DisabilityType>,
    ) -> Result<Vec<UserAccount>, RepositoryError> {
        Ok(self
            .select(|a| {
                a.status() == AccountStatus::Disabled
                    && disability_type.is_none_or(|d| a.disability_type() == Some(d))
            })
            .await)
    }

    async fn find_inactive_accounts(
        &self,
        inactive_since: DateTime<Utc>,
    ) -> Result<Vec<UserAccount>, RepositoryError> {
        Ok(self
            .select(|a| {
                let last_activity = a.last_login_at().unwrap_or_else(|| a.created_at());
                a.is_active() && last_activity < inactive_since
            })
            .await)
    }
}
