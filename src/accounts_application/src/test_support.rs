//! In-memory doubles shared by the use case tests.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use accounts_core::{
    AccountStatus, AccountType, DisabilityType, Email, HasherError, IdGenerator, LockoutPolicy,
    PasswordHash, PasswordHasher, RepositoryError, UserAccount, UserAccountFilter, UserAccountRepository,
    Username,
};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

pub(crate) const STRONG_PASSWORD: &str = "Str0ng!Pass";

#[derive(Clone, Default)]
pub(crate) struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<String, UserAccount>>>,
}

impl MockAccountRepository {
    pub(crate) async fn seed(&self, account: UserAccount) {
        self.accounts
            .write()
            .await
            .insert(account.id().to_owned(), account);
    }

    pub(crate) async fn get(&self, id: &str) -> UserAccount {
        self.accounts.read().await.get(id).cloned().unwrap()
    }

    async fn select<P>(&self, predicate: P) -> Vec<UserAccount>
    where
        P: Fn(&UserAccount) -> bool,
    {
        self.accounts
            .read()
            .await
            .values()
            .filter(|a| predicate(a))
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl UserAccountRepository for MockAccountRepository {
    async fn create(&self, account: UserAccount) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(account.id()) {
            return Err(RepositoryError::AlreadyExists);
        }
        let live = accounts.values().filter(|a| !a.is_soft_deleted());
        for existing in live {
            if existing.username() == account.username() {
                return Err(RepositoryError::DuplicateUsername);
            }
            if existing.email() == account.email() {
                return Err(RepositoryError::DuplicateEmail);
            }
        }
        accounts.insert(account.id().to_owned(), account);
        Ok(())
    }

    async fn update(
        &self,
        account: &UserAccount,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts
            .get_mut(account.id())
            .ok_or(RepositoryError::NotFound)?;
        if stored.updated_at() != expected_updated_at {
            return Err(RepositoryError::Conflict);
        }
        *stored = account.clone();
        Ok(())
    }

    async fn delete(&self, id: &str, deleted_by: &str) -> Result<(), RepositoryError> {
        let mut accounts = self.accounts.write().await;
        let stored = accounts.get_mut(id).ok_or(RepositoryError::NotFound)?;
        stored.delete(deleted_by)?;
        Ok(())
    }

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
        self.accounts
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_username(&self, username: &Username) -> Result<UserAccount, RepositoryError> {
        self.select(|a| a.username() == username && !a.is_soft_deleted())
            .await
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_email(&self, email: &Email) -> Result<UserAccount, RepositoryError> {
        self.select(|a| a.email() == email && !a.is_soft_deleted())
            .await
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find(&self, filter: &UserAccountFilter) -> Result<Vec<UserAccount>, RepositoryError> {
        filter.validate()?;
        let mut accounts = self
            .select(|a| filter.status.is_none_or(|s| a.status() == s))
            .await;
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(accounts
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &UserAccountFilter) -> Result<u64, RepositoryError> {
        filter.validate()?;
        let matching = self
            .select(|a| filter.status.is_none_or(|s| a.status() == s))
            .await;
        Ok(matching.len() as u64)
    }

    async fn find_page(
        &self,
        filter: &UserAccountFilter,
    ) -> Result<(Vec<UserAccount>, u64), RepositoryError> {
        let total = self.count(filter).await?;
        Ok((self.find(filter).await?, total))
    }

    async fn exists_by_id(&self, id: &str) -> Result<bool, RepositoryError> {
        Ok(self.accounts.read().await.contains_key(id))
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, RepositoryError> {
        Ok(self.find_by_username(username).await.is_ok())
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, RepositoryError> {
        Ok(self.find_by_email(email).await.is_ok())
    }

    async fn find_active_by_email(&self, email: &Email) -> Result<UserAccount, RepositoryError> {
        self.select(|a| a.email() == email && a.is_active())
            .await
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_verified_by_username(
        &self,
        username: &Username,
    ) -> Result<UserAccount, RepositoryError> {
        self.select(|a| a.username() == username && a.is_verified() && !a.is_soft_deleted())
            .await
            .pop()
            .ok_or(RepositoryError::NotFound)
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
            .select(|a| a.deleted_at().is_some_and(|at| at < deleted_before))
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
                a.is_active() && a.last_login_at().unwrap_or(a.created_at()) < inactive_since
            })
            .await)
    }
}

/// Stores passwords as `plain$<raw>`.
#[derive(Clone, Default)]
pub(crate) struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, raw: &Secret<String>) -> Result<PasswordHash, HasherError> {
        Ok(PasswordHash::from(format!("plain${}", raw.expose_secret())))
    }

    fn compare(&self, raw: &Secret<String>, encoded: &PasswordHash) -> Result<bool, HasherError> {
        Ok(encoded.as_ref().expose_secret() == &format!("plain${}", raw.expose_secret()))
    }
}

#[derive(Clone, Default)]
pub(crate) struct BrokenHasher;

impl PasswordHasher for BrokenHasher {
    fn hash(&self, _raw: &Secret<String>) -> Result<PasswordHash, HasherError> {
        Err(HasherError::Hashing("hasher offline".to_owned()))
    }

    fn compare(&self, _raw: &Secret<String>, _encoded: &PasswordHash) -> Result<bool, HasherError> {
        Err(HasherError::MalformedHash("hasher offline".to_owned()))
    }
}

#[derive(Clone, Default)]
pub(crate) struct SequentialIds(Arc<AtomicU64>);

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        format!("acc-{}", self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

pub(crate) fn secret(raw: &str) -> Secret<String> {
    Secret::new(raw.to_owned())
}

pub(crate) fn pending_account(id: &str, username: &str, account_type: AccountType) -> UserAccount {
    let hash = PlainHasher.hash(&secret(STRONG_PASSWORD)).unwrap();
    UserAccount::new_with_hash(
        id,
        username,
        &format!("{username}@example.com"),
        hash,
        account_type,
        "admin-1",
    )
    .unwrap()
}

pub(crate) fn active_account(id: &str, username: &str) -> UserAccount {
    let mut account = pending_account(id, username, AccountType::Internal);
    account.verify("admin-1").unwrap();
    account
}
