use accounts_core::{
    HasherError, PasswordError, PasswordHasher, RepositoryError, UserAccount, UserAccountError,
    UserAccountRepository, validate_password,
};
use secrecy::{ExposeSecret, Secret};

use crate::hashing::{compute_password_hash, verify_password_hash};

/// Error types specific to change password use case
#[derive(Debug, thiserror::Error)]
pub enum ChangePasswordError {
    #[error("Current password is incorrect")]
    InvalidCredentials,
    #[error("Password rejected: {0}")]
    InvalidPassword(#[from] PasswordError),
    #[error("Account error: {0}")]
    AccountError(#[from] UserAccountError),
    #[error("Password hasher error: {0}")]
    HasherError(#[from] HasherError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Change password use case - handles password updates
pub struct ChangePasswordUseCase<R, H>
where
    R: UserAccountRepository,
    H: PasswordHasher + Clone + 'static,
{
    repository: R,
    hasher: H,
}

impl<R, H> ChangePasswordUseCase<R, H>
where
    R: UserAccountRepository,
    H: PasswordHasher + Clone + 'static,
{
    pub fn new(repository: R, hasher: H) -> Self {
        Self { repository, hasher }
    }

    /// Change the password of an account holder who knows the current one
    ///
    /// # Arguments
    /// * `account_id` - Account to update
    /// * `current_password` - Must match the stored hash
    /// * `new_password` - Must satisfy the password policy and differ from the current one
    #[tracing::instrument(
        name = "ChangePasswordUseCase::execute",
        skip(self, current_password, new_password)
    )]
    pub async fn execute(
        &self,
        account_id: &str,
        current_password: Secret<String>,
        new_password: Secret<String>,
    ) -> Result<(), ChangePasswordError> {
        let account = self.repository.find_by_id(account_id).await?;

        let current_matches =
            verify_password_hash(&self.hasher, account.password_hash().clone(), current_password)
                .await?;
        if !current_matches {
            tracing::warn!("password change with wrong current password");
            return Err(ChangePasswordError::InvalidCredentials);
        }

        self.replace(account, new_password).await
    }

    /// Administrative reset, no current password needed
    #[tracing::instrument(name = "ChangePasswordUseCase::reset", skip(self, new_password))]
    pub async fn reset(
        &self,
        account_id: &str,
        new_password: Secret<String>,
    ) -> Result<(), ChangePasswordError> {
        let account = self.repository.find_by_id(account_id).await?;
        self.replace(account, new_password).await
    }

    async fn replace(
        &self,
        mut account: UserAccount,
        new_password: Secret<String>,
    ) -> Result<(), ChangePasswordError> {
        validate_password(new_password.expose_secret())?;

        let reused = verify_password_hash(
            &self.hasher,
            account.password_hash().clone(),
            new_password.clone(),
        )
        .await?;
        if reused {
            return Err(UserAccountError::NoChange.into());
        }

        let new_hash = compute_password_hash(&self.hasher, new_password).await?;
        let expected_updated_at = account.updated_at();
        account.update_password_hash(new_hash.as_ref().clone())?;
        self.repository.update(&account, expected_updated_at).await?;

        tracing::info!(account_id = %account.id(), "password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        MockAccountRepository, PlainHasher, STRONG_PASSWORD, active_account, secret,
    };

    const NEW_PASSWORD: &str = "N3w!Passw0rd";

    async fn setup() -> (
        MockAccountRepository,
        ChangePasswordUseCase<MockAccountRepository, PlainHasher>,
    ) {
        let repository = MockAccountRepository::default();
        repository.seed(active_account("acc-1", "alice")).await;
        let use_case = ChangePasswordUseCase::new(repository.clone(), PlainHasher);
        (repository, use_case)
    }

    async fn stored_password_is(repository: &MockAccountRepository, raw: &str) -> bool {
        repository
            .get("acc-1")
            .await
            .password_hash()
            .compare(&secret(raw), &PlainHasher)
            .unwrap()
    }

    #[tokio::test]
    async fn test_change_password() {
        let (repository, use_case) = setup().await;

        use_case
            .execute("acc-1", secret(STRONG_PASSWORD), secret(NEW_PASSWORD))
            .await
            .unwrap();

        assert!(stored_password_is(&repository, NEW_PASSWORD).await);
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let (repository, use_case) = setup().await;

        let result = use_case
            .execute("acc-1", secret("Wr0ng!pass"), secret(NEW_PASSWORD))
            .await;

        assert!(matches!(result, Err(ChangePasswordError::InvalidCredentials)));
        assert!(stored_password_is(&repository, STRONG_PASSWORD).await);
    }

    #[tokio::test]
    async fn test_change_password_policy_and_reuse() {
        let (repository, use_case) = setup().await;

        let weak = use_case
            .execute("acc-1", secret(STRONG_PASSWORD), secret("short"))
            .await;
        assert!(matches!(
            weak,
            Err(ChangePasswordError::InvalidPassword(PasswordError::TooShort))
        ));

        let reused = use_case
            .execute("acc-1", secret(STRONG_PASSWORD), secret(STRONG_PASSWORD))
            .await;
        assert!(matches!(
            reused,
            Err(ChangePasswordError::AccountError(UserAccountError::NoChange))
        ));
        assert!(stored_password_is(&repository, STRONG_PASSWORD).await);
    }

    #[tokio::test]
    async fn test_reset_password() {
        let (repository, use_case) = setup().await;

        use_case.reset("acc-1", secret(NEW_PASSWORD)).await.unwrap();

        assert!(stored_password_is(&repository, NEW_PASSWORD).await);
    }
}
