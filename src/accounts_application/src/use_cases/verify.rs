use accounts_core::{RepositoryError, UserAccount, UserAccountError, UserAccountRepository};

use super::apply_transition;

#[derive(Debug, thiserror::Error)]
pub enum VerifyAccountError {
    #[error("Verification rejected: {0}")]
    AccountError(#[from] UserAccountError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Moves pending accounts to `Active`
pub struct VerifyAccountUseCase<R>
where
    R: UserAccountRepository,
{
    repository: R,
}

impl<R> VerifyAccountUseCase<R>
where
    R: UserAccountRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Verification performed by `verifier_id` on someone else's account
    #[tracing::instrument(name = "VerifyAccountUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        account_id: &str,
        verifier_id: &str,
    ) -> Result<UserAccount, VerifyAccountError> {
        let account = apply_transition::<VerifyAccountError, _, _>(
            &self.repository,
            account_id,
            |account| account.verify(verifier_id),
        )
        .await?;
        tracing::info!("account verified");
        Ok(account)
    }

    /// Verification by the account holder, only allowed for membership accounts
    #[tracing::instrument(name = "VerifyAccountUseCase::execute_self_verification", skip(self))]
    pub async fn execute_self_verification(
        &self,
        account_id: &str,
    ) -> Result<UserAccount, VerifyAccountError> {
        let account = apply_transition::<VerifyAccountError, _, _>(
            &self.repository,
            account_id,
            UserAccount::self_verify,
        )
        .await?;
        tracing::info!("account self-verified");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockAccountRepository, pending_account};
    use accounts_core::{AccountStatus, AccountType, SELF_REGISTRATION};

    #[tokio::test]
    async fn test_verify_activates_pending_account() {
        let repository = MockAccountRepository::default();
        repository
            .seed(pending_account("acc-1", "alice", AccountType::Internal))
            .await;
        let use_case = VerifyAccountUseCase::new(repository.clone());

        let account = use_case.execute("acc-1", "admin-2").await.unwrap();

        assert_eq!(account.status(), AccountStatus::Active);
        assert_eq!(account.verified_by(), Some("admin-2"));
        assert_eq!(repository.get("acc-1").await.status(), AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_verify_twice_fails_without_changes() {
        let repository = MockAccountRepository::default();
        repository
            .seed(pending_account("acc-1", "alice", AccountType::Internal))
            .await;
        let use_case = VerifyAccountUseCase::new(repository.clone());
        use_case.execute("acc-1", "admin-2").await.unwrap();
        let before = repository.get("acc-1").await.updated_at();

        let result = use_case.execute("acc-1", "admin-3").await;

        assert!(matches!(
            result,
            Err(VerifyAccountError::AccountError(UserAccountError::AlreadyVerified))
        ));
        let stored = repository.get("acc-1").await;
        assert_eq!(stored.verified_by(), Some("admin-2"));
        assert_eq!(stored.updated_at(), before);
    }

    #[tokio::test]
    async fn test_self_verification_by_type() {
        let repository = MockAccountRepository::default();
        repository
            .seed(pending_account("member", "member", AccountType::Membership))
            .await;
        repository
            .seed(pending_account("partner", "partner", AccountType::Partner))
            .await;
        let use_case = VerifyAccountUseCase::new(repository.clone());

        let member = use_case.execute_self_verification("member").await.unwrap();
        assert_eq!(member.verified_by(), Some(SELF_REGISTRATION));

        let partner = use_case.execute_self_verification("partner").await;
        assert!(matches!(
            partner,
            Err(VerifyAccountError::AccountError(UserAccountError::NotAllowedForType))
        ));
        assert!(repository.get("partner").await.is_pending_verification());
    }

    #[tokio::test]
    async fn test_verify_unknown_account() {
        let use_case = VerifyAccountUseCase::new(MockAccountRepository::default());

        let result = use_case.execute("missing", "admin-2").await;

        assert!(matches!(
            result,
            Err(VerifyAccountError::RepositoryError(RepositoryError::NotFound))
        ));
    }
}
