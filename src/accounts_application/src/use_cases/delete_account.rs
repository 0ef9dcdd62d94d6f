use accounts_core::{RepositoryError, UserAccountRepository};

#[derive(Debug, thiserror::Error)]
pub enum DeleteAccountError {
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Delete account use case - soft deletes, the record is kept
pub struct DeleteAccountUseCase<R>
where
    R: UserAccountRepository,
{
    repository: R,
}

impl<R> DeleteAccountUseCase<R>
where
    R: UserAccountRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "DeleteAccountUseCase::execute", skip(self))]
    pub async fn execute(&self, account_id: &str, actor_id: &str) -> Result<(), DeleteAccountError> {
        self.repository.delete(account_id, actor_id).await?;
        tracing::info!("account soft deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockAccountRepository, active_account};
    use accounts_core::UserAccountError;

    #[tokio::test]
    async fn test_delete_account() {
        let repository = MockAccountRepository::default();
        repository.seed(active_account("acc-1", "alice")).await;
        let use_case = DeleteAccountUseCase::new(repository.clone());

        use_case.execute("acc-1", "admin-2").await.unwrap();

        let stored = repository.get("acc-1").await;
        assert!(stored.is_soft_deleted());
        assert_eq!(stored.deleted_by(), Some("admin-2"));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repository = MockAccountRepository::default();
        repository.seed(active_account("acc-1", "alice")).await;
        let use_case = DeleteAccountUseCase::new(repository);
        use_case.execute("acc-1", "admin-2").await.unwrap();

        let result = use_case.execute("acc-1", "admin-2").await;

        assert!(matches!(
            result,
            Err(DeleteAccountError::RepositoryError(RepositoryError::Domain(
                UserAccountError::AlreadyDeleted
            )))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_account() {
        let use_case = DeleteAccountUseCase::new(MockAccountRepository::default());

        let result = use_case.execute("missing", "admin-2").await;

        assert!(matches!(
            result,
            Err(DeleteAccountError::RepositoryError(RepositoryError::NotFound))
        ));
    }
}
