use accounts_core::{
    DisabilityType, RepositoryError, UserAccount, UserAccountError, UserAccountRepository,
};

use super::apply_transition;

#[derive(Debug, thiserror::Error)]
pub enum ChangeAccountStatusError {
    #[error("Status change rejected: {0}")]
    AccountError(#[from] UserAccountError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Administrative status changes: disabling, reactivation and unlocking
pub struct ChangeAccountStatusUseCase<R>
where
    R: UserAccountRepository,
{
    repository: R,
}

impl<R> ChangeAccountStatusUseCase<R>
where
    R: UserAccountRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "ChangeAccountStatusUseCase::disable", skip(self, reason))]
    pub async fn disable(
        &self,
        account_id: &str,
        actor_id: &str,
        disability_type: DisabilityType,
        reason: &str,
    ) -> Result<UserAccount, ChangeAccountStatusError> {
        let account = apply_transition::<ChangeAccountStatusError, _, _>(
            &self.repository,
            account_id,
            |account| account.disable(actor_id, disability_type, reason),
        )
        .await?;
        tracing::info!("account disabled");
        Ok(account)
    }

    #[tracing::instrument(name = "ChangeAccountStatusUseCase::reactivate", skip(self))]
    pub async fn reactivate(
        &self,
        account_id: &str,
        actor_id: &str,
    ) -> Result<UserAccount, ChangeAccountStatusError> {
        let account = apply_transition::<ChangeAccountStatusError, _, _>(
            &self.repository,
            account_id,
            |account| account.reactivate(actor_id),
        )
        .await?;
        tracing::info!("account reactivated");
        Ok(account)
    }

    #[tracing::instrument(name = "ChangeAccountStatusUseCase::activate", skip(self))]
    pub async fn activate(
        &self,
        account_id: &str,
        actor_id: &str,
    ) -> Result<UserAccount, ChangeAccountStatusError> {
        let account = apply_transition::<ChangeAccountStatusError, _, _>(
            &self.repository,
            account_id,
            |account| account.activate(actor_id),
        )
        .await?;
        tracing::info!("account activated");
        Ok(account)
    }

    /// Clears the failed login counter and any lock
    #[tracing::instrument(name = "ChangeAccountStatusUseCase::unlock", skip(self))]
    pub async fn unlock(&self, account_id: &str) -> Result<UserAccount, ChangeAccountStatusError> {
        let account = apply_transition::<ChangeAccountStatusError, _, _>(
            &self.repository,
            account_id,
            |account| {
                account.unlock_account();
                Ok(())
            },
        )
        .await?;
        tracing::info!("account unlocked");
        Ok(account)
    }
}
