use accounts_core::{RepositoryError, SYSTEM_REGISTRATION, UserAccountRepository};
use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum DeactivateIdleAccountsError {
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
    #[error("Deactivation reason must not be empty")]
    EmptyReason,
}

/// Sweeps active accounts without a login since a cutoff into `Disabled(Inactive)`
pub struct DeactivateIdleAccountsUseCase<R>
where
    R: UserAccountRepository,
{
    repository: R,
}

impl<R> DeactivateIdleAccountsUseCase<R>
where
    R: UserAccountRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns the ids of the accounts that were disabled.
    ///
    /// Accounts that changed concurrently are skipped and picked up by the
    /// next sweep.
    #[tracing::instrument(name = "DeactivateIdleAccountsUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        inactive_since: DateTime<Utc>,
        reason: &str,
    ) -> Result<Vec<String>, DeactivateIdleAccountsError> {
        if reason.trim().is_empty() {
            return Err(DeactivateIdleAccountsError::EmptyReason);
        }

        let candidates = self.repository.find_inactive_accounts(inactive_since).await?;
        let mut deactivated = Vec::with_capacity(candidates.len());

        for mut account in candidates {
            let expected_updated_at = account.updated_at();
            if let Err(e) = account.set_inactive(SYSTEM_REGISTRATION, reason) {
                tracing::warn!(account_id = %account.id(), error = %e, "skipping idle account");
                continue;
            }
            match self.repository.update(&account, expected_updated_at).await {
                Ok(()) => deactivated.push(account.id().to_owned()),
                Err(RepositoryError::Conflict) => {
                    tracing::warn!(account_id = %account.id(), "idle account changed concurrently");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(count = deactivated.len(), "idle accounts deactivated");
        Ok(deactivated)
    }
}
