use accounts_core::{RepositoryError, UserAccount, UserAccountFilter, UserAccountRepository};

/// One page of a filtered listing plus the total number of matches
#[derive(Debug, Clone)]
pub struct AccountPage {
    pub accounts: Vec<UserAccount>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ListAccountsError {
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct ListAccountsUseCase<R>
where
    R: UserAccountRepository,
{
    repository: R,
}

impl<R> ListAccountsUseCase<R>
where
    R: UserAccountRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Applies defaults to `filter`, then fetches the page and the total count
    #[tracing::instrument(name = "ListAccountsUseCase::execute", skip(self))]
    pub async fn execute(&self, filter: UserAccountFilter) -> Result<AccountPage, ListAccountsError> {
        let filter = filter.with_defaults();
        filter.validate().map_err(RepositoryError::from)?;

        let (accounts, total) = self.repository.find_page(&filter).await?;
        tracing::debug!(returned = accounts.len(), total, "accounts listed");

        Ok(AccountPage {
            accounts,
            total,
            limit: filter.limit,
            offset: filter.offset,
        })
    }
}
