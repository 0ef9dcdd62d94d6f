use accounts_core::{
    AccountType, Email, RepositoryError, UserAccount, UserAccountError, UserAccountRepository,
    Username,
};

use super::apply_transition;

#[derive(Debug, thiserror::Error)]
pub enum UpdateProfileError {
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Email is already registered")]
    EmailTaken,
    #[error("Update rejected: {0}")]
    AccountError(#[from] UserAccountError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// Username, email and account type changes
pub struct UpdateProfileUseCase<R>
where
    R: UserAccountRepository,
{
    repository: R,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserAccountRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    #[tracing::instrument(name = "UpdateProfileUseCase::change_username", skip(self))]
    pub async fn change_username(
        &self,
        account_id: &str,
        new_username: &str,
    ) -> Result<UserAccount, UpdateProfileError> {
        let username = Username::parse(new_username).map_err(UserAccountError::from)?;
        match self.repository.find_by_username(&username).await {
            Ok(holder) if holder.id() != account_id => {
                return Err(UpdateProfileError::UsernameTaken);
            }
            Ok(_) | Err(RepositoryError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let account = apply_transition::<UpdateProfileError, _, _>(
            &self.repository,
            account_id,
            |account| account.update_username(username.as_str()),
        )
        .await?;
        tracing::info!("username changed");
        Ok(account)
    }

    #[tracing::instrument(name = "UpdateProfileUseCase::change_email", skip(self))]
    pub async fn change_email(
        &self,
        account_id: &str,
        new_email: &str,
    ) -> Result<UserAccount, UpdateProfileError> {
        let email = Email::parse(new_email).map_err(UserAccountError::from)?;
        match self.repository.find_by_email(&email).await {
            Ok(holder) if holder.id() != account_id => {
                return Err(UpdateProfileError::EmailTaken);
            }
            Ok(_) | Err(RepositoryError::NotFound) => {}
            Err(e) => return Err(e.into()),
        }

        let account = apply_transition::<UpdateProfileError, _, _>(
            &self.repository,
            account_id,
            |account| account.update_email(email.as_str()),
        )
        .await?;
        tracing::info!("email changed");
        Ok(account)
    }

    #[tracing::instrument(name = "UpdateProfileUseCase::change_type", skip(self))]
    pub async fn change_type(
        &self,
        account_id: &str,
        new_type: AccountType,
    ) -> Result<UserAccount, UpdateProfileError> {
        let account = apply_transition::<UpdateProfileError, _, _>(
            &self.repository,
            account_id,
            |account| account.update_type(new_type),
        )
        .await?;
        tracing::info!("account type changed");
        Ok(account)
    }
}
