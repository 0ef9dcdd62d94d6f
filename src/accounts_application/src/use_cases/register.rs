use accounts_core::{
    AccountType, Email, HasherError, IdGenerator, PasswordError, PasswordHash, PasswordHasher,
    RepositoryError, UserAccount, UserAccountError, UserAccountRepository, Username,
    validate_password,
};
use secrecy::{ExposeSecret, Secret};

use crate::hashing::compute_password_hash;

/// Account registered on someone else's behalf.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: Secret<String>,
    pub account_type: AccountType,
    /// Actor id or system identifier recorded as `registered_by`
    pub registered_by: String,
}

/// Error types specific to the register use case
#[derive(Debug, thiserror::Error)]
pub enum RegisterAccountError {
    #[error("Password rejected: {0}")]
    InvalidPassword(#[from] PasswordError),
    #[error("Invalid account: {0}")]
    InvalidAccount(#[from] UserAccountError),
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Email is already registered")]
    EmailTaken,
    #[error("Password hasher error: {0}")]
    HasherError(#[from] HasherError),
    #[error("Repository error: {0}")]
    RepositoryError(RepositoryError),
}

impl From<RepositoryError> for RegisterAccountError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::DuplicateUsername => Self::UsernameTaken,
            RepositoryError::DuplicateEmail => Self::EmailTaken,
            other => Self::RepositoryError(other),
        }
    }
}

/// Register use case - creates accounts in `PendingVerification`
pub struct RegisterAccountUseCase<R, H, G>
where
    R: UserAccountRepository,
    H: PasswordHasher + Clone + 'static,
    G: IdGenerator,
{
    repository: R,
    hasher: H,
    id_generator: G,
}

impl<R, H, G> RegisterAccountUseCase<R, H, G>
where
    R: UserAccountRepository,
    H: PasswordHasher + Clone + 'static,
    G: IdGenerator,
{
    pub fn new(repository: R, hasher: H, id_generator: G) -> Self {
        Self {
            repository,
            hasher,
            id_generator,
        }
    }

    /// Register an account on behalf of an administrator or system process
    ///
    /// # Arguments
    /// * `new_account` - Raw registration data, validated here
    ///
    /// # Returns
    /// The stored account, pending verification
    #[tracing::instrument(
        name = "RegisterAccountUseCase::execute",
        skip(self, new_account),
        fields(username = %new_account.username, registered_by = %new_account.registered_by)
    )]
    pub async fn execute(&self, new_account: NewAccount) -> Result<UserAccount, RegisterAccountError> {
        let NewAccount {
            username,
            email,
            password,
            account_type,
            registered_by,
        } = new_account;

        let (username, email) = self.check_availability(&username, &email).await?;
        if registered_by.trim().is_empty() {
            return Err(UserAccountError::EmptyRegisteredBy.into());
        }
        let password_hash = self.hash_policy_compliant(password).await?;
        let id = self.id_generator.generate();

        let account = UserAccount::new_with_hash(
            &id,
            username.as_str(),
            email.as_ref(),
            password_hash,
            account_type,
            &registered_by,
        )?;
        self.store(account).await
    }

    /// Self-service sign-up, always a `Membership` account
    #[tracing::instrument(
        name = "RegisterAccountUseCase::execute_self_registration",
        skip(self, password)
    )]
    pub async fn execute_self_registration(
        &self,
        username: &str,
        email: &str,
        password: Secret<String>,
    ) -> Result<UserAccount, RegisterAccountError> {
        let (username, email) = self.check_availability(username, email).await?;
        let password_hash = self.hash_policy_compliant(password).await?;
        let id = self.id_generator.generate();

        let account =
            UserAccount::new_self_registered(&id, username.as_str(), email.as_ref(), password_hash)?;
        self.store(account).await
    }

    async fn check_availability(
        &self,
        username: &str,
        email: &str,
    ) -> Result<(Username, Email), RegisterAccountError> {
        let username = Username::parse(username).map_err(UserAccountError::from)?;
        let email = Email::parse(email).map_err(UserAccountError::from)?;

        if self.repository.exists_by_username(&username).await? {
            return Err(RegisterAccountError::UsernameTaken);
        }
        if self.repository.exists_by_email(&email).await? {
            return Err(RegisterAccountError::EmailTaken);
        }
        Ok((username, email))
    }

    async fn hash_policy_compliant(
        &self,
        password: Secret<String>,
    ) -> Result<PasswordHash, RegisterAccountError> {
        validate_password(password.expose_secret())?;
        Ok(compute_password_hash(&self.hasher, password).await?)
    }

    async fn store(&self, account: UserAccount) -> Result<UserAccount, RegisterAccountError> {
        // The repository re-checks uniqueness, so a concurrent registration
        // still surfaces as UsernameTaken or EmailTaken.
        self.repository.create(account.clone()).await?;
        tracing::info!(account_id = %account.id(), "account registered");
        Ok(account)
    }
}
