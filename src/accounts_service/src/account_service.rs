use accounts_adapters::{
    AccountServiceSetting, Argon2PasswordHasher, HashMapUserAccountStore, UuidIdGenerator,
};
use accounts_application::{
    ChangeAccountStatusUseCase, ChangePasswordUseCase, DeactivateIdleAccountsUseCase,
    DeleteAccountUseCase, ListAccountsUseCase, LoginUseCase, RegisterAccountUseCase,
    UpdateProfileUseCase, VerifyAccountUseCase,
};
use accounts_core::{
    HasherError, IdGenerator, LockoutPolicy, PasswordHasher, UserAccountError,
    UserAccountRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error("Invalid lockout settings: {0}")]
    LockoutSettings(#[from] UserAccountError),
    #[error("Invalid hashing settings: {0}")]
    HashingSettings(#[from] HasherError),
}

/// Every account use case wired to one repository, hasher and id generator
pub struct AccountService<R, H, G>
where
    R: UserAccountRepository + Clone,
    H: PasswordHasher + Clone + 'static,
    G: IdGenerator,
{
    repository: R,
    register: RegisterAccountUseCase<R, H, G>,
    verify: VerifyAccountUseCase<R>,
    login: LoginUseCase<R, H>,
    status: ChangeAccountStatusUseCase<R>,
    delete: DeleteAccountUseCase<R>,
    password: ChangePasswordUseCase<R, H>,
    profile: UpdateProfileUseCase<R>,
    list: ListAccountsUseCase<R>,
    deactivate_idle: DeactivateIdleAccountsUseCase<R>,
}

/// The in-memory store with Argon2id hashing and UUID ids
pub type InMemoryAccountService =
    AccountService<HashMapUserAccountStore, Argon2PasswordHasher, UuidIdGenerator>;

impl<R, H, G> AccountService<R, H, G>
where
    R: UserAccountRepository + Clone,
    H: PasswordHasher + Clone + 'static,
    G: IdGenerator,
{
    /// Create a new AccountService
    ///
    /// # Arguments
    /// * `repository` - Account store, shared by every use case (must be Clone)
    /// * `hasher` - Password hasher (must be Clone)
    /// * `id_generator` - Source of new account ids
    /// * `lockout_policy` - Failed login policy used by login
    pub fn new(repository: R, hasher: H, id_generator: G, lockout_policy: LockoutPolicy) -> Self {
        Self {
            register: RegisterAccountUseCase::new(
                repository.clone(),
                hasher.clone(),
                id_generator,
            ),
            verify: VerifyAccountUseCase::new(repository.clone()),
            login: LoginUseCase::new(repository.clone(), hasher.clone(), lockout_policy),
            status: ChangeAccountStatusUseCase::new(repository.clone()),
            delete: DeleteAccountUseCase::new(repository.clone()),
            password: ChangePasswordUseCase::new(repository.clone(), hasher),
            profile: UpdateProfileUseCase::new(repository.clone()),
            list: ListAccountsUseCase::new(repository.clone()),
            deactivate_idle: DeactivateIdleAccountsUseCase::new(repository.clone()),
            repository,
        }
    }

    /// Direct access to the store for the read-only queries
    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn register(&self) -> &RegisterAccountUseCase<R, H, G> {
        &self.register
    }

    pub fn verify(&self) -> &VerifyAccountUseCase<R> {
        &self.verify
    }

    pub fn login(&self) -> &LoginUseCase<R, H> {
        &self.login
    }

    pub fn status(&self) -> &ChangeAccountStatusUseCase<R> {
        &self.status
    }

    pub fn delete(&self) -> &DeleteAccountUseCase<R> {
        &self.delete
    }

    pub fn password(&self) -> &ChangePasswordUseCase<R, H> {
        &self.password
    }

    pub fn profile(&self) -> &UpdateProfileUseCase<R> {
        &self.profile
    }

    pub fn list(&self) -> &ListAccountsUseCase<R> {
        &self.list
    }

    pub fn deactivate_idle(&self) -> &DeactivateIdleAccountsUseCase<R> {
        &self.deactivate_idle
    }
}

impl InMemoryAccountService {
    /// Builds the in-memory service from loaded settings
    pub fn from_settings(settings: &AccountServiceSetting) -> Result<Self, AccountServiceError> {
        let lockout_policy = settings.lockout_policy()?;
        let hasher = settings.password_hasher()?;
        tracing::info!(
            max_attempts = lockout_policy.max_attempts(),
            lock_duration_secs = lockout_policy.lock_duration().as_secs(),
            "account service configured"
        );

        Ok(Self::new(
            HashMapUserAccountStore::new(),
            hasher,
            UuidIdGenerator,
            lockout_policy,
        ))
    }
}
