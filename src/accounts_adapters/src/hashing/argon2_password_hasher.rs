use accounts_core::{HasherError, PasswordHash, PasswordHasher};
use argon2::{
    Algorithm, Argon2, Params, PasswordVerifier, Version,
    password_hash::{self, PasswordHasher as _, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};

pub const DEFAULT_MEMORY_KIB: u32 = 15000;
pub const DEFAULT_ITERATIONS: u32 = 2;
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Argon2id hasher producing PHC strings with a random salt per hash.
///
/// Verification reads the parameters embedded in the stored hash, so
/// changing the configured cost does not invalidate existing hashes.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, HasherError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| HasherError::Hashing(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        let params = Params::new(
            DEFAULT_MEMORY_KIB,
            DEFAULT_ITERATIONS,
            DEFAULT_PARALLELISM,
            None,
        )
        .unwrap_or_default();
        Self { params }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, raw: &Secret<String>) -> Result<PasswordHash, HasherError> {
        let salt: SaltString = SaltString::generate(rand_core::OsRng);
        self.argon2()
            .hash_password(raw.expose_secret().as_bytes(), &salt)
            .map(|h| PasswordHash::new(Secret::from(h.to_string())))
            .map_err(|e| HasherError::Hashing(e.to_string()))
    }

    fn compare(&self, raw: &Secret<String>, encoded: &PasswordHash) -> Result<bool, HasherError> {
        let expected = password_hash::PasswordHash::new(encoded.as_ref().expose_secret())
            .map_err(|e| HasherError::MalformedHash(e.to_string()))?;

        match self
            .argon2()
            .verify_password(raw.expose_secret().as_bytes(), &expected)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HasherError::UnexpectedError(e.to_string())),
        }
    }
}
