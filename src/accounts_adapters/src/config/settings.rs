use std::time::Duration;

use accounts_core::{HasherError, LockoutPolicy, UserAccountError};
use ::config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

use super::constants::{defaults, env, files};
use crate::hashing::{
    Argon2PasswordHasher, DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM,
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccountServiceSetting {
    pub lockout: LockoutSetting,
    pub hashing: HashingSetting,
    pub telemetry: TelemetrySetting,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LockoutSetting {
    pub max_attempts: u32,
    pub lock_duration_secs: u64,
}

impl Default for LockoutSetting {
    fn default() -> Self {
        Self {
            max_attempts: defaults::LOCKOUT_MAX_ATTEMPTS,
            lock_duration_secs: defaults::LOCKOUT_DURATION_SECS,
        }
    }
}

/// Argon2id cost parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HashingSetting {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingSetting {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_MEMORY_KIB,
            iterations: DEFAULT_ITERATIONS,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TelemetrySetting {
    /// `EnvFilter` directives used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for TelemetrySetting {
    fn default() -> Self {
        Self {
            log_filter: defaults::LOG_FILTER.to_owned(),
        }
    }
}

impl AccountServiceSetting {
    /// Loads settings, falling back to defaults when the sources cannot be read.
    ///
    /// The fallback warning is only visible once tracing is initialized.
    pub fn load() -> Self {
        let (settings, error) = Self::load_or_default();
        if let Some(e) = error {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
        }
        settings
    }

    /// Like [`load`](Self::load), but hands the load error back instead of
    /// logging it, for callers that set up tracing from the result.
    pub fn load_or_default() -> (Self, Option<ConfigError>) {
        Self::or_default(Self::try_load())
    }

    fn or_default(loaded: Result<Self, ConfigError>) -> (Self, Option<ConfigError>) {
        match loaded {
            Ok(settings) => (settings, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Reads `.env`, then layers `config/default`, `config/local` and
    /// `ACCOUNTS__*` environment variables, later sources winning.
    pub fn try_load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let builder = Config::builder()
            .add_source(File::with_name(files::DEFAULT_CONFIG_FILE).required(false))
            .add_source(File::with_name(files::LOCAL_CONFIG_FILE).required(false));
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .separator(env::ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn lockout_policy(&self) -> Result<LockoutPolicy, UserAccountError> {
        LockoutPolicy::new(
            self.lockout.max_attempts,
            Duration::from_secs(self.lockout.lock_duration_secs),
        )
    }

    pub fn password_hasher(&self) -> Result<Argon2PasswordHasher, HasherError> {
        Argon2PasswordHasher::new(
            self.hashing.memory_kib,
            self.hashing.iterations,
            self.hashing.parallelism,
        )
    }
}
