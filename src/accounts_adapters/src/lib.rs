pub mod config;
pub mod hashing;
pub mod identity;
pub mod persistence;
pub mod telemetry;

pub use config::AccountServiceSetting;
pub use hashing::Argon2PasswordHasher;
pub use identity::UuidIdGenerator;
pub use persistence::HashMapUserAccountStore;
pub use telemetry::init_tracing;
