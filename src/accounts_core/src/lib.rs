pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    account_type::AccountType,
    disability::DisabilityType,
    email::{Email, EmailError},
    lockout::LockoutPolicy,
    password::{PasswordError, PasswordHash, validate_password},
    status::{AccountState, AccountStatus},
    user_account::{SELF_REGISTRATION, SYSTEM_REGISTRATION, UserAccount, UserAccountError},
    username::{Username, UsernameError},
};

pub use ports::{
    filter::{FilterError, OrderBy, SortOrder, UserAccountFilter},
    repositories::{RepositoryError, UserAccountRepository},
    services::{HasherError, IdGenerator, PasswordHasher},
};
