//! # Accounts - User Account Lifecycle Library
//!
//! This is a facade crate that re-exports all public APIs from the account components.
//! Use this crate to get access to registration, verification, login tracking and
//! administrative status changes in one place.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! accounts = { path = "../accounts" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `UserAccount`, `Username`, `Email`, `AccountState`, etc.
//! - **Repository traits**: `UserAccountRepository`, `PasswordHasher`, `IdGenerator`
//! - **Use cases**: `RegisterAccountUseCase`, `LoginUseCase`, etc.
//! - **Adapters**: `HashMapUserAccountStore`, `Argon2PasswordHasher`, `UuidIdGenerator`
//! - **Service**: `AccountService` - every use case wired to one store

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use accounts_core::*;
}

// Re-export most commonly used core types at the root level
pub use accounts_core::{
    AccountState, AccountStatus, AccountType, DisabilityType, Email, EmailError, LockoutPolicy,
    PasswordError, PasswordHash, SELF_REGISTRATION, SYSTEM_REGISTRATION, UserAccount,
    UserAccountError, Username, UsernameError, validate_password,
};

// ============================================================================
// Repository Traits (Ports)
// ============================================================================

/// Port definitions
pub mod ports {
    pub use accounts_core::{
        FilterError, HasherError, IdGenerator, OrderBy, PasswordHasher, RepositoryError,
        SortOrder, UserAccountFilter, UserAccountRepository,
    };
}

// Re-export ports at root level
pub use ports::{
    FilterError, HasherError, IdGenerator, OrderBy, PasswordHasher, RepositoryError, SortOrder,
    UserAccountFilter, UserAccountRepository,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use accounts_application::*;
}

// Re-export use cases at root level
pub use accounts_application::{
    AccountPage, ChangeAccountStatusUseCase, ChangePasswordUseCase, DeactivateIdleAccountsUseCase,
    DeleteAccountUseCase, ListAccountsUseCase, LoginIdentifier, LoginUseCase, NewAccount,
    RegisterAccountUseCase, UpdateProfileUseCase, VerifyAccountUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use accounts_adapters::persistence::*;
    }

    /// Password hashing
    pub mod hashing {
        pub use accounts_adapters::hashing::*;
    }

    /// Configuration
    pub mod config {
        pub use accounts_adapters::config::*;
    }

    /// Tracing setup
    pub mod telemetry {
        pub use accounts_adapters::telemetry::*;
    }
}

// Re-export commonly used adapters at root level
pub use accounts_adapters::{
    AccountServiceSetting, Argon2PasswordHasher, HashMapUserAccountStore, UuidIdGenerator,
    init_tracing,
};

// ============================================================================
// Account Service (Main Entry Point)
// ============================================================================

/// Main account service
pub use accounts_service::{AccountService, AccountServiceError, InMemoryAccountService};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
