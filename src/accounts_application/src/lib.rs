mod hashing;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use use_cases::{
    change_password::{ChangePasswordError, ChangePasswordUseCase},
    change_status::{ChangeAccountStatusError, ChangeAccountStatusUseCase},
    deactivate_idle::{DeactivateIdleAccountsError, DeactivateIdleAccountsUseCase},
    delete_account::{DeleteAccountError, DeleteAccountUseCase},
    list_accounts::{AccountPage, ListAccountsError, ListAccountsUseCase},
    login::{LoginError, LoginIdentifier, LoginUseCase},
    register::{NewAccount, RegisterAccountError, RegisterAccountUseCase},
    update_profile::{UpdateProfileError, UpdateProfileUseCase},
    verify::{VerifyAccountError, VerifyAccountUseCase},
};
