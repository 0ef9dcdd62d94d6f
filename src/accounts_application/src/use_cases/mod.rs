pub mod change_password;
pub mod change_status;
pub mod deactivate_idle;
pub mod delete_account;
pub mod list_accounts;
pub mod login;
pub mod register;
pub mod update_profile;
pub mod verify;

use accounts_core::{RepositoryError, UserAccount, UserAccountError, UserAccountRepository};

/// Loads an account, applies `transition` and writes it back guarded by the
/// `updated_at` that was loaded.
///
/// A rejected transition leaves the stored account untouched.
pub(crate) async fn apply_transition<E, R, F>(
    repository: &R,
    id: &str,
    transition: F,
) -> Result<UserAccount, E>
where
    R: UserAccountRepository,
    F: FnOnce(&mut UserAccount) -> Result<(), UserAccountError> + Send,
    E: From<UserAccountError> + From<RepositoryError>,
{
    let mut account = repository.find_by_id(id).await?;
    let expected_updated_at = account.updated_at();

    transition(&mut account)?;

    repository.update(&account, expected_updated_at).await?;
    Ok(account)
}
