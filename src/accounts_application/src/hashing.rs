use accounts_core::{HasherError, PasswordHash, PasswordHasher};
use secrecy::Secret;

#[tracing::instrument(name = "Computing password hash", skip_all)]
pub(crate) async fn compute_password_hash<H>(
    hasher: &H,
    password: Secret<String>,
) -> Result<PasswordHash, HasherError>
where
    H: PasswordHasher + Clone + 'static,
{
    let hasher = hasher.clone();
    let current_span: tracing::Span = tracing::Span::current();

    tokio::task::spawn_blocking(move || current_span.in_scope(|| hasher.hash(&password)))
        .await
        .map_err(|e| HasherError::UnexpectedError(e.to_string()))?
}

#[tracing::instrument(name = "Verify password hash", skip_all)]
pub(crate) async fn verify_password_hash<H>(
    hasher: &H,
    expected_password_hash: PasswordHash,
    password_candidate: Secret<String>,
) -> Result<bool, HasherError>
where
    H: PasswordHasher + Clone + 'static,
{
    let hasher = hasher.clone();
    let current_span: tracing::Span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| expected_password_hash.compare(&password_candidate, &hasher))
    })
    .await
    .map_err(|e| HasherError::UnexpectedError(e.to_string()))?
}
