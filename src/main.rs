use accounts::{
    AccountServiceSetting, AccountType, DisabilityType, InMemoryAccountService, LoginIdentifier,
    NewAccount, Secret, UserAccountFilter, init_tracing,
};
use color_eyre::eyre::Result;

/// Walks one account through its lifecycle against the in-memory store
#[tokio::main]
async fn main() -> Result<()> {
    let (config, load_error) = AccountServiceSetting::load_or_default();
    init_tracing(&config.telemetry.log_filter)?;
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "failed to load settings, using defaults");
    }

    let service = InMemoryAccountService::from_settings(&config)?;

    let account = service
        .register()
        .execute(NewAccount {
            username: "demo_user".to_owned(),
            email: "demo@example.com".to_owned(),
            password: Secret::new("Demo!Passw0rd".to_owned()),
            account_type: AccountType::Internal,
            registered_by: "admin".to_owned(),
        })
        .await?;
    service.verify().execute(account.id(), "admin").await?;

    let identifier = LoginIdentifier::parse("demo@example.com")?;
    service
        .login()
        .execute(
            identifier,
            Secret::new("Demo!Passw0rd".to_owned()),
            "127.0.0.1",
        )
        .await?;

    service
        .status()
        .disable(account.id(), "admin", DisabilityType::Suspended, "demo")
        .await?;
    service.status().reactivate(account.id(), "admin").await?;
    service.delete().execute(account.id(), "admin").await?;

    let page = service.list().execute(UserAccountFilter::default()).await?;
    tracing::info!(live_accounts = page.total, "demo finished");

    Ok(())
}
