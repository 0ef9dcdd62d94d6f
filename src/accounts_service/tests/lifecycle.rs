use std::{sync::Arc, time::Duration};

use accounts_adapters::{Argon2PasswordHasher, HashMapUserAccountStore, UuidIdGenerator};
use accounts_application::{
    ChangeAccountStatusError, LoginError, LoginIdentifier, NewAccount, RegisterAccountError,
};
use accounts_core::{
    AccountStatus, AccountType, DisabilityType, LockoutPolicy, UserAccountFilter,
    UserAccountRepository,
};
use accounts_service::AccountService;
use chrono::{TimeDelta, Utc};
use secrecy::Secret;
use fake::Fake;
use fake::faker::internet::en::FreeEmailProvider;
use fake::faker::lorem::en::Word;

type TestService = AccountService<HashMapUserAccountStore, Argon2PasswordHasher, UuidIdGenerator>;

const PASSWORD: &str = "Lifecycle!2024";

fn service(max_attempts: u32) -> TestService {
    AccountService::new(
        HashMapUserAccountStore::new(),
        Argon2PasswordHasher::new(1024, 1, 1).unwrap(),
        UuidIdGenerator,
        LockoutPolicy::new(max_attempts, Duration::from_secs(300)).unwrap(),
    )
}

fn secret(raw: &str) -> Secret<String> {
    Secret::new(raw.to_owned())
}

fn login_as(raw: &str) -> LoginIdentifier {
    LoginIdentifier::parse(raw).unwrap()
}

fn new_internal(username: &str, email: &str) -> NewAccount {
    NewAccount {
        username: username.to_owned(),
        email: email.to_owned(),
        password: secret(PASSWORD),
        account_type: AccountType::Internal,
        registered_by: "admin-1".to_owned(),
    }
}

#[tokio::test]
async fn account_moves_through_its_whole_lifecycle() {
    let service = service(3);

    let account = service
        .register()
        .execute(new_internal("lifecycle_user", "Lifecycle@Example.com"))
        .await
        .unwrap();
    let id = account.id().to_owned();
    assert_eq!(account.status(), AccountStatus::PendingVerification);

    let pending = service
        .login()
        .execute(login_as("lifecycle_user"), secret(PASSWORD), "10.1.1.1")
        .await;
    assert!(matches!(
        pending,
        Err(LoginError::NotAllowed(AccountStatus::PendingVerification))
    ));

    service.verify().execute(&id, "admin-1").await.unwrap();
    let logged_in = service
        .login()
        .execute(login_as("lifecycle@example.com"), secret(PASSWORD), "10.1.1.1")
        .await
        .unwrap();
    assert_eq!(logged_in.last_login_ip(), Some("10.1.1.1"));

    for _ in 0..3 {
        let failed = service
            .login()
            .execute(login_as("lifecycle_user"), secret("Wrong!Pass1"), "10.6.6.6")
            .await;
        assert!(matches!(failed, Err(LoginError::InvalidCredentials)));
    }
    let locked = service
        .login()
        .execute(login_as("lifecycle_user"), secret(PASSWORD), "10.1.1.1")
        .await;
    assert!(matches!(locked, Err(LoginError::Locked { .. })));

    service.status().unlock(&id).await.unwrap();
    service
        .status()
        .disable(&id, "admin-2", DisabilityType::Suspended, "chargeback")
        .await
        .unwrap();
    let suspended = service
        .login()
        .execute(login_as("lifecycle_user"), secret(PASSWORD), "10.1.1.1")
        .await;
    assert!(matches!(
        suspended,
        Err(LoginError::NotAllowed(AccountStatus::Disabled))
    ));
    assert_eq!(
        service.repository().find_suspended_accounts().await.unwrap().len(),
        1
    );

    service.status().reactivate(&id, "admin-2").await.unwrap();
    service
        .password()
        .execute(&id, secret(PASSWORD), secret("Rotated!Pass9"))
        .await
        .unwrap();
    service
        .profile()
        .change_username(&id, "renamed_user")
        .await
        .unwrap();
    let renamed = service
        .login()
        .execute(login_as("renamed_user"), secret("Rotated!Pass9"), "10.1.1.2")
        .await
        .unwrap();
    assert_eq!(renamed.failed_login_attempts(), 0);

    service.delete().execute(&id, "admin-3").await.unwrap();
    let deleted = service
        .login()
        .execute(login_as("renamed_user"), secret("Rotated!Pass9"), "10.1.1.2")
        .await;
    assert!(matches!(deleted, Err(LoginError::InvalidCredentials)));

    let reactivate_deleted = service.status().reactivate(&id, "admin-3").await;
    assert!(matches!(
        reactivate_deleted,
        Err(ChangeAccountStatusError::AccountError(_))
    ));

    let cleanup = service
        .repository()
        .find_accounts_for_cleanup(Utc::now() + TimeDelta::seconds(1))
        .await
        .unwrap();
    assert_eq!(cleanup.len(), 1);

    // A deleted account no longer holds its username or email
    service
        .register()
        .execute(new_internal("renamed_user", "lifecycle@example.com"))
        .await
        .unwrap();
}

#[tokio::test]
async fn self_registered_members_verify_themselves() {
    let service = service(5);
    let word: String = Word().fake();
    let username = format!("{word}_member");
    let email = format!("{word}.member@{}", FreeEmailProvider().fake::<String>());

    let account = service
        .register()
        .execute_self_registration(&username, &email, secret(PASSWORD))
        .await
        .unwrap();
    assert!(account.is_self_registered());

    let verified = service
        .verify()
        .execute_self_verification(account.id())
        .await
        .unwrap();
    assert!(verified.is_active());

    let duplicate = service
        .register()
        .execute_self_registration(&username, "another@example.com", secret(PASSWORD))
        .await;
    assert!(matches!(duplicate, Err(RegisterAccountError::UsernameTaken)));
}

#[tokio::test]
async fn idle_accounts_are_swept_into_inactive() {
    let service = service(5);
    let mut ids = Vec::new();
    for i in 0..3 {
        let account = service
            .register()
            .execute(new_internal(&format!("idle_{i}"), &format!("idle{i}@example.com")))
            .await
            .unwrap();
        service.verify().execute(account.id(), "admin-1").await.unwrap();
        ids.push(account.id().to_owned());
    }

    let swept = service
        .deactivate_idle()
        .execute(Utc::now() + TimeDelta::seconds(1), "no login within 90 days")
        .await
        .unwrap();
    assert_eq!(swept.len(), 3);

    let inactive = UserAccountFilter {
        disability_type: Some(DisabilityType::Inactive),
        ..Default::default()
    };
    let page = service.list().execute(inactive).await.unwrap();
    assert_eq!(page.total, 3);

    for id in &ids {
        service.status().activate(id, "admin-1").await.unwrap();
    }
    let active = UserAccountFilter {
        status: Some(AccountStatus::Active),
        ..Default::default()
    };
    assert_eq!(service.list().execute(active).await.unwrap().total, 3);
}

#[tokio::test]
async fn concurrent_failed_logins_are_never_lost() {
    let service = Arc::new(service(3));
    let account = service
        .register()
        .execute(new_internal("contended", "contended@example.com"))
        .await
        .unwrap();
    service.verify().execute(account.id(), "admin-1").await.unwrap();

    let attempts: Vec<_> = (0..16)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .login()
                    .execute(
                        login_as("contended"),
                        secret("Wrong!Pass1"),
                        &format!("10.0.0.{i}"),
                    )
                    .await
            })
        })
        .collect();

    let mut rejected = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Err(LoginError::InvalidCredentials) => rejected += 1,
            Err(LoginError::Locked { .. }) => {}
            other => panic!("unexpected login outcome: {other:?}"),
        }
    }

    let stored = service.repository().find_by_id(account.id()).await.unwrap();
    assert!(rejected >= 3);
    assert_eq!(stored.failed_login_attempts(), rejected);
    assert!(stored.is_locked());

    let correct = service
        .login()
        .execute(login_as("contended"), secret(PASSWORD), "10.0.0.1")
        .await;
    assert!(matches!(correct, Err(LoginError::Locked { .. })));
}
