// tests/user_service_unit.rs
use std::sync::Arc;

use chrono::Duration;
use eshop_auth::application::commands::users::{RegisterUserCommand, UserCommandService};
use eshop_auth::application::dto::AuthenticatedUser;
use eshop_auth::application::error::ApplicationError;
use eshop_auth::application::ports::security::PasswordHasher;
use eshop_auth::application::queries::users::UserQueryService;
use eshop_auth::domain::user::{Email, UserId, UserRepository};

mod support;

use support::{InMemoryUserRepo, MutableClock, PlainPasswordHasher, UserBuilder, fixed_now};

fn command_service(repo: Arc<InMemoryUserRepo>) -> UserCommandService {
    UserCommandService::new(
        repo,
        Arc::new(PlainPasswordHasher),
        Arc::new(MutableClock::new()),
    )
}

fn actor(id: i64) -> AuthenticatedUser {
    AuthenticatedUser {
        id: UserId::new(id).unwrap(),
        email: "alice@example.com".into(),
        issued_at: fixed_now(),
        expires_at: fixed_now() + Duration::seconds(1800),
    }
}

#[tokio::test]
async fn register_hashes_password_and_stores_user() {
    let repo = Arc::new(InMemoryUserRepo::new());
    let service = command_service(Arc::clone(&repo));

    let user = service
        .register(RegisterUserCommand {
            email: "  bob@example.com ".into(),
            name: "Bob".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();

    assert_eq!(user.email, "bob@example.com");
    assert!(user.is_active);
    assert_eq!(user.created_at, fixed_now());

    let stored = repo
        .find_by_email(&Email::new("bob@example.com").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.password_hash.as_str(), "hunter22");
    assert!(PlainPasswordHasher
        .verify("hunter22", stored.password_hash.as_str())
        .await
        .unwrap());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let repo = Arc::new(InMemoryUserRepo::with_users([UserBuilder::new().build()]));
    let service = command_service(Arc::clone(&repo));

    let err = service
        .register(RegisterUserCommand {
            email: "alice@example.com".into(),
            name: "Alice again".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Conflict(_)));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn register_rejects_weak_password_and_bad_email() {
    let service = command_service(Arc::new(InMemoryUserRepo::new()));

    let err = service
        .register(RegisterUserCommand {
            email: "bob@example.com".into(),
            name: "Bob".into(),
            password: "123".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));

    let err = service
        .register(RegisterUserCommand {
            email: "bob".into(),
            name: "Bob".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));
}

#[tokio::test]
async fn profile_reports_remaining_token_lifetime() {
    let repo = Arc::new(InMemoryUserRepo::with_users([UserBuilder::new().build()]));
    let clock = Arc::new(MutableClock::new());
    clock.advance(Duration::seconds(300));
    let queries = UserQueryService::new(repo, clock);

    let profile = queries.get_profile(&actor(1)).await.unwrap();
    assert_eq!(profile.user.id, 1);
    assert_eq!(profile.token_expires_in, 1500);
}

#[tokio::test]
async fn profile_of_missing_or_inactive_user_is_unauthorized() {
    let repo = Arc::new(InMemoryUserRepo::with_users([
        UserBuilder::new().id(2).email("carol@example.com").inactive().build(),
    ]));
    let queries = UserQueryService::new(repo, Arc::new(MutableClock::new()));

    let missing = queries.get_profile(&actor(1)).await.unwrap_err();
    let inactive = queries.get_profile(&actor(2)).await.unwrap_err();
    assert!(matches!(missing, ApplicationError::Unauthorized(_)));
    assert!(matches!(inactive, ApplicationError::Unauthorized(_)));
}
