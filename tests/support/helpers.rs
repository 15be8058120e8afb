// tests/support/helpers.rs
use std::sync::Arc;
use std::time::Duration;

use super::builders::UserBuilder;
use super::mocks::{CountingPasswordHasher, InMemoryUserRepo, MutableClock, PlainPasswordHasher, SequenceCodeGenerator};
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use eshop_auth::application::ports::{
    authorization_code::AuthorizationCodeStore,
    security::{PasswordHasher, TokenManager},
    time::Clock,
    util::CodeGenerator,
};
use eshop_auth::application::services::ApplicationServices;
use eshop_auth::domain::user::UserRepository;
use eshop_auth::infrastructure::security::{
    authorization_code_store::InMemoryAuthorizationCodeStore, password::Argon2PasswordHasher,
    token::BiscuitTokenManager,
};
use eshop_auth::infrastructure::util::OsRngCodeGenerator;
use eshop_auth::presentation::http::{routes::build_router_with_rate_limiter, state::HttpState};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub const TEST_SIGNING_KEY: &str =
    "4a0c5b4ba1b2e7c7e1f0a3d44a9ab5d4f1b9b3a1e0c6d2f8a7b6c5d4e3f2a1b0";
pub const TEST_EMAIL: &str = "alice@example.com";
pub const TEST_PASSWORD: &str = "correct horse";
pub const CLIENT_ID: &str = "c1";
pub const REDIRECT_URI: &str = "https://app/cb";
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(1800);
pub const CODE_TTL: Duration = Duration::from_secs(600);

/// Fully wired services over in-memory adapters, with handles on the
/// pieces tests need to poke at.
pub struct TestApp {
    pub services: Arc<ApplicationServices>,
    pub users: Arc<InMemoryUserRepo>,
    pub store: Arc<InMemoryAuthorizationCodeStore>,
    pub clock: Arc<MutableClock>,
    pub tokens: Arc<BiscuitTokenManager>,
}

impl TestApp {
    pub fn router(&self) -> axum::Router {
        let state = HttpState {
            services: Arc::clone(&self.services),
        };
        build_router_with_rate_limiter(state, false)
    }
}

fn wire(
    hasher: Arc<dyn PasswordHasher>,
    generator: Arc<dyn CodeGenerator>,
    password_hash: String,
) -> TestApp {
    let clock = Arc::new(MutableClock::new());
    let users = Arc::new(InMemoryUserRepo::with_users([UserBuilder::new()
        .email(TEST_EMAIL)
        .password_hash(password_hash)
        .build()]));
    let store = Arc::new(InMemoryAuthorizationCodeStore::new());
    let tokens = Arc::new(
        BiscuitTokenManager::new(
            TEST_SIGNING_KEY,
            ACCESS_TOKEN_TTL,
            Arc::clone(&clock) as Arc<dyn Clock>,
        )
        .expect("valid test signing key"),
    );

    let services = Arc::new(ApplicationServices::new(
        Arc::clone(&users) as Arc<dyn UserRepository>,
        Arc::clone(&store) as Arc<dyn AuthorizationCodeStore>,
        hasher,
        Arc::clone(&tokens) as Arc<dyn TokenManager>,
        generator,
        Arc::clone(&clock) as Arc<dyn Clock>,
        CODE_TTL,
    ));

    TestApp {
        services,
        users,
        store,
        clock,
        tokens,
    }
}

/// Flow-level app: predictable codes and a cheap password hasher.
pub fn build_flow_app() -> TestApp {
    wire(
        Arc::new(PlainPasswordHasher),
        Arc::new(SequenceCodeGenerator::default()),
        format!("plain${TEST_PASSWORD}"),
    )
}

/// HTTP-level app: real Argon2, random codes, Biscuit tokens with the test key.
pub async fn build_test_app() -> TestApp {
    let hasher = Argon2PasswordHasher;
    let digest = hasher.hash(TEST_PASSWORD).await.expect("hash test password");
    wire(Arc::new(hasher), Arc::new(OsRngCodeGenerator), digest)
}

/// Real Argon2 behind a recorder; the stored digest is produced before the
/// recorder is attached, so its counters start at zero.
pub async fn build_counting_app() -> (TestApp, Arc<CountingPasswordHasher>) {
    let digest = Argon2PasswordHasher
        .hash(TEST_PASSWORD)
        .await
        .expect("hash test password");
    let hasher = Arc::new(CountingPasswordHasher::new(Arc::new(Argon2PasswordHasher)));
    let app = wire(
        Arc::clone(&hasher) as Arc<dyn PasswordHasher>,
        Arc::new(SequenceCodeGenerator::default()),
        digest,
    );
    (app, hasher)
}

pub async fn make_test_router() -> axum::Router {
    build_test_app().await.router()
}

pub fn s256(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

pub fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = serde_urlencoded::to_string(fields).unwrap();
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

pub fn login_request(verifier: &str, state: Option<&str>, password: &str) -> Request<Body> {
    let challenge = s256(verifier);
    let mut fields = vec![
        ("email", TEST_EMAIL),
        ("password", password),
        ("client_id", CLIENT_ID),
        ("redirect_uri", REDIRECT_URI),
        ("code_challenge", challenge.as_str()),
        ("code_challenge_method", "S256"),
    ];
    if let Some(state) = state {
        fields.push(("state", state));
    }
    form_request("/auth/authorize", &fields)
}

pub fn token_request(code: &str, verifier: &str) -> Request<Body> {
    form_request(
        "/auth/token",
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", REDIRECT_URI),
            ("client_id", CLIENT_ID),
            ("code_verifier", verifier),
        ],
    )
}

/// Pull `code` and `state` back out of a redirect `Location`.
pub fn redirect_params(resp: &Response) -> (String, Option<String>) {
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header");
    let query = location
        .split_once('?')
        .map(|(_, q)| q)
        .expect("query on redirect");
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap();
    let code = pairs
        .iter()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.clone())
        .expect("code in redirect");
    let state = pairs
        .iter()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.clone());
    (code, state)
}

pub async fn response_json(resp: Response) -> Value {
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Assert an OAuth-style error body with the expected status and `error` code.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) {
    assert_eq!(resp.status(), expected_status);
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let json = response_json(resp).await;
    assert_eq!(json["error"], expected_error, "unexpected body: {json}");
    assert!(
        json["error_description"].as_str().is_some_and(|d| !d.is_empty()),
        "expected a non-empty error_description"
    );
}
