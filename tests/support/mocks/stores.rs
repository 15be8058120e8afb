// tests/support/mocks/stores.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eshop_auth::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{authorization_code::AuthorizationCodeStore, util::CodeGenerator},
};
use eshop_auth::domain::authorization::AuthorizationCode;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Store whose backend is down.
pub struct FailingCodeStore;

#[async_trait]
impl AuthorizationCodeStore for FailingCodeStore {
    async fn insert(&self, _code: &AuthorizationCode) -> ApplicationResult<()> {
        Err(ApplicationError::persistence("connection refused"))
    }

    async fn take(&self, _code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        Err(ApplicationError::persistence("connection refused"))
    }

    async fn delete(&self, _code: &str) -> ApplicationResult<()> {
        Err(ApplicationError::persistence("connection refused"))
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> ApplicationResult<u64> {
        Err(ApplicationError::persistence("connection refused"))
    }
}

/// Predictable codes: `code-1`, `code-2`, ...
#[derive(Default)]
pub struct SequenceCodeGenerator {
    next: AtomicUsize,
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> String {
        format!("code-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
