// src/application/ports/authorization_code.rs
use crate::application::ApplicationResult;
use crate::domain::authorization::AuthorizationCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence primitive for authorization codes.
///
/// Implementations must make `take` atomic: for a given code, at most one
/// concurrent caller ever receives `Some`.
#[async_trait]
pub trait AuthorizationCodeStore: Send + Sync {
    /// Persist a new code. Must fail (never overwrite) if the value already exists.
    async fn insert(&self, code: &AuthorizationCode) -> ApplicationResult<()>;

    /// Atomically remove the code and return the stored record if it was present.
    async fn take(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>>;

    /// Idempotent removal.
    async fn delete(&self, code: &str) -> ApplicationResult<()>;

    /// Remove every code whose `expires_at` is at or before `now`; returns the count.
    async fn purge_expired(&self, now: DateTime<Utc>) -> ApplicationResult<u64>;
}
