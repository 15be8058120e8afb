// src/domain/authorization/code.rs
use super::pkce::CodeChallengeMethod;
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};

/// Single-use credential bound to a user, a client, a redirect URI and a
/// PKCE challenge. Never updated after issuance; only inserted and removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCode {
    pub code: String,
    pub user_id: UserId,
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: String,
    pub code_challenge_method: CodeChallengeMethod,
    pub expires_at: DateTime<Utc>,
}

impl AuthorizationCode {
    /// A code is dead from `expires_at` onwards (inclusive).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Exact, case-sensitive match on both bound values.
    pub fn is_bound_to(&self, client_id: &str, redirect_uri: &str) -> bool {
        self.client_id == client_id && self.redirect_uri == redirect_uri
    }
}
