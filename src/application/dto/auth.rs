use crate::domain::user::{User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signed access token as produced by a `TokenManager`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokenDto {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expires_in: i64,
}

/// Body of a successful token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponseDto {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokenResponseDto {
    pub const BEARER: &'static str = "bearer";

    pub fn bearer(token: AuthTokenDto) -> Self {
        Self {
            access_token: token.token,
            token_type: Self::BEARER.to_string(),
            expires_in: token.expires_in,
        }
    }
}

/// Outcome of a successful login on the authorize leg.
#[derive(Debug, Clone)]
pub struct AuthorizationRedirect {
    /// `redirect_uri` with `code` (and `state`, when given) appended.
    pub location: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    /// The `sub` claim the token was issued for.
    pub fn subject(&self) -> String {
        self.id.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct TokenSubject {
    pub user_id: UserId,
    pub email: String,
}

impl TokenSubject {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.to_string(),
        }
    }
}
