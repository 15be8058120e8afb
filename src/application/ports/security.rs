// src/application/ports/security.rs
use crate::application::{
    ApplicationResult,
    dto::{AuthTokenDto, AuthenticatedUser, TokenSubject},
};
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a self-describing salted digest (salt and parameters embedded).
    async fn hash(&self, password: &str) -> ApplicationResult<String>;

    /// `Ok(false)` for a wrong password *or* a malformed digest. `Err` is
    /// reserved for failures of the hashing machinery itself.
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<bool>;
}

#[async_trait]
pub trait TokenManager: Send + Sync {
    async fn issue(&self, subject: TokenSubject) -> ApplicationResult<AuthTokenDto>;

    /// Fails closed with `Unauthorized` on any decode, signature or expiry problem.
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser>;
}
