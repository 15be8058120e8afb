// src/application/commands/authorization/codes.rs
use crate::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::{authorization_code::AuthorizationCodeStore, time::Clock, util::CodeGenerator},
};
use crate::domain::{
    authorization::{AuthorizationCode, CodeChallengeMethod},
    user::UserId,
};
use chrono::Duration as ChronoDuration;
use std::{sync::Arc, time::Duration};

pub const DEFAULT_CODE_TTL: Duration = Duration::from_secs(600);

pub struct IssueCodeCommand {
    pub user_id: UserId,
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: String,
    pub code_challenge_method: CodeChallengeMethod,
}

/// Issues, consumes and expires authorization codes on top of an atomic store.
pub struct AuthorizationCodeService {
    store: Arc<dyn AuthorizationCodeStore>,
    generator: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl AuthorizationCodeService {
    pub fn new(
        store: Arc<dyn AuthorizationCodeStore>,
        generator: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn issue(&self, command: IssueCodeCommand) -> ApplicationResult<AuthorizationCode> {
        self.issue_with_ttl(command, self.ttl).await
    }

    /// The record is only handed back once the store has accepted it.
    pub async fn issue_with_ttl(
        &self,
        command: IssueCodeCommand,
        ttl: Duration,
    ) -> ApplicationResult<AuthorizationCode> {
        let ttl = ChronoDuration::from_std(ttl)
            .map_err(|_| ApplicationError::validation("authorization code ttl out of range"))?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl)
            .ok_or_else(|| ApplicationError::validation("authorization code expiry overflow"))?;

        let code = AuthorizationCode {
            code: self.generator.generate(),
            user_id: command.user_id,
            client_id: command.client_id,
            redirect_uri: command.redirect_uri,
            code_challenge: command.code_challenge,
            code_challenge_method: command.code_challenge_method,
            expires_at,
        };

        self.store.insert(&code).await.map_err(|err| match err {
            ApplicationError::Persistence(_) => err,
            other => ApplicationError::persistence(other.to_string()),
        })?;

        tracing::info!(
            user_id = %code.user_id,
            client_id = %code.client_id,
            expires_at = %code.expires_at,
            "authorization code issued"
        );

        Ok(code)
    }

    /// Fetch-and-invalidate. The record is removed before any check runs, so a
    /// mismatched or expired presentation burns the code just like a success.
    /// Returns `None` for unknown, mismatched and expired codes alike.
    pub async fn consume(
        &self,
        code: &str,
        client_id: &str,
        redirect_uri: &str,
    ) -> ApplicationResult<Option<AuthorizationCode>> {
        let Some(stored) = self.store.take(code).await? else {
            tracing::debug!(client_id, "authorization code unknown or already used");
            return Ok(None);
        };

        if !stored.is_bound_to(client_id, redirect_uri) {
            tracing::debug!(
                client_id,
                bound_client_id = %stored.client_id,
                "authorization code presented with mismatched client or redirect; invalidated"
            );
            return Ok(None);
        }

        if stored.is_expired_at(self.clock.now()) {
            tracing::debug!(client_id, expires_at = %stored.expires_at, "authorization code expired");
            return Ok(None);
        }

        Ok(Some(stored))
    }

    pub async fn delete(&self, code: &str) -> ApplicationResult<()> {
        self.store.delete(code).await
    }

    pub async fn purge_expired(&self) -> ApplicationResult<u64> {
        let purged = self.store.purge_expired(self.clock.now()).await?;
        if purged > 0 {
            tracing::debug!(purged, "expired authorization codes purged");
        }
        Ok(purged)
    }
}
