// src/infrastructure/security/postgres_authorization_code_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::authorization_code::AuthorizationCodeStore;
use crate::domain::authorization::{AuthorizationCode, CodeChallengeMethod};
use crate::domain::errors::DomainError;
use crate::domain::user::UserId;
use crate::infrastructure::repositories::map_sqlx;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

const RETURNING_COLUMNS: &str =
    "code, user_id, client_id, redirect_uri, code_challenge, code_challenge_method, expires_at";

/// Codes live in `authorization_codes`. Consumption is a single
/// `DELETE ... RETURNING`, so Postgres row locking decides the one winner.
#[derive(Clone)]
pub struct PostgresAuthorizationCodeStore {
    pool: PgPool,
}

impl PostgresAuthorizationCodeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuthorizationCodeRow {
    code: String,
    user_id: i64,
    client_id: String,
    redirect_uri: String,
    code_challenge: String,
    code_challenge_method: String,
    expires_at: DateTime<Utc>,
}

impl TryFrom<AuthorizationCodeRow> for AuthorizationCode {
    type Error = DomainError;

    fn try_from(row: AuthorizationCodeRow) -> Result<Self, Self::Error> {
        let code_challenge_method = row
            .code_challenge_method
            .parse::<CodeChallengeMethod>()
            .map_err(|err| DomainError::Persistence(format!("corrupt authorization code: {err}")))?;

        Ok(AuthorizationCode {
            code: row.code,
            user_id: UserId::new(row.user_id)?,
            client_id: row.client_id,
            redirect_uri: row.redirect_uri,
            code_challenge: row.code_challenge,
            code_challenge_method,
            expires_at: row.expires_at,
        })
    }
}

fn persistence(err: sqlx::Error) -> ApplicationError {
    ApplicationError::persistence(map_sqlx(err).to_string())
}

#[async_trait]
impl AuthorizationCodeStore for PostgresAuthorizationCodeStore {
    async fn insert(&self, code: &AuthorizationCode) -> ApplicationResult<()> {
        sqlx::query(
            "INSERT INTO authorization_codes
                (code, user_id, client_id, redirect_uri, code_challenge, code_challenge_method, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&code.code)
        .bind(i64::from(code.user_id))
        .bind(&code.client_id)
        .bind(&code.redirect_uri)
        .bind(&code.code_challenge)
        .bind(code.code_challenge_method.as_str())
        .bind(code.expires_at)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(())
    }

    async fn take(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        let row = sqlx::query_as::<_, AuthorizationCodeRow>(&format!(
            "DELETE FROM authorization_codes WHERE code = $1 RETURNING {RETURNING_COLUMNS}"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;

        row.map(AuthorizationCode::try_from)
            .transpose()
            .map_err(|err| ApplicationError::persistence(err.to_string()))
    }

    async fn delete(&self, code: &str) -> ApplicationResult<()> {
        sqlx::query("DELETE FROM authorization_codes WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> ApplicationResult<u64> {
        let result = sqlx::query("DELETE FROM authorization_codes WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(result.rows_affected())
    }
}
