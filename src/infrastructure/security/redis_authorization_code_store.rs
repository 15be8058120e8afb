// src/infrastructure/security/redis_authorization_code_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::authorization_code::AuthorizationCodeStore;
use crate::domain::authorization::{AuthorizationCode, CodeChallengeMethod};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

const KEY_PREFIX: &str = "authcode:";

// SET NX never overwrites; EXPIREAT lets Redis drop the key at `expires_at`.
const INSERT_SCRIPT: &str = r#"
    if redis.call('SET', KEYS[1], ARGV[1], 'NX') then
        redis.call('EXPIREAT', KEYS[1], ARGV[2])
        return 1
    else
        return 0
    end
"#;

// GET and DEL in one script: only one caller can observe the value.
const TAKE_SCRIPT: &str = r#"
    local value = redis.call('GET', KEYS[1])
    if value then
        redis.call('DEL', KEYS[1])
    end
    return value
"#;

#[derive(Clone)]
pub struct RedisAuthorizationCodeStore {
    pool: Pool,
}

impl RedisAuthorizationCodeStore {
    /// Create a store from a redis URL (e.g. redis://:password@host:6379/0)
    pub fn from_url(url: &str) -> Result<Self, ApplicationError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self { pool })
    }

    async fn connection(&self) -> ApplicationResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| ApplicationError::persistence(err.to_string()))
    }
}

fn key(code: &str) -> String {
    format!("{KEY_PREFIX}{code}")
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCode {
    user_id: i64,
    client_id: String,
    redirect_uri: String,
    code_challenge: String,
    code_challenge_method: String,
    expires_at: DateTime<Utc>,
}

impl StoredCode {
    fn from_code(code: &AuthorizationCode) -> Self {
        Self {
            user_id: i64::from(code.user_id),
            client_id: code.client_id.clone(),
            redirect_uri: code.redirect_uri.clone(),
            code_challenge: code.code_challenge.clone(),
            code_challenge_method: code.code_challenge_method.as_str().to_string(),
            expires_at: code.expires_at,
        }
    }

    fn into_code(self, code: &str) -> ApplicationResult<AuthorizationCode> {
        let corrupt = |err: String| {
            ApplicationError::persistence(format!("corrupt authorization code record: {err}"))
        };
        Ok(AuthorizationCode {
            code: code.to_string(),
            user_id: UserId::new(self.user_id).map_err(|err| corrupt(err.to_string()))?,
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            code_challenge: self.code_challenge,
            code_challenge_method: self
                .code_challenge_method
                .parse::<CodeChallengeMethod>()
                .map_err(|err| corrupt(err.to_string()))?,
            expires_at: self.expires_at,
        })
    }
}

#[async_trait]
impl AuthorizationCodeStore for RedisAuthorizationCodeStore {
    async fn insert(&self, code: &AuthorizationCode) -> ApplicationResult<()> {
        let mut conn = self.connection().await?;
        let payload = serde_json::to_string(&StoredCode::from_code(code))
            .map_err(|err| ApplicationError::persistence(err.to_string()))?;

        let inserted: i32 = redis::cmd("EVAL")
            .arg(INSERT_SCRIPT)
            .arg(1)
            .arg(key(&code.code))
            .arg(payload)
            .arg(code.expires_at.timestamp())
            .query_async(&mut conn)
            .await
            .map_err(|err| ApplicationError::persistence(err.to_string()))?;

        if inserted == 1 {
            Ok(())
        } else {
            Err(ApplicationError::persistence("authorization code already exists"))
        }
    }

    async fn take(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = redis::cmd("EVAL")
            .arg(TAKE_SCRIPT)
            .arg(1)
            .arg(key(code))
            .query_async(&mut conn)
            .await
            .map_err(|err| ApplicationError::persistence(err.to_string()))?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let stored: StoredCode = serde_json::from_str(&payload)
            .map_err(|err| ApplicationError::persistence(err.to_string()))?;
        stored.into_code(code).map(Some)
    }

    async fn delete(&self, code: &str) -> ApplicationResult<()> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key(code))
            .await
            .map_err(|err| ApplicationError::persistence(err.to_string()))?;
        Ok(())
    }

    /// Redis expires keys on its own via EXPIREAT.
    async fn purge_expired(&self, _now: DateTime<Utc>) -> ApplicationResult<u64> {
        Ok(0)
    }
}
