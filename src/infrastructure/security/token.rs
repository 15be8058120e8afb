// src/infrastructure/security/token.rs
use crate::application::{
    dto::{AuthTokenDto, AuthenticatedUser, TokenSubject},
    error::{ApplicationError, ApplicationResult},
    ports::{security::TokenManager, time::Clock},
};
use async_trait::async_trait;
use biscuit_auth::{
    Biscuit, KeyPair, PrivateKey, PublicKey,
    builder::{Algorithm, AuthorizerBuilder, Term},
};
use chrono::{DateTime, Duration as ChronoDuration, SubsecRound, Utc};
use std::{collections::HashMap, sync::Arc, time::Duration};

const TOKEN_CODE: &str = r#"
    user({uid}, {email});
    issued_at({issued});
    expires_at({exp});
    token_type("access");
    check if time($now), $now >= {issued};
    check if time($now), $now < {exp};
    check if token_type("access");
"#;

const AUTHORIZER_CODE: &str = r#"
    time({now});
    allow if true;
"#;

/// Ed25519-signed biscuit bearer tokens. Validity is signature plus the
/// embedded time checks, evaluated against the injected clock.
#[derive(Clone)]
pub struct BiscuitTokenManager {
    root: Arc<KeyPair>,
    public: PublicKey,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl BiscuitTokenManager {
    pub fn new(
        private_key_hex: &str,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> ApplicationResult<Self> {
        let private = PrivateKey::from_bytes_hex(private_key_hex, Algorithm::Ed25519)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        let keypair = KeyPair::from(&private);
        let public = keypair.public();

        Ok(Self {
            root: Arc::new(keypair),
            public,
            ttl,
            clock,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn date_term(at: DateTime<Utc>) -> Term {
    Term::Date(u64::try_from(at.timestamp()).unwrap_or(0))
}

fn build_params(
    subject: &TokenSubject,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
) -> HashMap<String, Term> {
    let mut params: HashMap<String, Term> = HashMap::new();
    params.insert("uid".to_string(), i64::from(subject.user_id).into());
    params.insert("email".to_string(), subject.email.clone().into());
    params.insert("issued".to_string(), date_term(issued_at));
    params.insert("exp".to_string(), date_term(expires_at));
    params
}

fn build_and_serialize_biscuit(
    params: HashMap<String, Term>,
    root: &KeyPair,
) -> Result<String, ApplicationError> {
    let token = Biscuit::builder()
        .code_with_params(TOKEN_CODE, params, HashMap::new())
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
        .build(root)
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

    token
        .seal()
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
        .to_base64()
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))
}

#[async_trait]
impl TokenManager for BiscuitTokenManager {
    async fn issue(&self, subject: TokenSubject) -> ApplicationResult<AuthTokenDto> {
        // biscuit dates carry whole seconds
        let issued_at = self.clock.now().trunc_subsecs(0);
        let ttl = ChronoDuration::from_std(self.ttl)
            .map_err(|_| ApplicationError::infrastructure("token ttl out of range"))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| ApplicationError::infrastructure("token expiration overflow"))?;

        let token = build_and_serialize_biscuit(
            build_params(&subject, issued_at, expires_at),
            self.root.as_ref(),
        )?;

        Ok(AuthTokenDto {
            token,
            issued_at,
            expires_at,
            expires_in: ttl.num_seconds().max(0),
        })
    }

    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let biscuit = Biscuit::from_base64(token, self.public)
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;

        let mut params: HashMap<String, Term> = HashMap::new();
        params.insert("now".to_string(), date_term(self.clock.now()));

        let mut authorizer = AuthorizerBuilder::new()
            .code_with_params(AUTHORIZER_CODE, params, HashMap::new())
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
            .build(&biscuit)
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;

        authorizer
            .authorize()
            .map_err(|err| ApplicationError::unauthorized(err.to_string()))?;

        let (facts, _, _, _) = authorizer.dump();
        crate::infrastructure::security::claims::parse_claims(facts)
    }
}
