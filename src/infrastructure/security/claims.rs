// src/infrastructure/security/claims.rs
use crate::application::{
    dto::AuthenticatedUser,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::user::UserId;
use biscuit_auth::builder::{Fact, Predicate, Term};
use chrono::{DateTime, Utc};

/// Rebuild the caller identity from the authority facts of a verified token.
pub fn parse_claims(facts: Vec<Fact>) -> ApplicationResult<AuthenticatedUser> {
    let ctx = ClaimsContext::from_facts(facts);

    let user_id = ctx
        .user_id
        .ok_or_else(|| ApplicationError::unauthorized("missing user id"))?;
    let email = ctx
        .email
        .ok_or_else(|| ApplicationError::unauthorized("missing email"))?;
    let issued_at = ctx
        .issued_at
        .ok_or_else(|| ApplicationError::unauthorized("missing issued_at"))?;
    let expires_at = ctx
        .expires_at
        .ok_or_else(|| ApplicationError::unauthorized("missing expires_at"))?;

    let id = UserId::new(user_id).map_err(|err| ApplicationError::unauthorized(err.to_string()))?;

    Ok(AuthenticatedUser {
        id,
        email,
        issued_at,
        expires_at,
    })
}

#[derive(Default)]
struct ClaimsContext {
    user_id: Option<i64>,
    email: Option<String>,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

impl ClaimsContext {
    fn from_facts(facts: Vec<Fact>) -> Self {
        let mut ctx = ClaimsContext::default();
        for fact in facts {
            ctx.apply_predicate(fact.predicate);
        }
        ctx
    }

    fn apply_predicate(&mut self, predicate: Predicate) {
        match predicate.name.as_str() {
            "user" => self.handle_user(&predicate),
            "issued_at" => self.issued_at = date_term(&predicate),
            "expires_at" => self.expires_at = date_term(&predicate),
            _ => {}
        }
    }

    fn handle_user(&mut self, predicate: &Predicate) {
        if let [Term::Integer(id), Term::Str(email)] = predicate.terms.as_slice() {
            self.user_id = Some(*id);
            self.email = Some(email.clone());
        }
    }
}

fn date_term(predicate: &Predicate) -> Option<DateTime<Utc>> {
    match predicate.terms.first() {
        Some(Term::Date(seconds)) => {
            DateTime::<Utc>::from_timestamp(i64::try_from(*seconds).ok()?, 0)
        }
        _ => None,
    }
}
