// src/domain/user/entity.rs
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::value_objects::{Email, PasswordHash, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub password_hash: PasswordHash,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Stable identifier embedded as the subject of issued access tokens.
    pub fn subject(&self) -> String {
        i64::from(self.id).to_string()
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub name: String,
    pub password_hash: PasswordHash,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(
        email: Email,
        name: impl Into<String>,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::Validation("name cannot be empty".into()));
        }
        Ok(Self {
            email,
            name,
            password_hash,
            is_active: true,
            created_at,
        })
    }
}
