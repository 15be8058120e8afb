// tests/support/builders.rs
use eshop_auth::domain::user::{Email, PasswordHash, User, UserId};

use super::mocks::fixed_now;

pub struct UserBuilder {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    is_active: bool,
}

impl UserBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            email: "alice@example.com".into(),
            name: "Alice".into(),
            password_hash: "plain$correct horse".into(),
            is_active: true,
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> User {
        User {
            id: UserId::new(self.id).unwrap(),
            email: Email::new(self.email).unwrap(),
            name: self.name,
            password_hash: PasswordHash::new(self.password_hash).unwrap(),
            is_active: self.is_active,
            created_at: fixed_now(),
        }
    }
}
