// tests/support/mocks/user_repo.rs
use async_trait::async_trait;
use eshop_auth::domain::errors::{DomainError, DomainResult};
use eshop_auth::domain::user::{Email, NewUser, User, UserId, UserRepository};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryUserRepo {
    inner: Mutex<HashMap<i64, User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        for user in users {
            repo.put(user);
        }
        repo
    }

    pub fn put(&self, user: User) {
        self.inner
            .lock()
            .unwrap()
            .insert(i64::from(user.id), user);
    }

    pub fn remove(&self, id: i64) {
        self.inner.lock().unwrap().remove(&id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepo {
    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        let mut map = self.inner.lock().unwrap();
        if map.values().any(|u| u.email == new_user.email) {
            return Err(DomainError::Conflict("email already registered".into()));
        }
        let id = map.keys().max().copied().unwrap_or(0) + 1;
        let user = User {
            id: UserId::new(id)?,
            email: new_user.email,
            name: new_user.name,
            password_hash: new_user.password_hash,
            is_active: new_user.is_active,
            created_at: new_user.created_at,
        };
        map.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        let map = self.inner.lock().unwrap();
        Ok(map.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        let map = self.inner.lock().unwrap();
        Ok(map.get(&i64::from(id)).cloned())
    }
}
