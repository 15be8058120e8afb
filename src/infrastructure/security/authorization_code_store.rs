// src/infrastructure/security/authorization_code_store.rs
use crate::application::ApplicationResult;
use crate::application::error::ApplicationError;
use crate::application::ports::authorization_code::AuthorizationCodeStore;
use crate::domain::authorization::AuthorizationCode;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, hash_map::Entry};
use std::sync::{Mutex, MutexGuard};

/// Process-local store. `take` removes under the map lock, which is what
/// gives it at-most-once semantics.
#[derive(Default)]
pub struct InMemoryAuthorizationCodeStore {
    // code -> AuthorizationCode
    inner: Mutex<HashMap<String, AuthorizationCode>>,
}

impl InMemoryAuthorizationCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> ApplicationResult<MutexGuard<'_, HashMap<String, AuthorizationCode>>> {
        self.inner
            .lock()
            .map_err(|_| ApplicationError::persistence("authorization code store lock poisoned"))
    }
}

#[async_trait]
impl AuthorizationCodeStore for InMemoryAuthorizationCodeStore {
    async fn insert(&self, code: &AuthorizationCode) -> ApplicationResult<()> {
        let mut guard = self.lock()?;
        match guard.entry(code.code.clone()) {
            Entry::Occupied(_) => Err(ApplicationError::persistence(
                "authorization code already exists",
            )),
            Entry::Vacant(slot) => {
                slot.insert(code.clone());
                Ok(())
            }
        }
    }

    async fn take(&self, code: &str) -> ApplicationResult<Option<AuthorizationCode>> {
        let mut guard = self.lock()?;
        Ok(guard.remove(code))
    }

    async fn delete(&self, code: &str) -> ApplicationResult<()> {
        let mut guard = self.lock()?;
        guard.remove(code);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> ApplicationResult<u64> {
        let mut guard = self.lock()?;
        let before = guard.len();
        guard.retain(|_, code| !code.is_expired_at(now));
        Ok((before - guard.len()) as u64)
    }
}
