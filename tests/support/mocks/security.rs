// tests/support/mocks/security.rs
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use eshop_auth::application::{ApplicationResult, ports::security::PasswordHasher};

/// Cheap reversible "hash" for flow tests that do not exercise Argon2.
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("plain${password}"))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<bool> {
        Ok(expected_hash
            .strip_prefix("plain$")
            .is_some_and(|stored| stored == password))
    }
}

/// Delegates to a real hasher and records every digest `verify` was asked
/// to check against.
pub struct CountingPasswordHasher {
    inner: Arc<dyn PasswordHasher>,
    hashes: AtomicUsize,
    verified_digests: Mutex<Vec<String>>,
}

impl CountingPasswordHasher {
    pub fn new(inner: Arc<dyn PasswordHasher>) -> Self {
        Self {
            inner,
            hashes: AtomicUsize::new(0),
            verified_digests: Mutex::new(Vec::new()),
        }
    }

    pub fn hash_calls(&self) -> usize {
        self.hashes.load(Ordering::SeqCst)
    }

    pub fn verified_digests(&self) -> Vec<String> {
        self.verified_digests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PasswordHasher for CountingPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        self.inner.hash(password).await
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<bool> {
        self.verified_digests
            .lock()
            .unwrap()
            .push(expected_hash.to_owned());
        self.inner.verify(password, expected_hash).await
    }
}
