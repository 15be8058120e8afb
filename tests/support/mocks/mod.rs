// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod security;
pub mod stores;
pub mod time;
pub mod user_repo;

pub use security::{CountingPasswordHasher, PlainPasswordHasher};
pub use stores::{FailingCodeStore, SequenceCodeGenerator};
pub use time::{MutableClock, fixed_now};
pub use user_repo::InMemoryUserRepo;
