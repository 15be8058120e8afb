// src/domain/authorization/mod.rs
pub mod code;
pub mod pkce;

pub use code::AuthorizationCode;
pub use pkce::{CodeChallengeMethod, derive_challenge, verify_challenge};
