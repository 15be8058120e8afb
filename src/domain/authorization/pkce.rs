// src/domain/authorization/pkce.rs
//! PKCE challenge derivation and verification (RFC 7636).

use crate::domain::errors::{DomainError, DomainResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodeChallengeMethod {
    #[default]
    S256,
    Plain,
}

impl CodeChallengeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeChallengeMethod::S256 => "S256",
            CodeChallengeMethod::Plain => "plain",
        }
    }
}

impl fmt::Display for CodeChallengeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeChallengeMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "S256" => Ok(CodeChallengeMethod::S256),
            "plain" => Ok(CodeChallengeMethod::Plain),
            other => Err(DomainError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Derive the challenge a client sends at authorize time from its verifier.
///
/// The verifier is interpreted as ASCII; any other input is rejected.
pub fn derive_challenge(verifier: &str, method: CodeChallengeMethod) -> DomainResult<String> {
    if !verifier.is_ascii() {
        return Err(DomainError::Validation(
            "code_verifier must be ASCII".into(),
        ));
    }

    Ok(match method {
        CodeChallengeMethod::S256 => URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes())),
        CodeChallengeMethod::Plain => verifier.to_owned(),
    })
}

/// Recompute the challenge for `verifier` and compare it with the stored one.
pub fn verify_challenge(verifier: &str, challenge: &str, method: CodeChallengeMethod) -> bool {
    match derive_challenge(verifier, method) {
        Ok(derived) => constant_time_eq(derived.as_bytes(), challenge.as_bytes()),
        Err(_) => false,
    }
}

// Length is not secret; only the byte contents are compared without early exit.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
