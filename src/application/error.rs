// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(DomainError),

    /// Unknown user and wrong password are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unsupported code_challenge_method: {0}")]
    UnsupportedMethod(String),

    #[error("unsupported grant_type: {0}")]
    UnsupportedGrantType(String),

    /// Covers unknown, expired, mis-bound and PKCE-failed codes alike.
    #[error("invalid grant")]
    InvalidGrant,

    #[error("server inconsistency: {0}")]
    ServerInconsistency(String),

    #[error("persistence failure: {0}")]
    Persistence(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn unsupported_method(method: impl Into<String>) -> Self {
        Self::UnsupportedMethod(method.into())
    }

    pub fn unsupported_grant_type(grant_type: impl Into<String>) -> Self {
        Self::UnsupportedGrantType(grant_type.into())
    }

    pub fn server_inconsistency(msg: impl Into<String>) -> Self {
        Self::ServerInconsistency(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// True for failures on our side rather than the caller's.
    pub fn is_server_side(&self) -> bool {
        matches!(
            self,
            Self::ServerInconsistency(_)
                | Self::Persistence(_)
                | Self::Infrastructure(_)
                | Self::Domain(DomainError::Persistence(_))
        )
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UnsupportedMethod(method) => Self::UnsupportedMethod(method),
            DomainError::Persistence(msg) => Self::Persistence(msg),
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Domain(other),
        }
    }
}
