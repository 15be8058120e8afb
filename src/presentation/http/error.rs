// src/presentation/http/error.rs
use crate::application::{ApplicationResult, error::ApplicationError};
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

const SERVER_ERROR_DESCRIPTION: &str = "internal server error";

/// OAuth-style error response: `{"error": ..., "error_description": ...}`.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    error: &'static str,
    description: String,
}

impl HttpError {
    pub fn from_error(err: ApplicationError) -> Self {
        if err.is_server_side() {
            tracing::warn!(error = %err, "request failed on the server side");
            return Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                SERVER_ERROR_DESCRIPTION,
            );
        }

        match err {
            ApplicationError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "incorrect email or password",
            ),
            ApplicationError::Unauthorized(msg) => {
                Self::new(StatusCode::UNAUTHORIZED, "invalid_token", msg)
            }
            ApplicationError::InvalidGrant => Self::new(
                StatusCode::BAD_REQUEST,
                "invalid_grant",
                "invalid or expired authorization code",
            ),
            ApplicationError::UnsupportedGrantType(grant_type) => Self::new(
                StatusCode::BAD_REQUEST,
                "unsupported_grant_type",
                format!("unsupported grant_type: {grant_type}"),
            ),
            ApplicationError::UnsupportedMethod(method) => Self::new(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                format!("unsupported code_challenge_method: {method}"),
            ),
            ApplicationError::Validation(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_request", msg)
            }
            ApplicationError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "conflict", msg),
            ApplicationError::Domain(domain_err) => Self::new(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                domain_err.to_string(),
            ),
            other => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                other.to_string(),
            ),
        }
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", msg)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn new(status: StatusCode, error: &'static str, description: impl Into<String>) -> Self {
        Self {
            status,
            error,
            description: description.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let payload = ErrorBody {
            error: self.error,
            error_description: self.description,
        };
        let mut response = (self.status, Json(payload)).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    error_description: String,
}

pub type HttpResult<T> = Result<T, HttpError>;

pub trait IntoHttpResult<T> {
    fn into_http(self) -> HttpResult<T>;
}

impl<T> IntoHttpResult<T> for ApplicationResult<T> {
    fn into_http(self) -> HttpResult<T> {
        self.map_err(HttpError::from_error)
    }
}
