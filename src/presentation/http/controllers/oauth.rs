// src/presentation/http/controllers/oauth.rs
use crate::application::{
    commands::authorization::{AuthorizeCommand, AuthorizeRequest, TokenExchangeCommand},
    dto::TokenResponseDto,
};
use crate::presentation::http::error::{HttpError, HttpResult, IntoHttpResult};
use crate::presentation::http::state::HttpState;
use crate::presentation::http::views;
use axum::{
    Extension, Form, Json,
    extract::Query,
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

/// Authorize parameters. Every field defaults so that missing values are
/// reported as `invalid_request` rather than a bare extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthorizeParams {
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: String,
    pub code_challenge_method: Option<String>,
    pub state: Option<String>,
}

impl From<AuthorizeParams> for AuthorizeRequest {
    fn from(params: AuthorizeParams) -> Self {
        AuthorizeRequest {
            client_id: params.client_id,
            redirect_uri: params.redirect_uri,
            code_challenge: params.code_challenge,
            code_challenge_method: params.code_challenge_method,
            state: params.state.filter(|state| !state.is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: String,
    pub code_challenge_method: Option<String>,
    pub state: Option<String>,
}

impl LoginForm {
    fn into_command(self) -> AuthorizeCommand {
        let params = AuthorizeParams {
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            code_challenge: self.code_challenge,
            code_challenge_method: self.code_challenge_method,
            state: self.state,
        };
        AuthorizeCommand {
            request: params.into(),
            email: self.email,
            password: self.password,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TokenForm {
    pub grant_type: String,
    pub code: String,
    pub redirect_uri: String,
    pub client_id: String,
    pub code_verifier: String,
}

pub async fn authorize_form(
    Extension(state): Extension<HttpState>,
    Query(params): Query<AuthorizeParams>,
) -> HttpResult<Html<String>> {
    let request = state
        .services
        .authorization
        .prepare_authorization(params.into())
        .into_http()?;

    Ok(Html(views::login_page(&request)))
}

pub async fn authorize(
    Extension(state): Extension<HttpState>,
    Form(form): Form<LoginForm>,
) -> HttpResult<Response> {
    let command = form.into_command();

    let redirect = state
        .services
        .authorization
        .authorize(command)
        .await
        .into_http()?;

    let location = HeaderValue::from_str(&redirect.location)
        .map_err(|_| HttpError::invalid_request("redirect_uri is not a valid header value"))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

pub async fn token(
    Extension(state): Extension<HttpState>,
    Form(form): Form<TokenForm>,
) -> HttpResult<Json<TokenResponseDto>> {
    let command = TokenExchangeCommand {
        grant_type: form.grant_type,
        code: form.code,
        redirect_uri: form.redirect_uri,
        client_id: form.client_id,
        code_verifier: form.code_verifier,
    };

    state
        .services
        .authorization
        .exchange(command)
        .await
        .into_http()
        .map(Json)
}
