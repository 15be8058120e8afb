// src/application/commands/authorization/authorize.rs
use super::{AuthorizationFlowService, IssueCodeCommand};
use crate::{
    application::{
        dto::AuthorizationRedirect,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        authorization::CodeChallengeMethod,
        user::{Email, User},
    },
};

const DECOY_PASSWORD: &str = "decoy-password-never-assigned";

/// Parameters a client sends to the authorize endpoint.
#[derive(Debug, Clone, Default)]
pub struct AuthorizeRequest {
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: String,
    /// `None` means the client did not send one; it defaults to `S256`.
    pub code_challenge_method: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAuthorizeRequest {
    pub client_id: String,
    pub redirect_uri: String,
    pub code_challenge: String,
    pub code_challenge_method: CodeChallengeMethod,
    pub state: Option<String>,
}

impl AuthorizeRequest {
    pub fn validate(self) -> ApplicationResult<ValidatedAuthorizeRequest> {
        let code_challenge_method = match self.code_challenge_method.as_deref() {
            None | Some("") => CodeChallengeMethod::default(),
            Some(method) => method.parse::<CodeChallengeMethod>()?,
        };

        require_non_empty("client_id", &self.client_id)?;
        require_non_empty("redirect_uri", &self.redirect_uri)?;
        require_non_empty("code_challenge", &self.code_challenge)?;
        require_header_safe("redirect_uri", &self.redirect_uri)?;

        Ok(ValidatedAuthorizeRequest {
            client_id: self.client_id,
            redirect_uri: self.redirect_uri,
            code_challenge: self.code_challenge,
            code_challenge_method,
            state: self.state,
        })
    }
}

fn require_non_empty(field: &str, value: &str) -> ApplicationResult<()> {
    if value.trim().is_empty() {
        return Err(ApplicationError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// The redirect target ends up verbatim in a `Location` header, so it must be
/// visible ASCII with no whitespace.
fn require_header_safe(field: &str, value: &str) -> ApplicationResult<()> {
    if !value.bytes().all(|byte| byte.is_ascii_graphic()) {
        return Err(ApplicationError::validation(format!(
            "{field} must be visible ASCII without whitespace"
        )));
    }
    Ok(())
}

/// Credentials submitted from the login form together with the echoed request.
pub struct AuthorizeCommand {
    pub request: AuthorizeRequest,
    pub email: String,
    pub password: String,
}

impl AuthorizationFlowService {
    /// First half of the authorize leg: checks the request before credentials
    /// are collected.
    pub fn prepare_authorization(
        &self,
        request: AuthorizeRequest,
    ) -> ApplicationResult<ValidatedAuthorizeRequest> {
        request.validate()
    }

    pub async fn authorize(
        &self,
        command: AuthorizeCommand,
    ) -> ApplicationResult<AuthorizationRedirect> {
        let request = command.request.validate()?;
        let user = self
            .authenticate(&command.email, &command.password)
            .await?;

        let code = self
            .codes
            .issue(IssueCodeCommand {
                user_id: user.id,
                client_id: request.client_id,
                redirect_uri: request.redirect_uri,
                code_challenge: request.code_challenge,
                code_challenge_method: request.code_challenge_method,
            })
            .await?;

        let location = build_redirect_location(
            &code.redirect_uri,
            &code.code,
            request.state.as_deref(),
        )?;

        Ok(AuthorizationRedirect {
            location,
            code: code.code,
            expires_at: code.expires_at,
        })
    }

    async fn authenticate(&self, email: &str, password: &str) -> ApplicationResult<User> {
        let user = match Email::new(email) {
            Ok(email) => self.user_repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user.filter(|user| user.is_active) else {
            let decoy = self.decoy_digest().await?;
            self.password_hasher.verify(password, decoy).await?;
            tracing::debug!("login rejected: no active account for email");
            return Err(ApplicationError::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify(password, user.password_hash.as_str())
            .await?
        {
            return Err(ApplicationError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn decoy_digest(&self) -> ApplicationResult<&str> {
        self.decoy_digest
            .get_or_try_init(|| self.password_hasher.hash(DECOY_PASSWORD))
            .await
            .map(String::as_str)
    }
}

/// `redirect_uri` plus `code` and, when present, `state`. Values are
/// form-encoded so `state` decodes back to exactly what the client sent.
pub(super) fn build_redirect_location(
    redirect_uri: &str,
    code: &str,
    state: Option<&str>,
) -> ApplicationResult<String> {
    let mut params = vec![("code", code)];
    if let Some(state) = state {
        params.push(("state", state));
    }

    let query = serde_urlencoded::to_string(&params)
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

    let separator = if redirect_uri.contains('?') { '&' } else { '?' };
    Ok(format!("{redirect_uri}{separator}{query}"))
}
