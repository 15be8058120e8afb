// src/application/commands/authorization/exchange.rs
use super::AuthorizationFlowService;
use crate::{
    application::{
        dto::{TokenResponseDto, TokenSubject},
        error::{ApplicationError, ApplicationResult},
    },
    domain::authorization::verify_challenge,
};

pub const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";

pub struct TokenExchangeCommand {
    pub grant_type: String,
    pub code: String,
    pub redirect_uri: String,
    pub client_id: String,
    pub code_verifier: String,
}

impl AuthorizationFlowService {
    pub async fn exchange(
        &self,
        command: TokenExchangeCommand,
    ) -> ApplicationResult<TokenResponseDto> {
        if command.grant_type != AUTHORIZATION_CODE_GRANT {
            return Err(ApplicationError::unsupported_grant_type(command.grant_type));
        }

        // From here on the code is gone from the store whatever happens next.
        let code = self
            .codes
            .consume(&command.code, &command.client_id, &command.redirect_uri)
            .await?
            .ok_or(ApplicationError::InvalidGrant)?;

        if !verify_challenge(
            &command.code_verifier,
            &code.code_challenge,
            code.code_challenge_method,
        ) {
            tracing::debug!(client_id = %code.client_id, "PKCE verification failed");
            return Err(ApplicationError::InvalidGrant);
        }

        let user = self
            .user_repo
            .find_by_id(code.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| {
                tracing::error!(
                    user_id = %code.user_id,
                    client_id = %code.client_id,
                    "authorization code references a user that is missing or deactivated"
                );
                ApplicationError::server_inconsistency(format!(
                    "user {} bound to authorization code not found or inactive",
                    code.user_id
                ))
            })?;

        let token = self.token_manager.issue(TokenSubject::from_user(&user)).await?;
        tracing::info!(user_id = %user.id, client_id = %code.client_id, "access token issued");

        Ok(TokenResponseDto::bearer(token))
    }
}
