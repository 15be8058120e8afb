use std::sync::Arc;

use tokio::sync::OnceCell;

use super::AuthorizationCodeService;
use crate::application::ports::security::{PasswordHasher, TokenManager};
use crate::domain::user::UserRepository;

/// Drives both legs of the authorization-code + PKCE protocol.
pub struct AuthorizationFlowService {
    pub(super) user_repo: Arc<dyn UserRepository>,
    pub(super) password_hasher: Arc<dyn PasswordHasher>,
    pub(super) token_manager: Arc<dyn TokenManager>,
    pub(super) codes: Arc<AuthorizationCodeService>,
    /// Digest verified against when no usable account matches the login, so
    /// rejected logins cost one hash whether or not the account exists.
    pub(super) decoy_digest: OnceCell<String>,
}

impl AuthorizationFlowService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_manager: Arc<dyn TokenManager>,
        codes: Arc<AuthorizationCodeService>,
    ) -> Self {
        Self {
            user_repo,
            password_hasher,
            token_manager,
            codes,
            decoy_digest: OnceCell::new(),
        }
    }
}
