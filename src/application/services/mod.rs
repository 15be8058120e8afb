// src/application/services/mod.rs
use std::{sync::Arc, time::Duration};

use crate::{
    application::{
        ApplicationResult,
        commands::{
            authorization::{AuthorizationCodeService, AuthorizationFlowService},
            users::UserCommandService,
        },
        dto::AuthenticatedUser,
        ports::{
            authorization_code::AuthorizationCodeStore,
            security::{PasswordHasher, TokenManager},
            time::Clock,
            util::CodeGenerator,
        },
        queries::users::UserQueryService,
    },
    domain::user::UserRepository,
};

pub struct ApplicationServices {
    pub authorization: Arc<AuthorizationFlowService>,
    pub authorization_codes: Arc<AuthorizationCodeService>,
    pub user_commands: Arc<UserCommandService>,
    pub user_queries: Arc<UserQueryService>,
    token_manager: Arc<dyn TokenManager>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        code_store: Arc<dyn AuthorizationCodeStore>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_manager: Arc<dyn TokenManager>,
        code_generator: Arc<dyn CodeGenerator>,
        clock: Arc<dyn Clock>,
        code_ttl: Duration,
    ) -> Self {
        let authorization_codes = Arc::new(AuthorizationCodeService::new(
            code_store,
            code_generator,
            Arc::clone(&clock),
            code_ttl,
        ));

        let authorization = Arc::new(AuthorizationFlowService::new(
            Arc::clone(&user_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&token_manager),
            Arc::clone(&authorization_codes),
        ));

        let user_commands = Arc::new(UserCommandService::new(
            Arc::clone(&user_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&clock),
        ));
        let user_queries = Arc::new(UserQueryService::new(Arc::clone(&user_repo), clock));

        Self {
            authorization,
            authorization_codes,
            user_commands,
            user_queries,
            token_manager,
        }
    }

    /// Resolve a raw bearer token to the identity it was issued for.
    pub async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        self.token_manager.authenticate(token).await
    }
}
