use super::UserQueryService;
use crate::application::{
    dto::{AuthenticatedUser, UserProfileDto},
    error::{ApplicationError, ApplicationResult},
};

impl UserQueryService {
    /// A valid token whose user has since disappeared or been disabled
    /// no longer grants access.
    pub async fn get_profile(
        &self,
        actor: &AuthenticatedUser,
    ) -> ApplicationResult<UserProfileDto> {
        let user = self
            .user_repo
            .find_by_id(actor.id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| ApplicationError::unauthorized("could not validate credentials"))?;

        Ok(UserProfileDto::from_parts(user, actor, self.clock.now()))
    }
}
