pub mod auth;
pub mod users;

pub use auth::{AuthTokenDto, AuthenticatedUser, AuthorizationRedirect, TokenResponseDto, TokenSubject};
pub use users::{UserDto, UserProfileDto};
