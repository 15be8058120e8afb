mod authorize;
mod codes;
mod exchange;
mod service;

pub use authorize::{AuthorizeCommand, AuthorizeRequest, ValidatedAuthorizeRequest};
pub use codes::{AuthorizationCodeService, DEFAULT_CODE_TTL, IssueCodeCommand};
pub use exchange::{AUTHORIZATION_CODE_GRANT, TokenExchangeCommand};
pub use service::AuthorizationFlowService;
