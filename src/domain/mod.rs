pub mod authorization;
pub mod errors;
pub mod user;
