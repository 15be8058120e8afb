// src/application/ports/mod.rs
pub mod authorization_code;
pub mod security;
pub mod time;
pub mod util;

