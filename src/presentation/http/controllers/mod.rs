// src/presentation/http/controllers/mod.rs
pub mod oauth;
pub mod users;
