pub mod database;
pub mod repositories;
pub mod security;
pub mod sweeper;
pub mod time;
pub mod util;
