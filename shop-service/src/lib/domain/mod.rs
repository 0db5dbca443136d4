pub mod auth;
pub mod passwords;
pub mod user;
