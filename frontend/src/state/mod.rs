pub mod auth;
pub mod list;
