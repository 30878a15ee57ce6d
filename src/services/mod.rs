pub mod auth;
pub mod prediction;
pub mod session;
