//! Authenticator and Token Validator.

pub mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod services;

pub use extractors::CurrentUser;
pub use jwt::JwtKeys;
