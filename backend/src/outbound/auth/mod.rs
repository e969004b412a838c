//! Credential and token outbound adapters.

mod bcrypt;
mod jwt;

pub use self::bcrypt::BcryptPasswordHasher;
pub use self::jwt::JwtTokenIssuer;
