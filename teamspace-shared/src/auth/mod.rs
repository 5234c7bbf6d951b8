/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id hashing, verification and strength checks
/// - [`jwt`]: HS256 access tokens with configurable audience and expiry
/// - [`credentials`]: email/password verification against stored accounts

pub mod credentials;
pub mod jwt;
pub mod password;
