/// Password hashing using Argon2id
///
/// Hashes carry their own parameters and salt in PHC string format, so
/// verification needs no configuration and old hashes keep verifying after
/// a parameter change. Verification is constant-time.
///
/// # Example
///
/// ```
/// use teamspace_shared::auth::password;
///
/// # fn example() -> Result<(), password::PasswordError> {
/// let hash = password::hash("hunter2!X")?;
/// assert!(password::verify("hunter2!X", &hash)?);
/// assert!(!password::verify("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Error type for password operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash a password
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Failed to verify a password against a hash
    #[error("failed to verify password: {0}")]
    Verify(String),

    /// The stored hash is not a valid PHC string
    #[error("malformed password hash: {0}")]
    MalformedHash(String),
}

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verifies a password against a stored PHC-format hash.
///
/// Returns `Ok(false)` for a wrong password; errors are reserved for
/// malformed hashes and operational failures.
pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e.to_string())),
    }
}

/// Checks minimum password strength at registration time.
///
/// Requires at least 8 characters with at least one letter and one digit.
pub fn validate_strength(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one letter".to_string());
    }

    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one digit".to_string());
    }

    Ok(())
}
