/// JWT access tokens
///
/// Tokens are signed with HS256 over a shared secret and carry the user id
/// as the subject claim. Audience and lifetime come from configuration so
/// deployments can tune them without code changes.
///
/// # Claims
///
/// - `sub`: user id
/// - `aud`: intended audience (default "user")
/// - `iat`: issued-at timestamp
/// - `exp`: expiration timestamp
///
/// # Example
///
/// ```
/// use teamspace_shared::auth::jwt::{sign, verify, Claims};
/// use chrono::Duration;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-secret-at-least-thirty-two-bytes!!";
///
/// let claims = Claims::new(user_id, "user", Duration::hours(24));
/// let token = sign(&claims, secret)?;
///
/// let decoded = verify(&token, secret, "user")?;
/// assert_eq!(decoded.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to sign a token
    #[error("failed to sign token: {0}")]
    Sign(String),

    /// Token has expired
    #[error("token has expired")]
    Expired,

    /// Token was issued for a different audience
    #[error("token audience mismatch")]
    InvalidAudience,

    /// Signature, format or claim validation failed
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Access-token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user's id
    pub sub: Uuid,

    /// Intended audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the given audience and lifetime.
    pub fn new(user_id: Uuid, audience: &str, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            aud: audience.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Whether the token's expiry has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a compact JWT.
pub fn sign(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::Sign(e.to_string()))
}

/// Verifies a token's signature, expiry and audience, returning its claims.
pub fn verify(token: &str, secret: &str, audience: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::InvalidAudience,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}
