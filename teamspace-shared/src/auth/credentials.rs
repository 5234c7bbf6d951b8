/// Credential verification
///
/// Checks an email/password pair against the stored account records for a
/// provider (the local email provider unless the caller says otherwise).
/// One read path, no side effects: look up the account by
/// (provider, email-as-identifier), load the linked user, verify the
/// password against the stored Argon2id hash.
///
/// The distinct failure variants matter internally (an account pointing at
/// a missing user is a data-integrity fault worth alerting on), but the
/// HTTP layer collapses everything credential-shaped into one generic 401
/// so responses never reveal whether an email is registered.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{self, PasswordError};
use crate::models::account::{Account, AuthProvider};
use crate::models::user::{User, UserProfile};

/// Error type for credential verification
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// No account exists for the supplied provider identity
    #[error("no account for the supplied credentials")]
    UnknownAccount,

    /// The account exists but its user row is gone
    #[error("account {0} is not linked to any user")]
    OrphanedAccount(Uuid),

    /// The account's user has no password credential (provider-only login)
    #[error("account has no password credential")]
    NoPasswordSet,

    /// The supplied password does not match the stored hash
    #[error("password mismatch")]
    PasswordMismatch,

    /// The stored hash could not be processed
    #[error(transparent)]
    Hash(#[from] PasswordError),

    /// Underlying database failure
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Verifies an email/password pair for the given provider.
///
/// On success returns the user with the password hash omitted.
pub async fn verify_credentials(
    pool: &PgPool,
    email: &str,
    supplied_password: &str,
    provider: AuthProvider,
) -> Result<UserProfile, CredentialError> {
    let account = Account::find_by_provider_id(pool, provider, email)
        .await?
        .ok_or(CredentialError::UnknownAccount)?;

    let user = User::find_by_id(pool, account.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(account_id = %account.id, "account points at a missing user");
            CredentialError::OrphanedAccount(account.id)
        })?;

    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or(CredentialError::NoPasswordSet)?;

    if !password::verify(supplied_password, stored_hash)? {
        return Err(CredentialError::PasswordMismatch);
    }

    tracing::debug!(user_id = %user.id, "credentials verified");
    Ok(user.into_profile())
}
