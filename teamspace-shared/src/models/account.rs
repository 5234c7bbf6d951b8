/// Account model and database operations
///
/// An account binds a user to one identity provider's credential space.
/// For the local email provider the provider-assigned identifier is the
/// email address itself; for external providers it is the subject id the
/// provider hands back. Accounts are created once during bootstrap and
/// never mutated.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE auth_provider AS ENUM ('email', 'google', 'facebook', 'github');
///
/// CREATE TABLE accounts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     provider auth_provider NOT NULL,
///     provider_id VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (provider, provider_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Identity providers an account can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "auth_provider", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Local email/password credentials
    Email,

    /// Google OAuth
    Google,

    /// Facebook OAuth
    Facebook,

    /// GitHub OAuth
    Github,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Email => "email",
            AuthProvider::Google => "google",
            AuthProvider::Facebook => "facebook",
            AuthProvider::Github => "github",
        }
    }
}

/// Account row linking a user to a provider identity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Unique account ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Identity provider
    pub provider: AuthProvider,

    /// Provider-assigned identifier (email for the local provider)
    pub provider_id: String,

    /// When the binding was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub user_id: Uuid,
    pub provider: AuthProvider,
    pub provider_id: String,
}

impl Account {
    /// Creates a new provider binding.
    ///
    /// # Errors
    ///
    /// Fails on the (provider, provider_id) unique constraint when the
    /// identity is already bound, and on foreign-key violation when the
    /// user does not exist.
    pub async fn create(db: impl PgExecutor<'_>, data: CreateAccount) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (user_id, provider, provider_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, provider, provider_id, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.provider)
        .bind(data.provider_id)
        .fetch_one(db)
        .await
    }

    /// Looks up the account bound to a provider identity.
    pub async fn find_by_provider_id(
        db: impl PgExecutor<'_>,
        provider: AuthProvider,
        provider_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, user_id, provider, provider_id, created_at
            FROM accounts
            WHERE provider = $1 AND provider_id = $2
            "#,
        )
        .bind(provider)
        .bind(provider_id)
        .fetch_optional(db)
        .await
    }
}
