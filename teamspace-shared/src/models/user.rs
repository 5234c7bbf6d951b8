/// User model and database operations
///
/// A user is one identity, regardless of how it authenticates. Users
/// created through an external provider carry no password hash; users
/// created through local registration do. `current_workspace` points at
/// the workspace the user last worked in and is set for the first time
/// during account bootstrap.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     profile_picture VARCHAR(512),
///     password_hash VARCHAR(255),
///     current_workspace UUID REFERENCES workspaces(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, profile_picture, password_hash, \
                            current_workspace, created_at, updated_at, last_login_at";

/// User row
///
/// Carries the password hash and so deliberately does not implement
/// `Serialize`. Hand out [`UserProfile`] instead.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Email address, case-insensitive and unique via CITEXT
    pub email: String,

    /// Display name
    pub name: String,

    /// Optional profile picture URL
    pub profile_picture: Option<String>,

    /// Argon2id hash; None for provider-only accounts
    pub password_hash: Option<String>,

    /// Workspace the user is currently working in
    pub current_workspace: Option<Uuid>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub profile_picture: Option<String>,
}

/// The password-omitting projection of a user, safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub profile_picture: Option<String>,
    pub current_workspace: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Converts the row into its sanitized projection.
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email,
            name: self.name,
            profile_picture: self.profile_picture,
            current_workspace: self.current_workspace,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        }
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Surfaces the `users_email_key` unique violation when the email is
    /// already registered; callers that care translate it to their own
    /// duplicate-email failure.
    pub async fn create(db: impl PgExecutor<'_>, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, profile_picture)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(data.email)
        .bind(data.name)
        .bind(data.password_hash)
        .bind(data.profile_picture)
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID.
    pub async fn find_by_id(db: impl PgExecutor<'_>, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Finds a user by email (case-insensitive via CITEXT).
    pub async fn find_by_email(
        db: impl PgExecutor<'_>,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(db)
            .await
    }

    /// Points the user at a new current workspace and returns the updated row.
    pub async fn set_current_workspace(
        db: impl PgExecutor<'_>,
        id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET current_workspace = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(workspace_id)
        .fetch_one(db)
        .await
    }

    /// Stamps `last_login_at`, typically right after a successful login.
    pub async fn update_last_login(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
