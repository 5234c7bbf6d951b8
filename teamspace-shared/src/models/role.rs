/// Role model and database operations
///
/// Roles are named permission sets seeded by migration. Runtime code only
/// ever looks them up; the absence of a seed row (most importantly
/// "owner") is a deployment fault, not a user error.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(50) NOT NULL UNIQUE,
///     permissions JSONB NOT NULL DEFAULT '[]',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgExecutor;
use uuid::Uuid;

/// The role names the migrations seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleName {
    /// Full control over a workspace, including deleting it
    Owner,

    /// Manages members and projects
    Admin,

    /// Works within projects
    Member,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Owner => "owner",
            RoleName::Admin => "admin",
            RoleName::Member => "member",
        }
    }
}

/// Role row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Role name ("owner", "admin", "member")
    pub name: String,

    /// Permission strings granted by this role (JSONB array)
    pub permissions: JsonValue,

    /// When the seed row was created
    pub created_at: DateTime<Utc>,
}

impl Role {
    /// Looks up a role by its seeded name.
    pub async fn find_by_name(
        db: impl PgExecutor<'_>,
        name: RoleName,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, permissions, created_at
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_optional(db)
        .await
    }
}
