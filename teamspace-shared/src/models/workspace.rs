/// Workspace model and database operations
///
/// Workspaces are the tenant boundary: projects, tasks and members all
/// hang off one. Account bootstrap creates a default workspace for every
/// new user, owned by that user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE workspaces (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Workspace row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workspace {
    /// Unique workspace ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Owning user
    pub owner_id: Uuid,

    /// When the workspace was created
    pub created_at: DateTime<Utc>,

    /// When the workspace was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new workspace
#[derive(Debug, Clone)]
pub struct CreateWorkspace {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

impl Workspace {
    /// Creates a new workspace.
    pub async fn create(
        db: impl PgExecutor<'_>,
        data: CreateWorkspace,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspaces (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(db)
        .await
    }

    /// Finds a workspace by ID.
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM workspaces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
