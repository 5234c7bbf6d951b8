/// Member model and database operations
///
/// A member record is a user's role-scoped participation in one
/// workspace. Bootstrap creates exactly one per new user, granting the
/// owner role on the default workspace; the (user_id, workspace_id)
/// unique constraint keeps repeat joins out.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     workspace_id UUID NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     role_id UUID NOT NULL REFERENCES roles(id),
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (user_id, workspace_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Member row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Member {
    /// Unique member ID
    pub id: Uuid,

    /// Participating user
    pub user_id: Uuid,

    /// Workspace joined
    pub workspace_id: Uuid,

    /// Role granted within the workspace
    pub role_id: Uuid,

    /// When the user joined
    pub joined_at: DateTime<Utc>,
}

/// Input for creating a new member
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub user_id: Uuid,
    pub workspace_id: Uuid,
    pub role_id: Uuid,
}

impl Member {
    /// Adds a user to a workspace with the given role.
    ///
    /// # Errors
    ///
    /// Fails on the (user_id, workspace_id) unique constraint when the
    /// user is already a member, and on foreign-key violation when any of
    /// the referenced rows do not exist.
    pub async fn create(db: impl PgExecutor<'_>, data: CreateMember) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (user_id, workspace_id, role_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, workspace_id, role_id, joined_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.workspace_id)
        .bind(data.role_id)
        .fetch_one(db)
        .await
    }

    /// Looks up a user's membership in one workspace.
    pub async fn find(
        db: impl PgExecutor<'_>,
        user_id: Uuid,
        workspace_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Member>(
            r#"
            SELECT id, user_id, workspace_id, role_id, joined_at
            FROM members
            WHERE user_id = $1 AND workspace_id = $2
            "#,
        )
        .bind(user_id)
        .bind(workspace_id)
        .fetch_optional(db)
        .await
    }
}
