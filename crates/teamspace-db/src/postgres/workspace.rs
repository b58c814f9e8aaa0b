use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use teamspace_core::models::{
    ImageChange, Member, MemberRole, NewWorkspace, Workspace, WorkspaceChanges,
};
use teamspace_core::AppError;
use uuid::Uuid;

use crate::traits::WorkspaceStore;

/// Repository for workspaces
#[derive(Clone)]
pub struct WorkspaceRepository {
    pool: PgPool,
}

impl WorkspaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Splits an image change into (touch, url, key) bind values.
pub(crate) fn image_binds(change: ImageChange) -> (bool, Option<String>, Option<String>) {
    match change {
        ImageChange::Keep => (false, None, None),
        ImageChange::Replace(image) => (true, Some(image.url), Some(image.key)),
        ImageChange::Clear => (true, None, None),
    }
}

#[async_trait]
impl WorkspaceStore for WorkspaceRepository {
    #[tracing::instrument(skip(self, workspace), fields(db.table = "workspaces", db.operation = "insert"))]
    async fn create_workspace(
        &self,
        workspace: NewWorkspace,
    ) -> Result<(Workspace, Member), AppError> {
        let mut tx = self.pool.begin().await?;

        let (image_url, image_key) = match workspace.image {
            Some(image) => (Some(image.url), Some(image.key)),
            None => (None, None),
        };

        let created = sqlx::query_as::<Postgres, Workspace>(
            r#"
            INSERT INTO workspaces (name, user_id, image_url, image_key, invite_code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, user_id, image_url, image_key, invite_code, created_at, updated_at
            "#,
        )
        .bind(&workspace.name)
        .bind(workspace.user_id)
        .bind(image_url)
        .bind(image_key)
        .bind(&workspace.invite_code)
        .fetch_one(&mut *tx)
        .await?;

        let admin = sqlx::query_as::<Postgres, Member>(
            r#"
            INSERT INTO members (workspace_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING id, workspace_id, user_id, role, created_at
            "#,
        )
        .bind(created.id)
        .bind(workspace.user_id)
        .bind(MemberRole::Admin)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((created, admin))
    }

    #[tracing::instrument(skip(self), fields(db.table = "workspaces", db.operation = "select", db.record_id = %id))]
    async fn get_workspace(&self, id: Uuid) -> Result<Option<Workspace>, AppError> {
        let workspace = sqlx::query_as::<Postgres, Workspace>(
            r#"
            SELECT id, name, user_id, image_url, image_key, invite_code, created_at, updated_at
            FROM workspaces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(workspace)
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = "workspaces", db.operation = "select", count = ids.len()))]
    async fn list_workspaces_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Workspace>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let workspaces = sqlx::query_as::<Postgres, Workspace>(
            r#"
            SELECT id, name, user_id, image_url, image_key, invite_code, created_at, updated_at
            FROM workspaces
            WHERE id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(workspaces)
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = "workspaces", db.operation = "update", db.record_id = %id))]
    async fn update_workspace(
        &self,
        id: Uuid,
        changes: WorkspaceChanges,
    ) -> Result<Option<Workspace>, AppError> {
        let (touch_image, image_url, image_key) = image_binds(changes.image);

        let workspace = sqlx::query_as::<Postgres, Workspace>(
            r#"
            UPDATE workspaces
            SET name = COALESCE($2, name),
                image_url = CASE WHEN $3 THEN $4 ELSE image_url END,
                image_key = CASE WHEN $3 THEN $5 ELSE image_key END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, user_id, image_url, image_key, invite_code, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(touch_image)
        .bind(image_url)
        .bind(image_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(workspace)
    }

    #[tracing::instrument(skip(self, code), fields(db.table = "workspaces", db.operation = "update", db.record_id = %id))]
    async fn set_invite_code(
        &self,
        id: Uuid,
        code: &str,
    ) -> Result<Option<Workspace>, AppError> {
        let workspace = sqlx::query_as::<Postgres, Workspace>(
            r#"
            UPDATE workspaces
            SET invite_code = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, user_id, image_url, image_key, invite_code, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(workspace)
    }

    #[tracing::instrument(skip(self), fields(db.table = "workspaces", db.operation = "delete", db.record_id = %id))]
    async fn delete_workspace(&self, id: Uuid) -> Result<bool, AppError> {
        // members, projects and tasks go with it through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
