use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use teamspace_core::models::{NewProject, Project, ProjectChanges};
use teamspace_core::AppError;
use uuid::Uuid;

use super::workspace::image_binds;
use crate::traits::ProjectStore;

/// Repository for projects
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    #[tracing::instrument(skip(self, project), fields(db.table = "projects", db.operation = "insert"))]
    async fn create_project(&self, project: NewProject) -> Result<Project, AppError> {
        let (image_url, image_key) = match project.image {
            Some(image) => (Some(image.url), Some(image.key)),
            None => (None, None),
        };

        let created = sqlx::query_as::<Postgres, Project>(
            r#"
            INSERT INTO projects (name, workspace_id, image_url, image_key)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, workspace_id, image_url, image_key, created_at, updated_at
            "#,
        )
        .bind(&project.name)
        .bind(project.workspace_id)
        .bind(image_url)
        .bind(image_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select", db.record_id = %id))]
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<Postgres, Project>(
            r#"
            SELECT id, name, workspace_id, image_url, image_key, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "select"))]
    async fn list_projects(&self, workspace_id: Uuid) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<Postgres, Project>(
            r#"
            SELECT id, name, workspace_id, image_url, image_key, created_at, updated_at
            FROM projects
            WHERE workspace_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = "projects", db.operation = "update", db.record_id = %id))]
    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, AppError> {
        let (touch_image, image_url, image_key) = image_binds(changes.image);

        let project = sqlx::query_as::<Postgres, Project>(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                image_url = CASE WHEN $3 THEN $4 ELSE image_url END,
                image_key = CASE WHEN $3 THEN $5 ELSE image_key END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, workspace_id, image_url, image_key, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(touch_image)
        .bind(image_url)
        .bind(image_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    #[tracing::instrument(skip(self), fields(db.table = "projects", db.operation = "delete", db.record_id = %id))]
    async fn delete_project(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
