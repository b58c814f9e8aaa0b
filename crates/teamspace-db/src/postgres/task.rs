use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use teamspace_core::models::{NewTask, Task, TaskChanges, TaskFilter};
use teamspace_core::AppError;
use uuid::Uuid;

use crate::traits::TaskStore;

/// Repository for tasks
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl TaskStore for TaskRepository {
    #[tracing::instrument(skip(self, task), fields(db.table = "tasks", db.operation = "insert"))]
    async fn create_task(&self, task: NewTask) -> Result<Task, AppError> {
        let created = sqlx::query_as::<Postgres, Task>(
            r#"
            INSERT INTO tasks (name, workspace_id, project_id, assignee_id, status, due_date, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, workspace_id, project_id, assignee_id, status, due_date,
                      description, created_at, updated_at
            "#,
        )
        .bind(&task.name)
        .bind(task.workspace_id)
        .bind(task.project_id)
        .bind(task.assignee_id)
        .bind(task.status)
        .bind(task.due_date)
        .bind(&task.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tasks", db.operation = "select", db.record_id = %id))]
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<Postgres, Task>(
            r#"
            SELECT id, name, workspace_id, project_id, assignee_id, status, due_date,
                   description, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    #[tracing::instrument(skip(self, filter), fields(db.table = "tasks", db.operation = "select", workspace_id = %filter.workspace_id))]
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<Postgres, Task>(
            r#"
            SELECT id, name, workspace_id, project_id, assignee_id, status, due_date,
                   description, created_at, updated_at
            FROM tasks
            WHERE workspace_id = $1
              AND ($2::uuid IS NULL OR project_id = $2)
              AND ($3::uuid IS NULL OR assignee_id = $3)
              AND ($4::task_status IS NULL OR status = $4)
              AND ($5::date IS NULL OR due_date = $5)
              AND ($6::text IS NULL OR name ILIKE $6)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.workspace_id)
        .bind(filter.project_id)
        .bind(filter.assignee_id)
        .bind(filter.status)
        .bind(filter.due_date)
        .bind(filter.search.as_deref().map(like_pattern))
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = "tasks", db.operation = "update", db.record_id = %id))]
    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, AppError> {
        let (touch_description, description) = match changes.description {
            Some(value) => (true, value),
            None => (false, None),
        };

        let task = sqlx::query_as::<Postgres, Task>(
            r#"
            UPDATE tasks
            SET name = COALESCE($2, name),
                project_id = COALESCE($3, project_id),
                assignee_id = COALESCE($4, assignee_id),
                status = COALESCE($5, status),
                due_date = COALESCE($6, due_date),
                description = CASE WHEN $7 THEN $8 ELSE description END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, workspace_id, project_id, assignee_id, status, due_date,
                      description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.project_id)
        .bind(changes.assignee_id)
        .bind(changes.status)
        .bind(changes.due_date)
        .bind(touch_description)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tasks", db.operation = "delete", db.record_id = %id))]
    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
