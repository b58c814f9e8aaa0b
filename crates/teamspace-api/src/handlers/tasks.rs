use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use teamspace_core::models::{
    CreateTaskRequest, DataResponse, DocumentList, Task, TaskFilter, TaskStatus,
    UpdateTaskRequest,
};
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use super::{optional_name, require_name, DeletedResponse};
use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedQuery};
use crate::services::tasks;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskQuery {
    pub workspace_id: Uuid,
    pub project_id: Option<Uuid>,
    pub assignee_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring of the task name
    pub search: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl From<TaskQuery> for TaskFilter {
    fn from(query: TaskQuery) -> Self {
        TaskFilter {
            workspace_id: query.workspace_id,
            project_id: query.project_id,
            assignee_id: query.assignee_id,
            status: query.status,
            due_date: query.due_date,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    params(TaskQuery),
    responses(
        (status = 200, description = "Matching tasks, newest first", body = DataResponse<DocumentList<Task>>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Not a member", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<TaskQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let tasks = tasks::list(&state, current.id(), query.into()).await?;
    Ok(Json(DataResponse::new(tasks)))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = DataResponse<Task>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not a member", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current, request), fields(user_id = %current.id()))]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    ValidatedJson(mut request): ValidatedJson<CreateTaskRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    request.name = require_name(Some(request.name), "Task")?;

    let task = tasks::create(&state, current.id(), request).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(task))))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{task_id}",
    tag = "tasks",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task", body = DataResponse<Task>),
        (status = 401, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(task_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let task = tasks::get(&state, current.id(), task_id).await?;
    Ok(Json(DataResponse::new(task)))
}

#[utoipa::path(
    patch,
    path = "/api/tasks/{task_id}",
    tag = "tasks",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = DataResponse<Task>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current, request), fields(user_id = %current.id()))]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(task_id): Path<Uuid>,
    ValidatedJson(mut request): ValidatedJson<UpdateTaskRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    request.name = optional_name(request.name, "Task")?;

    let task = tasks::update(&state, current.id(), task_id, request.into()).await?;
    Ok(Json(DataResponse::new(task)))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{task_id}",
    tag = "tasks",
    params(("task_id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = DataResponse<DeletedResponse>),
        (status = 401, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(task_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    tasks::delete(&state, current.id(), task_id).await?;
    Ok(Json(DataResponse::new(DeletedResponse { id: task_id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_is_dropped() {
        let filter: TaskFilter = TaskQuery {
            workspace_id: Uuid::nil(),
            project_id: None,
            assignee_id: None,
            status: Some(TaskStatus::Todo),
            search: Some("   ".to_string()),
            due_date: None,
        }
        .into();
        assert_eq!(filter.search, None);
        assert_eq!(filter.status, Some(TaskStatus::Todo));
    }
}
