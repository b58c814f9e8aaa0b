use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use teamspace_core::models::{DataResponse, DocumentList, Project};
use teamspace_core::AppError;
use uuid::Uuid;

use super::members::WorkspaceQuery;
use super::{optional_name, require_name, DeletedResponse};
use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::services::images::{read_image_form, ImageField};
use crate::services::projects;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    params(WorkspaceQuery),
    responses(
        (status = 200, description = "Projects of the workspace, newest first", body = DataResponse<DocumentList<Project>>),
        (status = 401, description = "Not a member", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<WorkspaceQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let projects = projects::list(&state, current.id(), query.workspace_id).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// Create a project from a multipart form with `name`, `workspace_id` and optional `image`
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Project created", body = DataResponse<Project>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not a member", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current, multipart), fields(user_id = %current.id()))]
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_image_form(multipart).await?;
    let name = require_name(form.name, "Project")?;
    let workspace_id = form
        .workspace_id
        .as_deref()
        .ok_or_else(|| AppError::InvalidInput("workspace_id is required".to_string()))?
        .parse::<Uuid>()
        .map_err(AppError::from)?;
    let image = match form.image {
        ImageField::Upload(upload) => Some(upload),
        ImageField::Absent | ImageField::Cleared => None,
    };

    let project = projects::create(&state, current.id(), workspace_id, name, image).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

#[utoipa::path(
    get,
    path = "/api/projects/{project_id}",
    tag = "projects",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = DataResponse<Project>),
        (status = 401, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let project = projects::get(&state, current.id(), project_id).await?;
    Ok(Json(DataResponse::new(project)))
}

#[utoipa::path(
    patch,
    path = "/api/projects/{project_id}",
    tag = "projects",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Project updated", body = DataResponse<Project>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current, multipart), fields(user_id = %current.id()))]
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_image_form(multipart).await?;
    let name = optional_name(form.name, "Project")?;

    let project = projects::update(&state, current.id(), project_id, name, form.image).await?;
    Ok(Json(DataResponse::new(project)))
}

/// Delete a project and its tasks
#[utoipa::path(
    delete,
    path = "/api/projects/{project_id}",
    tag = "projects",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted", body = DataResponse<DeletedResponse>),
        (status = 401, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    projects::delete(&state, current.id(), project_id).await?;
    Ok(Json(DataResponse::new(DeletedResponse { id: project_id })))
}
