use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use teamspace_core::models::{
    DataResponse, DocumentList, JoinWorkspaceRequest, Workspace, WorkspaceInfo,
};
use uuid::Uuid;
use validator::Validate;

use super::{optional_name, require_name, DeletedResponse};
use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::images::{read_image_form, ImageField};
use crate::services::workspaces;
use crate::state::AppState;

/// List the workspaces the caller belongs to, newest first
#[utoipa::path(
    get,
    path = "/api/workspaces",
    tag = "workspaces",
    responses(
        (status = 200, description = "Workspaces of the caller", body = DataResponse<DocumentList<Workspace>>),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn list_workspaces(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let workspaces = workspaces::list_for_user(&state, current.id()).await?;
    Ok(Json(DataResponse::new(workspaces)))
}

/// Create a workspace from a multipart form with `name` and optional `image`
#[utoipa::path(
    post,
    path = "/api/workspaces",
    tag = "workspaces",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Workspace created", body = DataResponse<Workspace>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current, multipart), fields(user_id = %current.id()))]
pub async fn create_workspace(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_image_form(multipart).await?;
    let name = require_name(form.name, "Workspace")?;
    let image = match form.image {
        ImageField::Upload(upload) => Some(upload),
        ImageField::Absent | ImageField::Cleared => None,
    };

    let workspace = workspaces::create(&state, current.id(), name, image).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(workspace))))
}

#[utoipa::path(
    get,
    path = "/api/workspaces/{workspace_id}",
    tag = "workspaces",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Workspace", body = DataResponse<Workspace>),
        (status = 401, description = "Not a member", body = ErrorResponse),
        (status = 404, description = "Workspace not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn get_workspace(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(workspace_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let workspace = workspaces::get(&state, current.id(), workspace_id).await?;
    Ok(Json(DataResponse::new(workspace)))
}

/// Workspace name for the join page
#[utoipa::path(
    get,
    path = "/api/workspaces/{workspace_id}/info",
    tag = "workspaces",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Workspace name", body = DataResponse<WorkspaceInfo>),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Workspace not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, _current))]
pub async fn get_workspace_info(
    State(state): State<Arc<AppState>>,
    _current: CurrentUser,
    Path(workspace_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let info = workspaces::info(&state, workspace_id).await?;
    Ok(Json(DataResponse::new(info)))
}

/// Rename a workspace or change its image (admins only)
#[utoipa::path(
    patch,
    path = "/api/workspaces/{workspace_id}",
    tag = "workspaces",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Workspace updated", body = DataResponse<Workspace>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not an admin of the workspace", body = ErrorResponse),
        (status = 404, description = "Workspace not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current, multipart), fields(user_id = %current.id()))]
pub async fn update_workspace(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(workspace_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_image_form(multipart).await?;
    let name = optional_name(form.name, "Workspace")?;

    let workspace =
        workspaces::update(&state, current.id(), workspace_id, name, form.image).await?;
    Ok(Json(DataResponse::new(workspace)))
}

/// Delete a workspace with its members, projects and tasks (admins only)
#[utoipa::path(
    delete,
    path = "/api/workspaces/{workspace_id}",
    tag = "workspaces",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Workspace deleted", body = DataResponse<DeletedResponse>),
        (status = 401, description = "Not an admin of the workspace", body = ErrorResponse),
        (status = 404, description = "Workspace not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn delete_workspace(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(workspace_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    workspaces::delete(&state, current.id(), workspace_id).await?;
    Ok(Json(DataResponse::new(DeletedResponse { id: workspace_id })))
}

/// Replace the invite code; the old code stops working (admins only)
#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_id}/reset-invite-code",
    tag = "workspaces",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    responses(
        (status = 200, description = "Invite code replaced", body = DataResponse<Workspace>),
        (status = 401, description = "Not an admin of the workspace", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn reset_invite_code(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(workspace_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let workspace = workspaces::reset_invite_code(&state, current.id(), workspace_id).await?;
    Ok(Json(DataResponse::new(workspace)))
}

/// Join a workspace with its invite code
#[utoipa::path(
    post,
    path = "/api/workspaces/{workspace_id}/join",
    tag = "workspaces",
    params(("workspace_id" = Uuid, Path, description = "Workspace ID")),
    request_body = JoinWorkspaceRequest,
    responses(
        (status = 200, description = "Joined", body = DataResponse<Workspace>),
        (status = 400, description = "Already a member or invalid invite code", body = ErrorResponse),
        (status = 404, description = "Workspace not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current, request), fields(user_id = %current.id()))]
pub async fn join_workspace(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(workspace_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<JoinWorkspaceRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let workspace = workspaces::join(&state, current.id(), workspace_id, &request.code).await?;
    Ok(Json(DataResponse::new(workspace)))
}
