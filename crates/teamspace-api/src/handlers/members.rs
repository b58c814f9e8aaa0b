use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use teamspace_core::models::{DataResponse, DocumentList, MemberWithUser};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::services::membership;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WorkspaceQuery {
    pub workspace_id: Uuid,
}

/// Members of a workspace with their name and email
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "members",
    params(WorkspaceQuery),
    responses(
        (status = 200, description = "Workspace members", body = DataResponse<DocumentList<MemberWithUser>>),
        (status = 401, description = "Not a member", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, current), fields(user_id = %current.id()))]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<WorkspaceQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let members = membership::list_members(&state, current.id(), query.workspace_id).await?;
    Ok(Json(DataResponse::new(members)))
}
