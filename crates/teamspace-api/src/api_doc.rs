//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::auth::models;
use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Teamspace API",
        version = "0.1.0",
        description = "Workspaces, members, projects and tasks. Session authentication through the session cookie or a Bearer token. Every JSON response is wrapped as { \"data\": ... }."
    ),
    paths(
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::current_user,
        // Workspaces
        handlers::workspaces::list_workspaces,
        handlers::workspaces::create_workspace,
        handlers::workspaces::get_workspace,
        handlers::workspaces::get_workspace_info,
        handlers::workspaces::update_workspace,
        handlers::workspaces::delete_workspace,
        handlers::workspaces::reset_invite_code,
        handlers::workspaces::join_workspace,
        // Members
        handlers::members::list_members,
        // Projects
        handlers::projects::list_projects,
        handlers::projects::create_project,
        handlers::projects::get_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        // Tasks
        handlers::tasks::list_tasks,
        handlers::tasks::create_task,
        handlers::tasks::get_task,
        handlers::tasks::update_task,
        handlers::tasks::delete_task,
    ),
    components(
        schemas(
            teamspace_core::models::User,
            teamspace_core::models::Workspace,
            teamspace_core::models::WorkspaceInfo,
            teamspace_core::models::JoinWorkspaceRequest,
            teamspace_core::models::MemberRole,
            teamspace_core::models::MemberWithUser,
            teamspace_core::models::Project,
            teamspace_core::models::Task,
            teamspace_core::models::TaskStatus,
            teamspace_core::models::CreateTaskRequest,
            teamspace_core::models::UpdateTaskRequest,
            models::RegisterRequest,
            models::LoginRequest,
            models::SessionResponse,
            models::SuccessResponse,
            handlers::DeletedResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and sessions"),
        (name = "workspaces", description = "Workspaces, invite codes and joining"),
        (name = "members", description = "Workspace membership"),
        (name = "projects", description = "Projects inside a workspace"),
        (name = "tasks", description = "Tasks inside a workspace"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
