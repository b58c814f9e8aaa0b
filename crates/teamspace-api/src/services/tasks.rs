//! Tasks. Membership in the task's workspace is enough for every operation.

use teamspace_core::models::{
    CreateTaskRequest, DocumentList, NewTask, Task, TaskChanges, TaskFilter,
};
use teamspace_core::policy::{Action, Resource};
use teamspace_core::AppError;
use uuid::Uuid;

use super::membership::authorize;
use crate::state::AppState;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".to_string())
}

/// The project and assignee of a task must live in the task's workspace.
async fn check_references(
    state: &AppState,
    workspace_id: Uuid,
    project_id: Option<Uuid>,
    assignee_id: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(project_id) = project_id {
        let project = state.backend.projects.get_project(project_id).await?;
        if project.is_none_or(|p| p.workspace_id != workspace_id) {
            return Err(AppError::InvalidInput(
                "Project does not belong to this workspace".to_string(),
            ));
        }
    }

    if let Some(assignee_id) = assignee_id {
        let assignee = state.backend.members.get_member(assignee_id).await?;
        if assignee.is_none_or(|m| m.workspace_id != workspace_id) {
            return Err(AppError::InvalidInput(
                "Assignee is not a member of this workspace".to_string(),
            ));
        }
    }

    Ok(())
}

async fn authorized_task(
    state: &AppState,
    user_id: Uuid,
    task_id: Uuid,
    action: Action,
) -> Result<Task, AppError> {
    let task = state
        .backend
        .tasks
        .get_task(task_id)
        .await?
        .ok_or_else(task_not_found)?;

    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Task {
            id: task.id,
            workspace_id: task.workspace_id,
        },
        action,
    )
    .await?;

    Ok(task)
}

pub async fn list(
    state: &AppState,
    user_id: Uuid,
    filter: TaskFilter,
) -> Result<DocumentList<Task>, AppError> {
    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Workspace {
            id: filter.workspace_id,
        },
        Action::Read,
    )
    .await?;

    let tasks = state.backend.tasks.list_tasks(&filter).await?;
    Ok(tasks.into())
}

pub async fn create(
    state: &AppState,
    user_id: Uuid,
    request: CreateTaskRequest,
) -> Result<Task, AppError> {
    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Task {
            id: Uuid::nil(),
            workspace_id: request.workspace_id,
        },
        Action::Create,
    )
    .await?;

    check_references(
        state,
        request.workspace_id,
        Some(request.project_id),
        Some(request.assignee_id),
    )
    .await?;

    let task = state
        .backend
        .tasks
        .create_task(NewTask {
            name: request.name,
            workspace_id: request.workspace_id,
            project_id: request.project_id,
            assignee_id: request.assignee_id,
            status: request.status,
            due_date: request.due_date,
            description: request.description.filter(|d| !d.trim().is_empty()),
        })
        .await?;

    tracing::info!(task_id = %task.id, workspace_id = %task.workspace_id, "Task created");
    Ok(task)
}

pub async fn get(state: &AppState, user_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
    authorized_task(state, user_id, task_id, Action::Read).await
}

pub async fn update(
    state: &AppState,
    user_id: Uuid,
    task_id: Uuid,
    changes: TaskChanges,
) -> Result<Task, AppError> {
    let task = authorized_task(state, user_id, task_id, Action::Update).await?;

    check_references(state, task.workspace_id, changes.project_id, changes.assignee_id).await?;

    let updated = state
        .backend
        .tasks
        .update_task(task_id, changes)
        .await?
        .ok_or_else(task_not_found)?;

    tracing::info!(task_id = %task_id, "Task updated");
    Ok(updated)
}

pub async fn delete(state: &AppState, user_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
    authorized_task(state, user_id, task_id, Action::Delete).await?;

    if !state.backend.tasks.delete_task(task_id).await? {
        return Err(task_not_found());
    }

    tracing::info!(task_id = %task_id, "Task deleted");
    Ok(())
}
