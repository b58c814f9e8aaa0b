//! Projects. Any member of the owning workspace may create, change or delete them.

use teamspace_core::models::{DocumentList, ImageChange, NewProject, Project, ProjectChanges};
use teamspace_core::policy::{Action, Resource};
use teamspace_core::AppError;
use teamspace_storage::ImageScope;
use uuid::Uuid;

use super::images::{discard_image, store_image, ImageField, ImageUpload};
use super::membership::authorize;
use crate::state::AppState;

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".to_string())
}

/// Fetch a project and check the caller may perform `action` on it.
async fn authorized_project(
    state: &AppState,
    user_id: Uuid,
    project_id: Uuid,
    action: Action,
) -> Result<Project, AppError> {
    let project = state
        .backend
        .projects
        .get_project(project_id)
        .await?
        .ok_or_else(project_not_found)?;

    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Project {
            id: project.id,
            workspace_id: project.workspace_id,
        },
        action,
    )
    .await?;

    Ok(project)
}

pub async fn list(
    state: &AppState,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<DocumentList<Project>, AppError> {
    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Workspace { id: workspace_id },
        Action::Read,
    )
    .await?;

    let projects = state.backend.projects.list_projects(workspace_id).await?;
    Ok(projects.into())
}

pub async fn create(
    state: &AppState,
    user_id: Uuid,
    workspace_id: Uuid,
    name: String,
    image: Option<ImageUpload>,
) -> Result<Project, AppError> {
    authorize(
        state.backend.members.as_ref(),
        user_id,
        // Not created yet, so there is no id to check against
        Resource::Project {
            id: Uuid::nil(),
            workspace_id,
        },
        Action::Create,
    )
    .await?;

    let image = match image {
        Some(upload) => Some(
            store_image(
                state.storage.as_ref(),
                &state.config,
                ImageScope::Project(workspace_id),
                upload,
            )
            .await?,
        ),
        None => None,
    };
    let image_key = image.as_ref().map(|img| img.key.clone());

    match state
        .backend
        .projects
        .create_project(NewProject {
            name,
            workspace_id,
            image,
        })
        .await
    {
        Ok(project) => {
            tracing::info!(project_id = %project.id, workspace_id = %workspace_id, "Project created");
            Ok(project)
        }
        Err(e) => {
            if let Some(key) = image_key {
                discard_image(state.storage.as_ref(), &key).await;
            }
            Err(e)
        }
    }
}

pub async fn get(state: &AppState, user_id: Uuid, project_id: Uuid) -> Result<Project, AppError> {
    authorized_project(state, user_id, project_id, Action::Read).await
}

pub async fn update(
    state: &AppState,
    user_id: Uuid,
    project_id: Uuid,
    name: Option<String>,
    image: ImageField,
) -> Result<Project, AppError> {
    let existing = authorized_project(state, user_id, project_id, Action::Update).await?;

    let image = match image {
        ImageField::Absent => ImageChange::Keep,
        ImageField::Cleared => ImageChange::Clear,
        ImageField::Upload(upload) => ImageChange::Replace(
            store_image(
                state.storage.as_ref(),
                &state.config,
                ImageScope::Project(existing.workspace_id),
                upload,
            )
            .await?,
        ),
    };
    let replaces_image = !matches!(image, ImageChange::Keep);
    let new_key = match &image {
        ImageChange::Replace(img) => Some(img.key.clone()),
        _ => None,
    };

    let updated = match state
        .backend
        .projects
        .update_project(project_id, ProjectChanges { name, image })
        .await
    {
        Ok(Some(project)) => project,
        result => {
            if let Some(key) = &new_key {
                discard_image(state.storage.as_ref(), key).await;
            }
            return Err(result.err().unwrap_or_else(project_not_found));
        }
    };

    if replaces_image {
        if let Some(old_key) = existing.image_key.as_deref() {
            if new_key.as_deref() != Some(old_key) {
                discard_image(state.storage.as_ref(), old_key).await;
            }
        }
    }

    tracing::info!(project_id = %project_id, "Project updated");
    Ok(updated)
}

/// Delete the project and its tasks, then its image file.
pub async fn delete(state: &AppState, user_id: Uuid, project_id: Uuid) -> Result<(), AppError> {
    let project = authorized_project(state, user_id, project_id, Action::Delete).await?;

    if !state.backend.projects.delete_project(project_id).await? {
        return Err(project_not_found());
    }

    if let Some(key) = project.image_key.as_deref() {
        discard_image(state.storage.as_ref(), key).await;
    }

    tracing::info!(project_id = %project_id, workspace_id = %project.workspace_id, "Project deleted");
    Ok(())
}
