//! Workspace lifecycle, invite codes and the join flow.

use teamspace_core::models::{
    DocumentList, ImageChange, MemberRole, NewMember, NewWorkspace, Workspace, WorkspaceChanges,
    WorkspaceInfo,
};
use teamspace_core::policy::{Action, Resource};
use teamspace_core::{generate_invite_code, invite_code_matches, AppError, INVITE_CODE_LENGTH};
use teamspace_storage::ImageScope;
use uuid::Uuid;

use super::images::{discard_image, store_image, ImageField, ImageUpload};
use super::membership::{authorize, find_member};
use crate::state::AppState;

fn workspace_not_found() -> AppError {
    AppError::NotFound("Workspace not found".to_string())
}

/// Workspaces the user belongs to, newest first.
pub async fn list_for_user(
    state: &AppState,
    user_id: Uuid,
) -> Result<DocumentList<Workspace>, AppError> {
    let memberships = state
        .backend
        .members
        .list_memberships_for_user(user_id)
        .await?;

    if memberships.is_empty() {
        return Ok(DocumentList::empty());
    }

    let ids: Vec<Uuid> = memberships.iter().map(|m| m.workspace_id).collect();
    let workspaces = state.backend.workspaces.list_workspaces_by_ids(&ids).await?;
    Ok(workspaces.into())
}

/// Create a workspace; the creator becomes its first admin.
pub async fn create(
    state: &AppState,
    user_id: Uuid,
    name: String,
    image: Option<ImageUpload>,
) -> Result<Workspace, AppError> {
    let image = match image {
        Some(upload) => Some(
            store_image(
                state.storage.as_ref(),
                &state.config,
                ImageScope::Workspace(user_id),
                upload,
            )
            .await?,
        ),
        None => None,
    };
    let image_key = image.as_ref().map(|img| img.key.clone());

    let created = state
        .backend
        .workspaces
        .create_workspace(NewWorkspace {
            name,
            user_id,
            image,
            invite_code: generate_invite_code(INVITE_CODE_LENGTH),
        })
        .await;

    match created {
        Ok((workspace, member)) => {
            tracing::info!(
                workspace_id = %workspace.id,
                member_id = %member.id,
                "Workspace created"
            );
            Ok(workspace)
        }
        Err(e) => {
            if let Some(key) = image_key {
                discard_image(state.storage.as_ref(), &key).await;
            }
            Err(e)
        }
    }
}

pub async fn get(state: &AppState, user_id: Uuid, workspace_id: Uuid) -> Result<Workspace, AppError> {
    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Workspace { id: workspace_id },
        Action::Read,
    )
    .await?;

    state
        .backend
        .workspaces
        .get_workspace(workspace_id)
        .await?
        .ok_or_else(workspace_not_found)
}

/// Name only, for the join page of a workspace the caller may not belong to yet.
pub async fn info(state: &AppState, workspace_id: Uuid) -> Result<WorkspaceInfo, AppError> {
    let workspace = state
        .backend
        .workspaces
        .get_workspace(workspace_id)
        .await?
        .ok_or_else(workspace_not_found)?;

    Ok(WorkspaceInfo {
        name: workspace.name,
    })
}

pub async fn update(
    state: &AppState,
    user_id: Uuid,
    workspace_id: Uuid,
    name: Option<String>,
    image: ImageField,
) -> Result<Workspace, AppError> {
    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Workspace { id: workspace_id },
        Action::Update,
    )
    .await?;

    let existing = state
        .backend
        .workspaces
        .get_workspace(workspace_id)
        .await?
        .ok_or_else(workspace_not_found)?;

    let image = match image {
        ImageField::Absent => ImageChange::Keep,
        ImageField::Cleared => ImageChange::Clear,
        ImageField::Upload(upload) => ImageChange::Replace(
            store_image(
                state.storage.as_ref(),
                &state.config,
                ImageScope::Workspace(workspace_id),
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
        .workspaces
        .update_workspace(workspace_id, WorkspaceChanges { name, image })
        .await
    {
        Ok(Some(workspace)) => workspace,
        result => {
            if let Some(key) = &new_key {
                discard_image(state.storage.as_ref(), key).await;
            }
            return Err(result.err().unwrap_or_else(workspace_not_found));
        }
    };

    if replaces_image {
        if let Some(old_key) = existing.image_key.as_deref() {
            if new_key.as_deref() != Some(old_key) {
                discard_image(state.storage.as_ref(), old_key).await;
            }
        }
    }

    tracing::info!(workspace_id = %workspace_id, "Workspace updated");
    Ok(updated)
}

/// Delete the workspace with its members, projects and tasks, then remove
/// the image files that belonged to it.
pub async fn delete(state: &AppState, user_id: Uuid, workspace_id: Uuid) -> Result<(), AppError> {
    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Workspace { id: workspace_id },
        Action::Delete,
    )
    .await?;

    let workspace = state
        .backend
        .workspaces
        .get_workspace(workspace_id)
        .await?
        .ok_or_else(workspace_not_found)?;

    let mut image_keys: Vec<String> = state
        .backend
        .projects
        .list_projects(workspace_id)
        .await?
        .into_iter()
        .filter_map(|p| p.image_key)
        .collect();
    image_keys.extend(workspace.image_key);

    if !state.backend.workspaces.delete_workspace(workspace_id).await? {
        return Err(workspace_not_found());
    }

    for key in &image_keys {
        discard_image(state.storage.as_ref(), key).await;
    }

    tracing::info!(
        workspace_id = %workspace_id,
        images_removed = image_keys.len(),
        "Workspace deleted"
    );
    Ok(())
}

pub async fn reset_invite_code(
    state: &AppState,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<Workspace, AppError> {
    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Workspace { id: workspace_id },
        Action::ResetInviteCode,
    )
    .await?;

    let code = generate_invite_code(INVITE_CODE_LENGTH);
    let workspace = state
        .backend
        .workspaces
        .set_invite_code(workspace_id, &code)
        .await?
        .ok_or_else(workspace_not_found)?;

    tracing::info!(workspace_id = %workspace_id, "Invite code reset");
    Ok(workspace)
}

/// Join with an invite code: not-a-member becomes `MEMBER` when the code matches.
pub async fn join(
    state: &AppState,
    user_id: Uuid,
    workspace_id: Uuid,
    code: &str,
) -> Result<Workspace, AppError> {
    if find_member(state.backend.members.as_ref(), workspace_id, user_id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Already a member".to_string()));
    }

    let workspace = state
        .backend
        .workspaces
        .get_workspace(workspace_id)
        .await?
        .ok_or_else(workspace_not_found)?;

    if !invite_code_matches(&workspace.invite_code, code) {
        tracing::debug!(workspace_id = %workspace_id, "Invalid invite code");
        return Err(AppError::BadRequest("Invalid invite code".to_string()));
    }

    let inserted = state
        .backend
        .members
        .insert_member_if_absent(NewMember {
            workspace_id,
            user_id,
            role: MemberRole::Member,
        })
        .await?;

    match inserted {
        Some(member) => {
            tracing::info!(workspace_id = %workspace_id, member_id = %member.id, "Joined workspace");
            Ok(workspace)
        }
        // A concurrent join with the same code won the insert
        None => Err(AppError::BadRequest("Already a member".to_string())),
    }
}
