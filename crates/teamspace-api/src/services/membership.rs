//! Membership lookup and policy enforcement shared by every protected route.

use teamspace_core::models::{DocumentList, Member, MemberWithUser};
use teamspace_core::policy::{evaluate, Action, Decision, Resource, Subject};
use teamspace_core::{AppError, MembershipLookup};
use teamspace_db::MemberStore;
use uuid::Uuid;

use crate::state::AppState;

pub async fn lookup_membership(
    members: &dyn MemberStore,
    workspace_id: Uuid,
    user_id: Uuid,
) -> Result<MembershipLookup, AppError> {
    let rows = members.find_memberships(workspace_id, user_id).await?;
    Ok(MembershipLookup::from_rows(rows))
}

/// The caller's membership in `workspace_id`; duplicates are an error.
pub async fn find_member(
    members: &dyn MemberStore,
    workspace_id: Uuid,
    user_id: Uuid,
) -> Result<Option<Member>, AppError> {
    lookup_membership(members, workspace_id, user_id)
        .await?
        .into_member(workspace_id, user_id)
}

/// Evaluate the policy for the caller against `resource` and return their
/// membership when allowed.
#[tracing::instrument(skip(members), fields(workspace_id = %resource.workspace_id()))]
pub async fn authorize(
    members: &dyn MemberStore,
    user_id: Uuid,
    resource: Resource,
    action: Action,
) -> Result<Member, AppError> {
    let member = find_member(members, resource.workspace_id(), user_id).await?;

    let subject = Subject {
        user_id,
        membership: member.as_ref(),
    };
    let decision = evaluate(&subject, &resource, action);
    if let Decision::Deny(reason) = &decision {
        tracing::debug!(?reason, ?action, "Access denied");
    }
    decision.into_result()?;

    member.ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))
}

/// Members of a workspace with their user name and email.
pub async fn list_members(
    state: &AppState,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<DocumentList<MemberWithUser>, AppError> {
    authorize(
        state.backend.members.as_ref(),
        user_id,
        Resource::Membership { workspace_id },
        Action::Read,
    )
    .await?;

    let members = state
        .backend
        .members
        .list_members_with_users(workspace_id)
        .await?;
    Ok(members.into())
}
