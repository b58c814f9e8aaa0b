//! Authorization policy for workspace-scoped resources.
//!
//! Every protected operation goes through [`evaluate`]. Membership in the
//! resource's workspace is always required; [`required_role`] lists the
//! actions that additionally need a specific role.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Member, MemberRole};

/// The caller and their membership in the resource's workspace, if any
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub user_id: Uuid,
    pub membership: Option<&'a Member>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Workspace { id: Uuid },
    Project { id: Uuid, workspace_id: Uuid },
    Task { id: Uuid, workspace_id: Uuid },
    Membership { workspace_id: Uuid },
}

impl Resource {
    pub fn workspace_id(&self) -> Uuid {
        match *self {
            Resource::Workspace { id } => id,
            Resource::Project { workspace_id, .. }
            | Resource::Task { workspace_id, .. }
            | Resource::Membership { workspace_id } => workspace_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    ResetInviteCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotAMember,
    WorkspaceMismatch,
    InsufficientRole { required: MemberRole },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Denials surface as 401 with the generic "Unauthorized" message.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(_) => Err(AppError::Unauthorized("Unauthorized".to_string())),
        }
    }
}

/// Role needed beyond plain membership. Projects, tasks and member listings
/// only need membership; workspace mutations need an admin.
pub fn required_role(resource: &Resource, action: Action) -> Option<MemberRole> {
    match (resource, action) {
        (
            Resource::Workspace { .. },
            Action::Update | Action::Delete | Action::ResetInviteCode,
        ) => Some(MemberRole::Admin),
        _ => None,
    }
}

pub fn evaluate(subject: &Subject<'_>, resource: &Resource, action: Action) -> Decision {
    let Some(member) = subject.membership else {
        return Decision::Deny(DenyReason::NotAMember);
    };

    if member.user_id != subject.user_id {
        return Decision::Deny(DenyReason::NotAMember);
    }

    if member.workspace_id != resource.workspace_id() {
        return Decision::Deny(DenyReason::WorkspaceMismatch);
    }

    match required_role(resource, action) {
        Some(required) if member.role != required => {
            Decision::Deny(DenyReason::InsufficientRole { required })
        }
        _ => Decision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn member(workspace_id: Uuid, user_id: Uuid, role: MemberRole) -> Member {
        Member {
            id: Uuid::new_v4(),
            workspace_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn non_member_is_denied_everything() {
        let user = Uuid::new_v4();
        let subject = Subject {
            user_id: user,
            membership: None,
        };
        let ws = Resource::Workspace { id: Uuid::new_v4() };
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert_eq!(
                evaluate(&subject, &ws, action),
                Decision::Deny(DenyReason::NotAMember)
            );
        }
    }

    #[test]
    fn admin_only_workspace_actions() {
        let (ws, user) = (Uuid::new_v4(), Uuid::new_v4());
        let resource = Resource::Workspace { id: ws };

        let plain = member(ws, user, MemberRole::Member);
        let subject = Subject {
            user_id: user,
            membership: Some(&plain),
        };
        assert!(evaluate(&subject, &resource, Action::Read).is_allowed());
        for action in [Action::Update, Action::Delete, Action::ResetInviteCode] {
            assert_eq!(
                evaluate(&subject, &resource, action),
                Decision::Deny(DenyReason::InsufficientRole {
                    required: MemberRole::Admin
                })
            );
        }

        let admin = member(ws, user, MemberRole::Admin);
        let subject = Subject {
            user_id: user,
            membership: Some(&admin),
        };
        for action in [Action::Update, Action::Delete, Action::ResetInviteCode] {
            assert!(evaluate(&subject, &resource, action).is_allowed());
        }
    }

    #[test]
    fn project_and_task_mutations_need_membership_only() {
        let (ws, user) = (Uuid::new_v4(), Uuid::new_v4());
        let plain = member(ws, user, MemberRole::Member);
        let subject = Subject {
            user_id: user,
            membership: Some(&plain),
        };
        let project = Resource::Project {
            id: Uuid::new_v4(),
            workspace_id: ws,
        };
        let task = Resource::Task {
            id: Uuid::new_v4(),
            workspace_id: ws,
        };
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert!(evaluate(&subject, &project, action).is_allowed());
            assert!(evaluate(&subject, &task, action).is_allowed());
        }
    }

    #[test]
    fn membership_in_other_workspace_is_mismatch() {
        let user = Uuid::new_v4();
        let elsewhere = member(Uuid::new_v4(), user, MemberRole::Admin);
        let subject = Subject {
            user_id: user,
            membership: Some(&elsewhere),
        };
        let resource = Resource::Membership {
            workspace_id: Uuid::new_v4(),
        };
        assert_eq!(
            evaluate(&subject, &resource, Action::Read),
            Decision::Deny(DenyReason::WorkspaceMismatch)
        );
    }

    #[test]
    fn denial_maps_to_unauthorized() {
        let err = Decision::Deny(DenyReason::NotAMember)
            .into_result()
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref msg) if msg == "Unauthorized"));
    }
}
