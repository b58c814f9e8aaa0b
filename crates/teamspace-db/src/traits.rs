//! Store traits implemented by every record backend.
//!
//! Lookups return `Ok(None)` for a missing record; `Err` always means the
//! backend itself failed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teamspace_core::models::{
    Member, MemberWithUser, NewMember, NewProject, NewTask, NewUser, NewWorkspace, Project,
    ProjectChanges, Session, Task, TaskChanges, TaskFilter, User, UserCredentials, Workspace,
    WorkspaceChanges,
};
use teamspace_core::AppError;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Case-insensitive email match.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Also removes every session that has already expired.
    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError>;

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    /// Returns whether a session was removed.
    async fn delete_session(&self, token_hash: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// Creates the workspace together with an `ADMIN` membership for its creator.
    async fn create_workspace(
        &self,
        workspace: NewWorkspace,
    ) -> Result<(Workspace, Member), AppError>;

    async fn get_workspace(&self, id: Uuid) -> Result<Option<Workspace>, AppError>;

    /// Newest first.
    async fn list_workspaces_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Workspace>, AppError>;

    async fn update_workspace(
        &self,
        id: Uuid,
        changes: WorkspaceChanges,
    ) -> Result<Option<Workspace>, AppError>;

    async fn set_invite_code(&self, id: Uuid, code: &str)
        -> Result<Option<Workspace>, AppError>;

    /// Deletes the workspace and its members, projects and tasks.
    async fn delete_workspace(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Every membership row for the pair. Callers classify the result with
    /// `MembershipLookup`.
    async fn find_memberships(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Member>, AppError>;

    async fn get_member(&self, id: Uuid) -> Result<Option<Member>, AppError>;

    async fn list_memberships_for_user(&self, user_id: Uuid) -> Result<Vec<Member>, AppError>;

    async fn list_members_with_users(
        &self,
        workspace_id: Uuid,
    ) -> Result<Vec<MemberWithUser>, AppError>;

    /// Inserts the membership unless the (workspace, user) pair already has
    /// one, in which case `Ok(None)` is returned.
    async fn insert_member_if_absent(&self, member: NewMember)
        -> Result<Option<Member>, AppError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, project: NewProject) -> Result<Project, AppError>;

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, AppError>;

    /// Newest first.
    async fn list_projects(&self, workspace_id: Uuid) -> Result<Vec<Project>, AppError>;

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, AppError>;

    /// Deletes the project and its tasks.
    async fn delete_project(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, task: NewTask) -> Result<Task, AppError>;

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// Newest first.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, AppError>;

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, AppError>;

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError>;
}
