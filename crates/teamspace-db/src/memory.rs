//! In-memory record backend
//!
//! Keeps every table in one locked state value so multi-table operations
//! (workspace creation, cascading deletes, insert-if-absent) are atomic. Used
//! by `DATABASE_BACKEND=memory` and by the HTTP tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teamspace_core::models::{
    ImageChange, Member, MemberRole, MemberWithUser, NewMember, NewProject, NewTask, NewUser,
    NewWorkspace, Project, ProjectChanges, Session, Task, TaskChanges, TaskFilter, User,
    UserCredentials, Workspace, WorkspaceChanges,
};
use teamspace_core::AppError;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::traits::{MemberStore, ProjectStore, SessionStore, TaskStore, UserStore, WorkspaceStore};

#[derive(Default)]
struct State {
    users: HashMap<Uuid, UserCredentials>,
    sessions: HashMap<String, Session>,
    workspaces: HashMap<Uuid, Workspace>,
    members: HashMap<Uuid, Member>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
}

impl State {
    fn remove_project_cascade(&mut self, project_id: Uuid) -> bool {
        let removed = self.projects.remove(&project_id).is_some();
        if removed {
            self.tasks.retain(|_, task| task.project_id != project_id);
        }
        removed
    }
}

/// Shared in-memory store implementing every store trait
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of memberships stored for the workspace.
    pub async fn member_count(&self, workspace_id: Uuid) -> usize {
        let state = self.state.read().await;
        state
            .members
            .values()
            .filter(|m| m.workspace_id == workspace_id)
            .count()
    }

    /// Number of projects and tasks stored for the workspace.
    pub async fn content_count(&self, workspace_id: Uuid) -> (usize, usize) {
        let state = self.state.read().await;
        let projects = state
            .projects
            .values()
            .filter(|p| p.workspace_id == workspace_id)
            .count();
        let tasks = state
            .tasks
            .values()
            .filter(|t| t.workspace_id == workspace_id)
            .count();
        (projects, tasks)
    }
}

fn apply_image(url: &mut Option<String>, key: &mut Option<String>, change: ImageChange) {
    match change {
        ImageChange::Keep => {}
        ImageChange::Replace(image) => {
            *url = Some(image.url);
            *key = Some(image.key);
        }
        ImageChange::Clear => {
            *url = None;
            *key = None;
        }
    }
}

/// Newest first; ties broken by id so ordering is stable.
fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> (DateTime<Utc>, Uuid)) {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut state = self.state.write().await;
        let email = user.email.to_lowercase();
        if state.users.values().any(|u| u.email == email) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let creds = UserCredentials {
            id: Uuid::new_v4(),
            email,
            name: user.name,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(creds.id, creds.clone());
        Ok(creds.into())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned().map(User::from))
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        let state = self.state.read().await;
        let email = email.to_lowercase();
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        state.sessions.retain(|_, s| s.expires_at > now);

        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: now,
        };
        state
            .sessions
            .insert(session.token_hash.clone(), session.clone());
        Ok(session)
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        let state = self.state.read().await;
        Ok(state.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        Ok(state.sessions.remove(token_hash).is_some())
    }
}

#[async_trait]
impl WorkspaceStore for MemoryStore {
    async fn create_workspace(
        &self,
        workspace: NewWorkspace,
    ) -> Result<(Workspace, Member), AppError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let (image_url, image_key) = match workspace.image {
            Some(image) => (Some(image.url), Some(image.key)),
            None => (None, None),
        };

        let created = Workspace {
            id: Uuid::new_v4(),
            name: workspace.name,
            user_id: workspace.user_id,
            image_url,
            image_key,
            invite_code: workspace.invite_code,
            created_at: now,
            updated_at: now,
        };
        let admin = Member {
            id: Uuid::new_v4(),
            workspace_id: created.id,
            user_id: workspace.user_id,
            role: MemberRole::Admin,
            created_at: now,
        };

        state.workspaces.insert(created.id, created.clone());
        state.members.insert(admin.id, admin.clone());
        Ok((created, admin))
    }

    async fn get_workspace(&self, id: Uuid) -> Result<Option<Workspace>, AppError> {
        let state = self.state.read().await;
        Ok(state.workspaces.get(&id).cloned())
    }

    async fn list_workspaces_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Workspace>, AppError> {
        let state = self.state.read().await;
        let mut workspaces: Vec<Workspace> = ids
            .iter()
            .filter_map(|id| state.workspaces.get(id).cloned())
            .collect();
        newest_first(&mut workspaces, |w| (w.created_at, w.id));
        workspaces.dedup_by_key(|w| w.id);
        Ok(workspaces)
    }

    async fn update_workspace(
        &self,
        id: Uuid,
        changes: WorkspaceChanges,
    ) -> Result<Option<Workspace>, AppError> {
        let mut state = self.state.write().await;
        let Some(workspace) = state.workspaces.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            workspace.name = name;
        }
        apply_image(
            &mut workspace.image_url,
            &mut workspace.image_key,
            changes.image,
        );
        workspace.updated_at = Utc::now();
        Ok(Some(workspace.clone()))
    }

    async fn set_invite_code(
        &self,
        id: Uuid,
        code: &str,
    ) -> Result<Option<Workspace>, AppError> {
        let mut state = self.state.write().await;
        let Some(workspace) = state.workspaces.get_mut(&id) else {
            return Ok(None);
        };
        workspace.invite_code = code.to_string();
        workspace.updated_at = Utc::now();
        Ok(Some(workspace.clone()))
    }

    async fn delete_workspace(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        if state.workspaces.remove(&id).is_none() {
            return Ok(false);
        }
        state.members.retain(|_, m| m.workspace_id != id);
        state.projects.retain(|_, p| p.workspace_id != id);
        state.tasks.retain(|_, t| t.workspace_id != id);
        Ok(true)
    }
}

#[async_trait]
impl MemberStore for MemoryStore {
    async fn find_memberships(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<Member>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .members
            .values()
            .filter(|m| m.workspace_id == workspace_id && m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_member(&self, id: Uuid) -> Result<Option<Member>, AppError> {
        let state = self.state.read().await;
        Ok(state.members.get(&id).cloned())
    }

    async fn list_memberships_for_user(&self, user_id: Uuid) -> Result<Vec<Member>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .members
            .values()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_members_with_users(
        &self,
        workspace_id: Uuid,
    ) -> Result<Vec<MemberWithUser>, AppError> {
        let state = self.state.read().await;
        let mut rows: Vec<MemberWithUser> = state
            .members
            .values()
            .filter(|m| m.workspace_id == workspace_id)
            .filter_map(|m| {
                state.users.get(&m.user_id).map(|u| MemberWithUser {
                    id: m.id,
                    workspace_id: m.workspace_id,
                    user_id: m.user_id,
                    role: m.role,
                    name: u.name.clone(),
                    email: u.email.clone(),
                    created_at: m.created_at,
                })
            })
            .collect();
        rows.sort_by_key(|m| (m.created_at, m.id));
        Ok(rows)
    }

    async fn insert_member_if_absent(
        &self,
        member: NewMember,
    ) -> Result<Option<Member>, AppError> {
        let mut state = self.state.write().await;
        if !state.workspaces.contains_key(&member.workspace_id) {
            return Err(AppError::NotFound("Workspace not found".to_string()));
        }
        let exists = state
            .members
            .values()
            .any(|m| m.workspace_id == member.workspace_id && m.user_id == member.user_id);
        if exists {
            return Ok(None);
        }

        let created = Member {
            id: Uuid::new_v4(),
            workspace_id: member.workspace_id,
            user_id: member.user_id,
            role: member.role,
            created_at: Utc::now(),
        };
        state.members.insert(created.id, created.clone());
        Ok(Some(created))
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_project(&self, project: NewProject) -> Result<Project, AppError> {
        let mut state = self.state.write().await;
        if !state.workspaces.contains_key(&project.workspace_id) {
            return Err(AppError::NotFound("Workspace not found".to_string()));
        }

        let now = Utc::now();
        let (image_url, image_key) = match project.image {
            Some(image) => (Some(image.url), Some(image.key)),
            None => (None, None),
        };
        let created = Project {
            id: Uuid::new_v4(),
            name: project.name,
            workspace_id: project.workspace_id,
            image_url,
            image_key,
            created_at: now,
            updated_at: now,
        };
        state.projects.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let state = self.state.read().await;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list_projects(&self, workspace_id: Uuid) -> Result<Vec<Project>, AppError> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state
            .projects
            .values()
            .filter(|p| p.workspace_id == workspace_id)
            .cloned()
            .collect();
        newest_first(&mut projects, |p| (p.created_at, p.id));
        Ok(projects)
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, AppError> {
        let mut state = self.state.write().await;
        let Some(project) = state.projects.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            project.name = name;
        }
        apply_image(&mut project.image_url, &mut project.image_key, changes.image);
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        Ok(state.remove_project_cascade(id))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, task: NewTask) -> Result<Task, AppError> {
        let mut state = self.state.write().await;
        if !state.projects.contains_key(&task.project_id) {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        let now = Utc::now();
        let created = Task {
            id: Uuid::new_v4(),
            name: task.name,
            workspace_id: task.workspace_id,
            project_id: task.project_id,
            assignee_id: task.assignee_id,
            status: task.status,
            due_date: task.due_date,
            description: task.description,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let state = self.state.read().await;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, AppError> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        newest_first(&mut tasks, |t| (t.created_at, t.id));
        Ok(tasks)
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>, AppError> {
        let mut state = self.state.write().await;
        let Some(task) = state.tasks.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            task.name = name;
        }
        if let Some(project_id) = changes.project_id {
            task.project_id = project_id;
        }
        if let Some(assignee_id) = changes.assignee_id {
            task.assignee_id = assignee_id;
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        if let Some(due_date) = changes.due_date {
            task.due_date = due_date;
        }
        if let Some(description) = changes.description {
            task.description = description;
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        Ok(state.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use teamspace_core::models::TaskStatus;

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        store
            .create_user(NewUser {
                name: "Test".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    async fn seed_workspace(store: &MemoryStore, owner: Uuid) -> Workspace {
        let (workspace, _) = store
            .create_workspace(NewWorkspace {
                name: "Acme".to_string(),
                user_id: owner,
                image: None,
                invite_code: "ABCDEFGHIJ".to_string(),
            })
            .await
            .unwrap();
        workspace
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict_case_insensitive() {
        let store = MemoryStore::new();
        seed_user(&store, "a@example.com").await;
        let err = store
            .create_user(NewUser {
                name: "Other".to_string(),
                email: "A@Example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn creating_a_session_sweeps_expired_ones() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "a@example.com").await;
        let now = Utc::now();

        store
            .create_session(user.id, "stale", now - chrono::Duration::hours(1))
            .await
            .unwrap();
        store
            .create_session(user.id, "live", now + chrono::Duration::hours(1))
            .await
            .unwrap();
        assert!(store.find_session("stale").await.unwrap().is_none());

        store
            .create_session(user.id, "fresh", now + chrono::Duration::hours(1))
            .await
            .unwrap();
        assert!(store.find_session("live").await.unwrap().is_some());
        assert!(store.find_session("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn create_workspace_adds_admin_membership() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@example.com").await;
        let workspace = seed_workspace(&store, owner.id).await;

        let rows = store.find_memberships(workspace.id, owner.id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].role, MemberRole::Admin);
    }

    #[tokio::test]
    async fn insert_member_if_absent_is_idempotent() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@example.com").await;
        let joiner = seed_user(&store, "joiner@example.com").await;
        let workspace = seed_workspace(&store, owner.id).await;

        let new_member = NewMember {
            workspace_id: workspace.id,
            user_id: joiner.id,
            role: MemberRole::Member,
        };
        assert!(store
            .insert_member_if_absent(new_member.clone())
            .await
            .unwrap()
            .is_some());
        assert!(store
            .insert_member_if_absent(new_member)
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.member_count(workspace.id).await, 2);
    }

    #[tokio::test]
    async fn deleting_workspace_cascades() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@example.com").await;
        let workspace = seed_workspace(&store, owner.id).await;
        let admin = store
            .find_memberships(workspace.id, owner.id)
            .await
            .unwrap()
            .remove(0);
        let project = store
            .create_project(NewProject {
                name: "Website".to_string(),
                workspace_id: workspace.id,
                image: None,
            })
            .await
            .unwrap();
        store
            .create_task(NewTask {
                name: "Landing page".to_string(),
                workspace_id: workspace.id,
                project_id: project.id,
                assignee_id: admin.id,
                status: TaskStatus::Todo,
                due_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(store.content_count(workspace.id).await, (1, 1));

        assert!(store.delete_workspace(workspace.id).await.unwrap());
        assert!(store.get_workspace(workspace.id).await.unwrap().is_none());
        assert_eq!(store.member_count(workspace.id).await, 0);
        assert_eq!(store.content_count(workspace.id).await, (0, 0));
        assert!(!store.delete_workspace(workspace.id).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_project_removes_its_tasks_only() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@example.com").await;
        let workspace = seed_workspace(&store, owner.id).await;
        let admin = store
            .find_memberships(workspace.id, owner.id)
            .await
            .unwrap()
            .remove(0);

        let mut project_ids = Vec::new();
        for name in ["One", "Two"] {
            let project = store
                .create_project(NewProject {
                    name: name.to_string(),
                    workspace_id: workspace.id,
                    image: None,
                })
                .await
                .unwrap();
            store
                .create_task(NewTask {
                    name: format!("{} task", name),
                    workspace_id: workspace.id,
                    project_id: project.id,
                    assignee_id: admin.id,
                    status: TaskStatus::Backlog,
                    due_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                    description: None,
                })
                .await
                .unwrap();
            project_ids.push(project.id);
        }

        assert!(store.delete_project(project_ids[0]).await.unwrap());
        assert_eq!(store.content_count(workspace.id).await, (1, 1));
    }

    #[tokio::test]
    async fn image_change_clear_and_keep() {
        let store = MemoryStore::new();
        let owner = seed_user(&store, "owner@example.com").await;
        let workspace = seed_workspace(&store, owner.id).await;

        let replaced = store
            .update_workspace(
                workspace.id,
                WorkspaceChanges {
                    name: None,
                    image: ImageChange::Replace(teamspace_core::models::ImageRef {
                        url: "http://localhost/media/a.png".to_string(),
                        key: "a.png".to_string(),
                    }),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.image_key.as_deref(), Some("a.png"));

        let kept = store
            .update_workspace(
                workspace.id,
                WorkspaceChanges {
                    name: Some("Renamed".to_string()),
                    image: ImageChange::Keep,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.name, "Renamed");
        assert_eq!(kept.image_key.as_deref(), Some("a.png"));

        let cleared = store
            .update_workspace(
                workspace.id,
                WorkspaceChanges {
                    name: None,
                    image: ImageChange::Clear,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(cleared.image_url.is_none());
        assert!(cleared.image_key.is_none());
    }
}
