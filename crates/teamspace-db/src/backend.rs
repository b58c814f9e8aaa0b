use std::sync::Arc;

use sqlx::PgPool;

use crate::memory::MemoryStore;
use crate::postgres::{
    MemberRepository, ProjectRepository, SessionRepository, TaskRepository, UserRepository,
    WorkspaceRepository,
};
use crate::traits::{MemberStore, ProjectStore, SessionStore, TaskStore, UserStore, WorkspaceStore};

/// Handle to the record backend, shared through application state
#[derive(Clone)]
pub struct Backend {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub workspaces: Arc<dyn WorkspaceStore>,
    pub members: Arc<dyn MemberStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl Backend {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            sessions: Arc::new(SessionRepository::new(pool.clone())),
            workspaces: Arc::new(WorkspaceRepository::new(pool.clone())),
            members: Arc::new(MemberRepository::new(pool.clone())),
            projects: Arc::new(ProjectRepository::new(pool.clone())),
            tasks: Arc::new(TaskRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_memory(MemoryStore::new())
    }

    /// Backend over an existing in-memory store, so callers can keep a handle to it.
    pub fn from_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            sessions: store.clone(),
            workspaces: store.clone(),
            members: store.clone(),
            projects: store.clone(),
            tasks: store,
        }
    }
}
