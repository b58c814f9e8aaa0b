//! Record backends for Teamspace
//!
//! Store traits abstract persistence so handlers can run against PostgreSQL in
//! production and the in-memory backend in development and tests. A
//! [`Backend`] bundles one implementation of each trait and is built once at
//! startup.

pub mod backend;
pub mod memory;
pub mod postgres;
pub mod traits;

pub use backend::Backend;
pub use memory::MemoryStore;
pub use postgres::{
    MemberRepository, ProjectRepository, SessionRepository, TaskRepository, UserRepository,
    WorkspaceRepository,
};
pub use traits::{MemberStore, ProjectStore, SessionStore, TaskStore, UserStore, WorkspaceStore};
