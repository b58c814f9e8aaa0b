//! PostgreSQL repositories
//!
//! Each repository wraps the shared pool and implements one store trait.

mod member;
mod project;
mod session;
mod task;
mod user;
mod workspace;

pub use member::MemberRepository;
pub use project::ProjectRepository;
pub use session::SessionRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
pub use workspace::WorkspaceRepository;
