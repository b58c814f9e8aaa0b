//! Data models for the application
//!
//! Organized by domain: users and sessions, workspaces, members, projects and tasks.

mod common;
mod member;
mod project;
mod task;
mod user;
mod workspace;

pub use common::*;
pub use member::*;
pub use project::*;
pub use task::*;
pub use user::*;
pub use workspace::*;
