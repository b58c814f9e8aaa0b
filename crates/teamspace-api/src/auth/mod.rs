//! Session authentication: password hashing, opaque session tokens, the
//! session cookie and the middleware that resolves the current user.

pub mod cookies;
pub mod middleware;
pub mod models;
pub mod password;
pub mod session;

pub use middleware::{auth_middleware, resolve_current_user};
pub use models::{CurrentUser, MaybeCurrentUser};
