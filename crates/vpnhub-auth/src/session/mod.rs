//! Session lifecycle: issue on login, resolve per request, revoke on logout.

pub mod cleanup;
pub mod manager;

pub use cleanup::SessionCleanup;
pub use manager::{LoginResult, SessionManager};
