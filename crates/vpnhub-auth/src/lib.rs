//! # vpnhub-auth
//!
//! Authentication and authorization for VPN Hub.
//!
//! ## Modules
//!
//! - `identity`: exchange of an identity-provider session id for a profile
//! - `session`: session issue/resolve/revoke and expired-session purge
//! - `rbac`: admin gating

pub mod identity;
pub mod rbac;
pub mod session;

pub use identity::{HttpIdentityProvider, IdentityProfile, IdentityProvider, StaticIdentityProvider};
pub use rbac::RbacEnforcer;
pub use session::{LoginResult, SessionCleanup, SessionManager};
