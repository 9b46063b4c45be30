//! # vpnhub-service
//!
//! Business logic service layer for VPN Hub. Services orchestrate the
//! store traits and the RBAC enforcer to implement application use cases.
//!
//! Services follow constructor injection: every dependency is provided at
//! construction time as an `Arc` handle.

pub mod connection;
pub mod context;
pub mod server;
pub mod stats;
pub mod user;

pub use connection::{ConnectOutcome, ConnectionLedger, CounterReconciler};
pub use context::RequestContext;
pub use server::{SAMPLE_SERVERS, ServerRegistry};
pub use stats::{AdminStats, StatsService};
pub use user::AdminUserService;
