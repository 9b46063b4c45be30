//! # vpnhub-database
//!
//! Persistence for VPN Hub. The [`traits`] module defines one store trait
//! per collection; [`repositories`] implements them on PostgreSQL and
//! [`memory`] implements them in process. [`Store`] bundles the four
//! handles for the configured provider.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod traits;

pub use connection::DatabasePool;
pub use store::Store;
pub use traits::{ConnectionStore, CounterDrift, ServerStore, SessionStore, UserStore};
