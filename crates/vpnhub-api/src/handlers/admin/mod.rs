//! Admin-only handlers.

pub mod servers;
pub mod stats;
pub mod users;
