//! Admin dashboard statistics.

pub mod service;

pub use service::{AdminStats, StatsService};
