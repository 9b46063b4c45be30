//! Server catalog management.

pub mod registry;
pub mod seed;

pub use registry::ServerRegistry;
pub use seed::SAMPLE_SERVERS;
