//! VPN server catalog entities.

pub mod model;
pub mod status;

pub use model::{DEFAULT_MAX_CONNECTIONS, NewServer, Server, ServerPatch};
pub use status::ServerStatus;
