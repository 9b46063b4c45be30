//! Connection ledger entities.

pub mod model;
pub mod status;

pub use model::{Connection, ConnectionView, UNKNOWN_SERVER, duration_seconds};
pub use status::ConnectionStatus;
