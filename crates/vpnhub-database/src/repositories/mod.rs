//! PostgreSQL implementations of the store traits.

pub mod connection;
pub mod server;
pub mod session;
pub mod user;

pub use connection::ConnectionRepository;
pub use server::ServerRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
