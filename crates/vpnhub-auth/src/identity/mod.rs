//! External identity provider exchange.

pub mod http;
pub mod provider;
pub mod stub;

pub use http::HttpIdentityProvider;
pub use provider::{IdentityProfile, IdentityProvider};
pub use stub::StaticIdentityProvider;
