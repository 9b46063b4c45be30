//! # vpnhub-entity
//!
//! Domain entity models for VPN Hub. Every struct in this crate represents
//! a stored record or a domain value object. Stored records derive
//! `sqlx::FromRow` in addition to `Serialize`/`Deserialize`.

pub mod connection;
pub mod server;
pub mod session;
pub mod user;
