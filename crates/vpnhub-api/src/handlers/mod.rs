//! HTTP request handlers, organized by domain.

pub mod admin;
pub mod auth;
pub mod connections;
pub mod health;
pub mod servers;
