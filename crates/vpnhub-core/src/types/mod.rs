//! Core type definitions used across the VPN Hub workspace.

pub mod id;

pub use id::*;
