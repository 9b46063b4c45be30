//! Sample server catalog installed into an empty registry.

use vpnhub_entity::server::ServerStatus;

/// A sample catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct SampleServer {
    /// Display name.
    pub name: &'static str,
    /// Country.
    pub country: &'static str,
    /// City.
    pub city: &'static str,
    /// Network address (documentation range).
    pub ip_address: &'static str,
    /// Initial status.
    pub status: ServerStatus,
    /// Simulated load percentage.
    pub load: i32,
    /// Capacity ceiling.
    pub max_connections: i32,
}

/// The six servers seeded on first start.
pub const SAMPLE_SERVERS: [SampleServer; 6] = [
    SampleServer {
        name: "US East (New York)",
        country: "United States",
        city: "New York",
        ip_address: "198.51.100.10",
        status: ServerStatus::Online,
        load: 25,
        max_connections: 1000,
    },
    SampleServer {
        name: "US West (Los Angeles)",
        country: "United States",
        city: "Los Angeles",
        ip_address: "198.51.100.20",
        status: ServerStatus::Online,
        load: 45,
        max_connections: 1000,
    },
    SampleServer {
        name: "UK (London)",
        country: "United Kingdom",
        city: "London",
        ip_address: "198.51.100.30",
        status: ServerStatus::Online,
        load: 60,
        max_connections: 800,
    },
    SampleServer {
        name: "Germany (Berlin)",
        country: "Germany",
        city: "Berlin",
        ip_address: "198.51.100.40",
        status: ServerStatus::Online,
        load: 35,
        max_connections: 1200,
    },
    SampleServer {
        name: "Japan (Tokyo)",
        country: "Japan",
        city: "Tokyo",
        ip_address: "198.51.100.50",
        status: ServerStatus::Maintenance,
        load: 0,
        max_connections: 600,
    },
    SampleServer {
        name: "Singapore",
        country: "Singapore",
        city: "Singapore",
        ip_address: "198.51.100.60",
        status: ServerStatus::Online,
        load: 80,
        max_connections: 500,
    },
];
