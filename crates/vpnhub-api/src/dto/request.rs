//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use vpnhub_entity::server::{NewServer, ServerPatch, ServerStatus};

/// Create server request (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateServerRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    /// Country.
    #[validate(length(min = 1, max = 100, message = "Country is required"))]
    pub country: String,
    /// City.
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    /// Network address.
    #[validate(ip(message = "Invalid IP address"))]
    pub ip_address: String,
    /// Initial status (defaults to offline).
    pub status: Option<ServerStatus>,
    /// Capacity ceiling (defaults to 1000).
    #[validate(range(min = 0, message = "max_connections must not be negative"))]
    pub max_connections: Option<i32>,
}

impl From<CreateServerRequest> for NewServer {
    fn from(req: CreateServerRequest) -> Self {
        NewServer {
            name: req.name,
            country: req.country,
            city: req.city,
            ip_address: req.ip_address,
            status: req.status,
            max_connections: req.max_connections,
        }
    }
}

/// Partial server update (admin). Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateServerRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Country.
    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,
    /// City.
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    /// Network address.
    #[validate(ip(message = "Invalid IP address"))]
    pub ip_address: Option<String>,
    /// Status.
    pub status: Option<ServerStatus>,
    /// Load percentage.
    #[validate(range(min = 0, max = 100, message = "load must be between 0 and 100"))]
    pub load: Option<i32>,
    /// Capacity ceiling.
    #[validate(range(min = 0, message = "max_connections must not be negative"))]
    pub max_connections: Option<i32>,
}

impl From<UpdateServerRequest> for ServerPatch {
    fn from(req: UpdateServerRequest) -> Self {
        ServerPatch {
            name: req.name,
            country: req.country,
            city: req.city,
            ip_address: req.ip_address,
            status: req.status,
            load: req.load,
            max_connections: req.max_connections,
        }
    }
}

/// Change a user's role (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    /// New role, `user` or `admin`.
    pub role: String,
}

/// Query parameters of the history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct HistoryQuery {
    /// Maximum number of records.
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_are_rejected() {
        let body = r#"{"name":"X","current_connections":5}"#;
        assert!(serde_json::from_str::<UpdateServerRequest>(body).is_err());
    }

    #[test]
    fn test_load_out_of_range_fails_validation() {
        let req = UpdateServerRequest {
            load: Some(101),
            ..Default::default()
        };
        assert!(req.validate().is_err());

        let req = UpdateServerRequest {
            load: Some(100),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_checks_ip() {
        let body = r#"{"name":"A","country":"US","city":"NYC","ip_address":"not-an-ip"}"#;
        let req: CreateServerRequest = serde_json::from_str(body).unwrap();
        assert!(req.validate().is_err());

        let body = r#"{"name":"A","country":"US","city":"NYC","ip_address":"10.0.0.1","status":"online"}"#;
        let req: CreateServerRequest = serde_json::from_str(body).unwrap();
        assert!(req.validate().is_ok());
        let new_server = NewServer::from(req);
        assert_eq!(new_server.status, Some(ServerStatus::Online));
    }
}
