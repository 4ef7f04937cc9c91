//! API response structures

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::Snapshot;

/// API response structure for endpoints that act on the timer
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: Snapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, snapshot: Snapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            snapshot,
        }
    }

    /// The request changed the timer
    pub fn applied(message: String, snapshot: Snapshot) -> Self {
        Self::new("applied".to_string(), message, snapshot)
    }

    /// The request was valid but had no effect in the current state
    pub fn ignored(message: String, snapshot: Snapshot) -> Self {
        Self::new("ignored".to_string(), message, snapshot)
    }
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn rejected(message: String) -> Self {
        Self {
            status: "rejected".to_string(),
            message,
        }
    }
}

/// Status response with daemon metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
