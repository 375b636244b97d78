use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::{GatewayError, GatewayResult};

/// Name of the multipart field that carries uploaded files
pub const FILE_FIELD: &str = "file";

/// Body returned by a successful upload
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Files uploaded successfully";

/// A file that was committed to the store by an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Unhealthy,
}

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub store_root: String,
}
