//! API request and response types.

use serde::Serialize;
use utoipa::ToSchema;

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Content store connectivity.
    pub database: String,
    /// Timestamp.
    pub timestamp: String,
}
