//! Shared OpenAPI schema definitions for the HTTP surface.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Error envelope documented for every failing response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorSchema {
    /// Human-readable message.
    #[schema(example = "exchange 7 not found")]
    pub error: String,
    /// Stable machine-readable code.
    #[schema(example = "not_found")]
    pub code: String,
    /// Optional structured details.
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}
