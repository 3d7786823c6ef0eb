//! Protocol types for the HTTP API
//!
//! This module defines the error codes and error bodies returned by the
//! catalog endpoints, and the mapping from catalog errors to HTTP statuses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::lens::catalog::CatalogError;

// =============================================================================
// Error Types
// =============================================================================

/// Error data structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorData {
    /// Error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorData {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create an error with details
    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a store unavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

/// Error codes returned in error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No entity matched at some level of the hierarchy
    NotFound,
    /// A path token is neither a safe name nor a surrogate id
    InvalidIdentifier,
    /// The catalog store could not be opened or queried
    StoreUnavailable,
    /// Unexpected server error
    InternalError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidIdentifier => StatusCode::BAD_REQUEST,
            Self::StoreUnavailable | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorData,
}

/// Error returned by HTTP handlers
#[derive(Debug, Clone)]
pub struct ApiError(pub ErrorData);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.0.code.status()
    }

    pub fn data(&self) -> &ErrorData {
        &self.0
    }
}

impl From<ErrorData> for ApiError {
    fn from(data: ErrorData) -> Self {
        Self(data)
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let data = match &err {
            CatalogError::MalformedIdentifier { kind, token } => ErrorData::with_details(
                ErrorCode::InvalidIdentifier,
                err.to_string(),
                json!({ "kind": kind, "token": token }),
            ),
            CatalogError::NotFound { .. } | CatalogError::NoDefaultSchema { .. } => {
                ErrorData::not_found(err.to_string())
            }
            CatalogError::StoreUnavailable(source) => {
                warn!("catalog store failure: {:#}", source);
                ErrorData::store_unavailable("catalog store unavailable")
            }
        };
        Self(data)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.0 })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::catalog::EntityKind;

    #[test]
    fn test_error_codes_serialization() {
        let error = ErrorData::new(ErrorCode::InvalidIdentifier, "test error");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"INVALID_IDENTIFIER\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_catalog_error_mapping() {
        let api: ApiError = CatalogError::not_found(EntityKind::Database, "nonexistent").into();
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.data().message, "database 'nonexistent' not found");

        let api: ApiError = CatalogError::MalformedIdentifier {
            kind: EntityKind::Table,
            token: "1bad".to_string(),
        }
        .into();
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            api.data().details,
            Some(serde_json::json!({"kind": "table", "token": "1bad"}))
        );

        let api: ApiError = CatalogError::StoreUnavailable(anyhow::anyhow!("disk I/O error")).into();
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.data().code, ErrorCode::StoreUnavailable);
        // store internals stay in the log
        assert!(!api.data().message.contains("disk"));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: ErrorData::not_found("table 'x' not found"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"error": {"code": "NOT_FOUND", "message": "table 'x' not found"}})
        );
    }
}
