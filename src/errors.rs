use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Unprocessable Entity")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No rating configuration exists for the (supplier, material) pair.
    /// Carries both ids so an administrator can fix the catalog.
    #[error("No rating configuration for supplier {supplier_id} and material {material_type_id}")]
    MissingRatingConfig {
        supplier_id: Uuid,
        material_type_id: Uuid,
    },

    /// No price configuration exists for the (material, classification) pair.
    #[error("No price configuration for material {material_type_id} and classification {classification}")]
    MissingPriceConfig {
        material_type_id: Uuid,
        classification: String,
    },

    /// A price lookup resolved but produced a non-positive value from
    /// positive inputs. Treated as catalog misconfiguration, not a valid
    /// zero-value item.
    #[error("Computed value {computed} is invalid for material {material_type_id} (unit price {unit_price}, weight {weight_kg})")]
    InvalidComputedValue {
        material_type_id: Uuid,
        unit_price: Decimal,
        weight_kg: Decimal,
        computed: Decimal,
    },

    #[error("Invalid transition: cannot {action} {id} in status {status}")]
    InvalidTransition {
        id: Uuid,
        status: String,
        action: &'static str,
    },

    /// A second receive attempt for a request that already produced a lot.
    #[error("Request {0} has already been received")]
    AlreadyReceived(Uuid),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for DbErr {
    fn into_db_err(self) -> DbErr {
        self
    }
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        ServiceError::DatabaseError(error.into_db_err())
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::MissingRatingConfig { .. }
            | Self::MissingPriceConfig { .. }
            | Self::InvalidComputedValue { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidTransition { .. } | Self::AlreadyReceived(_) | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::EventError(_) | Self::InternalError(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::EventError(_) | Self::InternalError(_) | Self::Other(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

/// API error type for HTTP handlers. Wraps service failures and adds the
/// request-shaping failures that never reach a service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    ServiceError(#[from] ServiceError),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ServiceError(err) => err.into_response(),
            ApiError::ValidationError(message) => {
                let err = ErrorResponse {
                    error: "Bad Request".to_string(),
                    message,
                    details: None,
                    timestamp: chrono::Utc::now().to_rfc3339(),
                };
                (StatusCode::BAD_REQUEST, Json(err)).into_response()
            }
            ApiError::NotFound(message) => {
                let err = ErrorResponse {
                    error: "Not Found".to_string(),
                    message,
                    details: None,
                    timestamp: chrono::Utc::now().to_rfc3339(),
                };
                (StatusCode::NOT_FOUND, Json(err)).into_response()
            }
            ApiError::Unauthorized => {
                let err = ErrorResponse {
                    error: "Unauthorized".to_string(),
                    message: "Missing or invalid actor identity".to_string(),
                    details: None,
                    timestamp: chrono::Utc::now().to_rfc3339(),
                };
                (StatusCode::UNAUTHORIZED, Json(err)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_map_to_unprocessable_entity() {
        let err = ServiceError::MissingRatingConfig {
            supplier_id: Uuid::new_v4(),
            material_type_id: Uuid::new_v4(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = ServiceError::MissingPriceConfig {
            material_type_id: Uuid::new_v4(),
            classification: "heavy".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn state_errors_map_to_conflict() {
        let id = Uuid::new_v4();
        let err = ServiceError::AlreadyReceived(id);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.to_string().contains(&id.to_string()));

        let err = ServiceError::InvalidTransition {
            id,
            status: "rejected".to_string(),
            action: "approve",
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let err = ServiceError::db_error("connection reset by peer");
        assert_eq!(err.response_message(), "Database error");
    }
}
