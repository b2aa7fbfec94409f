// Error handling module for the sticker checkout API
// Provides centralized error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::checkout::GatewayError;
use crate::orders::{OrderError, OrderField, ValidationError};
use crate::pricing::PricingError;

/// Main error type for the API
/// All handlers should return Result<T, ApiError>
#[derive(Debug)]
pub enum ApiError {
    /// Request body is not valid JSON
    /// Maps to HTTP 400 Bad Request
    InvalidJson(String),

    /// Missing or invalid order fields
    /// Maps to HTTP 400 Bad Request
    ValidationError(ValidationError),

    /// Client price disagrees with the server quote
    /// Maps to HTTP 409 Conflict
    PriceMismatch {
        field: OrderField,
        client_cents: i64,
        quoted_cents: i64,
    },

    /// Required server configuration is absent
    /// Maps to HTTP 500 Internal Server Error
    ConfigurationError(String),

    /// Payment processor call failed
    /// Maps to HTTP 502 Bad Gateway
    UpstreamError(GatewayError),

    /// Order prices above what the processor can charge
    /// Maps to HTTP 400 Bad Request
    OrderTooLarge { maximum_cents: i64 },
}

/// Consistent error response structure
///
/// Every error body carries a machine-readable `error_code` and a
/// human-readable `message`. Fields follow snake_case naming.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details, omitted from JSON when None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// ISO 8601 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Client errors are logged at debug (or warn for price mismatches);
    /// server and upstream errors at error. Server-side detail never
    /// reaches the response body.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::InvalidJson(reason) => {
                debug!("Invalid JSON body: {}", reason);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("INVALID_JSON", "Invalid JSON body.", None),
                )
            }
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {}", errors);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "VALIDATION_ERROR",
                        errors.to_string(),
                        Some(json!({ "fields": errors.field_names() })),
                    ),
                )
            }
            ApiError::PriceMismatch {
                field,
                client_cents,
                quoted_cents,
            } => {
                warn!(
                    "Price mismatch on {}: client {} vs quoted {}",
                    field, client_cents, quoted_cents
                );

                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(
                        "PRICE_MISMATCH",
                        "Submitted price does not match the current quote",
                        Some(json!({
                            "field": field.as_str(),
                            "client_cents": client_cents,
                            "quoted_cents": quoted_cents,
                        })),
                    ),
                )
            }
            ApiError::ConfigurationError(message) => {
                error!("Configuration error: {}", message);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "CONFIGURATION_ERROR",
                        "Checkout is not configured on this server",
                        None,
                    ),
                )
            }
            ApiError::UpstreamError(gateway_error) => {
                error!("Upstream error: {}", gateway_error);

                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new(
                        "UPSTREAM_ERROR",
                        "Could not start checkout with the payment processor",
                        None,
                    ),
                )
            }
            ApiError::OrderTooLarge { maximum_cents } => {
                debug!("Order total above {} cents refused", maximum_cents);

                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "ORDER_TOO_LARGE",
                        "Order total exceeds the maximum that can be charged",
                        Some(json!({ "maximum_cents": maximum_cents })),
                    ),
                )
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::PriceMismatch { .. } => StatusCode::CONFLICT,
            ApiError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            ApiError::OrderTooLarge { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

/// Convert order errors to ApiError
impl From<OrderError> for ApiError {
    fn from(error: OrderError) -> Self {
        match error {
            OrderError::Validation(errors) => ApiError::ValidationError(errors),
            OrderError::Pricing(PricingError::TotalTooLarge { maximum_cents }) => {
                ApiError::OrderTooLarge { maximum_cents }
            }
            OrderError::PriceMismatch {
                field,
                client_cents,
                quoted_cents,
            } => ApiError::PriceMismatch {
                field,
                client_cents,
                quoted_cents,
            },
            OrderError::Configuration(message) => ApiError::ConfigurationError(message),
            OrderError::Upstream(gateway_error) => ApiError::UpstreamError(gateway_error),
        }
    }
}

/// Convert body parse errors to ApiError
impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::InvalidJson(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_status_codes() {
        let validation = ApiError::ValidationError(ValidationError::new(BTreeSet::from([
            OrderField::Quantity,
        ])));
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);

        let mismatch = ApiError::PriceMismatch {
            field: OrderField::Total,
            client_cents: 1,
            quoted_cents: 3000,
        };
        assert_eq!(mismatch.status_code(), StatusCode::CONFLICT);

        let upstream = ApiError::UpstreamError(GatewayError::MissingUrl("cs_1".to_string()));
        assert_eq!(upstream.status_code(), StatusCode::BAD_GATEWAY);

        let config = ApiError::ConfigurationError("missing key".to_string());
        assert_eq!(config.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_response_lists_fields() {
        let error = ApiError::ValidationError(ValidationError::new(BTreeSet::from([
            OrderField::Width,
            OrderField::Total,
        ])));
        let (status, body) = error.to_error_response();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error_code, "VALIDATION_ERROR");
        assert_eq!(body.message, "Missing or invalid field(s): width, total");
        assert_eq!(body.details, Some(json!({ "fields": ["width", "total"] })));
    }

    #[test]
    fn test_upstream_detail_is_not_exposed() {
        let error = ApiError::UpstreamError(GatewayError::Rejected {
            status: 401,
            body: "Invalid API Key provided: sk_test_***".to_string(),
        });
        let (_, body) = error.to_error_response();

        assert_eq!(body.error_code, "UPSTREAM_ERROR");
        assert!(!body.message.contains("sk_test"));
        assert!(body.details.is_none());
    }

    #[test]
    fn test_order_error_conversion() {
        let api: ApiError = OrderError::Configuration("STRIPE_SECRET_KEY is not set".to_string()).into();
        assert!(matches!(api, ApiError::ConfigurationError(_)));
    }

    #[test]
    fn test_pricing_error_conversion() {
        let api: ApiError = OrderError::Pricing(PricingError::TotalTooLarge {
            maximum_cents: 99_999_999,
        })
        .into();
        assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);

        let (_, body) = api.to_error_response();
        assert_eq!(body.error_code, "ORDER_TOO_LARGE");
        assert_eq!(body.details, Some(json!({ "maximum_cents": 99_999_999 })));
    }
}
