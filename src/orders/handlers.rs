// HTTP handlers for quote and checkout endpoints
//
// Bodies are read as raw bytes and parsed here so every storefront shape,
// and an empty body, reaches the normalizer.

use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::orders::{CheckoutResponse, QuoteResponse, RawOrderPayload};

/// Handler for POST /api/quote
/// Prices an order from its dimensions and quantity
#[utoipa::path(
    post,
    path = "/api/quote",
    responses(
        (status = 200, description = "Server-computed price", body = QuoteResponse),
        (status = 400, description = "Missing or invalid fields, or an order too large to charge", body = String, example = json!({"error_code": "VALIDATION_ERROR", "message": "Missing or invalid field(s): quantity"}))
    ),
    tag = "pricing"
)]
pub async fn quote_handler(
    State(state): State<crate::AppState>,
    body: Bytes,
) -> Result<Json<QuoteResponse>, ApiError> {
    let raw = RawOrderPayload::from_slice(&body)?;
    let quote = state.order_service.quote(&raw)?;
    Ok(Json(quote))
}

/// Handler for POST /api/checkout
/// Normalizes the order, re-prices it and starts a payment session
#[utoipa::path(
    post,
    path = "/api/checkout",
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 400, description = "Invalid JSON, missing/invalid fields or an order too large to charge", body = String, example = json!({"error_code": "VALIDATION_ERROR", "message": "Missing or invalid field(s): width, total"})),
        (status = 409, description = "Client price does not match the server quote", body = String, example = json!({"error_code": "PRICE_MISMATCH"})),
        (status = 500, description = "Checkout not configured", body = String, example = json!({"error_code": "CONFIGURATION_ERROR"})),
        (status = 502, description = "Payment processor failure", body = String, example = json!({"error_code": "UPSTREAM_ERROR"}))
    ),
    tag = "checkout"
)]
pub async fn create_checkout_handler(
    State(state): State<crate::AppState>,
    body: Bytes,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let raw = RawOrderPayload::from_slice(&body)?;
    let checkout = state.order_service.create_checkout(&raw).await?;
    Ok(Json(checkout))
}

/// Handler for GET /api/checkout
/// Friendly message for browser visits
#[utoipa::path(
    get,
    path = "/api/checkout",
    responses(
        (status = 200, description = "Usage hint", body = String, example = json!({"message": "Use POST to create a checkout session."}))
    ),
    tag = "checkout"
)]
pub async fn checkout_info_handler() -> Json<Value> {
    Json(json!({ "message": "Use POST to create a checkout session." }))
}
