//! Sticker order pricing and checkout API.
//!
//! Quotes custom sticker orders (tiered per-square-foot rates, size discount,
//! order minimum), normalizes the payload shapes sent by every storefront
//! version, and hands re-priced orders to Stripe Checkout.

pub mod checkout;
pub mod config;
pub mod error;
pub mod orders;
pub mod pricing;
pub mod validation;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use checkout::{CheckoutGateway, GatewayError, StripeGateway};
use config::AppConfig;
use orders::{CheckoutResponse, OrderService, QuoteResponse};
use pricing::PriceQuote;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        orders::handlers::quote_handler,
        orders::handlers::create_checkout_handler,
        orders::handlers::checkout_info_handler,
        health_handler,
    ),
    components(
        schemas(QuoteResponse, CheckoutResponse, PriceQuote)
    ),
    tags(
        (name = "pricing", description = "Sticker price quotes"),
        (name = "checkout", description = "Payment checkout sessions"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "Sticker Checkout API",
        version = "0.1.0",
        description = "Prices custom sticker orders and starts payment checkout"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub order_service: OrderService,
}

impl AppState {
    /// Build state from configuration, wiring Stripe when a key is present
    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let gateway: Option<Arc<dyn CheckoutGateway>> = match config.stripe() {
            Some(stripe) => Some(Arc::new(StripeGateway::new(stripe)?) as Arc<dyn CheckoutGateway>),
            None => {
                tracing::warn!("STRIPE_SECRET_KEY is not set; checkout requests will fail");
                None
            }
        };

        Ok(Self::new(config, gateway))
    }

    /// Build state with an explicit gateway
    pub fn new(config: &AppConfig, gateway: Option<Arc<dyn CheckoutGateway>>) -> Self {
        Self {
            order_service: OrderService::new(
                config.price_calculator(),
                gateway,
                config.checkout_urls(),
                config.price_tolerance_cents,
            ),
        }
    }
}

/// Handler for GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = String, example = json!({"status": "ok"}))
    ),
    tag = "health"
)]
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// CORS policy: configured origins (or any), POST/GET/OPTIONS, JSON bodies
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allow_all_origins {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unusable CORS origin: {}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and tracing middleware
pub fn create_router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .route("/health", get(health_handler))
        .route("/api/quote", post(orders::quote_handler))
        .route(
            "/api/checkout",
            get(orders::checkout_info_handler).post(orders::create_checkout_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(config)),
        )
        .with_state(state)
}
