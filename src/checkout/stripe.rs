// Stripe Checkout gateway
//
// Creates hosted Checkout Sessions through the form-encoded REST API.

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::checkout::{CheckoutGateway, CheckoutRequest, CheckoutSession, GatewayError};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Stripe credentials and endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base.trim_end_matches('/'))
    }
}

impl fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"[redacted]")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

/// Stripe Checkout Session client
#[derive(Clone)]
pub struct StripeGateway {
    config: StripeConfig,
    client: reqwest::Client,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl CheckoutGateway for StripeGateway {
    #[instrument(skip(self, request), fields(reference = %request.reference, amount = request.amount_cents))]
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession, GatewayError> {
        let response = self
            .client
            .post(self.config.sessions_url())
            .basic_auth(&self.config.secret_key, Some(""))
            .form(&session_form(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Stripe rejected checkout session: {} {}", status, body);
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| GatewayError::MissingUrl(session.id.clone()))?;

        info!("Stripe checkout session created: {}", session.id);
        Ok(CheckoutSession { id: session.id, url })
    }
}

/// Form fields for `POST /v1/checkout/sessions`
pub fn session_form(request: &CheckoutRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("billing_address_collection".to_string(), "required".to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            request.currency.clone(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            request.product_name.clone(),
        ),
        (
            "line_items[0][price_data][product_data][description]".to_string(),
            request.description.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            request.amount_cents.to_string(),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("client_reference_id".to_string(), request.reference.to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    form.extend(
        request
            .metadata
            .iter()
            .map(|(key, value)| (format!("metadata[{}]", key), value.clone())),
    );

    form
}
