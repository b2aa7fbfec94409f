use std::sync::Arc;
use uuid::Uuid;

use crate::checkout::{CheckoutGateway, CheckoutRequest, CheckoutUrls};
use crate::orders::{
    normalize, resolve_dimensions, CheckoutResponse, NormalizedOrder, OrderError, OrderField,
    QuoteResponse, RawOrderPayload,
};
use crate::pricing::{PriceCalculator, PriceQuote};

/// Service for quote and checkout business logic
#[derive(Clone)]
pub struct OrderService {
    calculator: Arc<PriceCalculator>,
    gateway: Option<Arc<dyn CheckoutGateway>>,
    urls: Arc<CheckoutUrls>,
    price_tolerance_cents: i64,
}

impl OrderService {
    /// Create a new OrderService
    ///
    /// `gateway` is `None` when payment credentials are not configured; quotes
    /// still work but every checkout fails with a configuration error.
    pub fn new(
        calculator: PriceCalculator,
        gateway: Option<Arc<dyn CheckoutGateway>>,
        urls: CheckoutUrls,
        price_tolerance_cents: i64,
    ) -> Self {
        Self {
            calculator: Arc::new(calculator),
            gateway,
            urls: Arc::new(urls),
            price_tolerance_cents,
        }
    }

    /// Price preview for any payload shape. Client totals are ignored.
    pub fn quote(&self, raw: &RawOrderPayload) -> Result<QuoteResponse, OrderError> {
        let dimensions = resolve_dimensions(raw)?;
        let quote = self
            .calculator
            .quote(dimensions.width_in, dimensions.height_in, dimensions.quantity)?;

        tracing::debug!(
            "Quoted {} x {} in x {}: {} cents",
            dimensions.width_in,
            dimensions.height_in,
            dimensions.quantity,
            quote.total_cents
        );

        Ok(QuoteResponse::new(dimensions, &quote))
    }

    /// Create a checkout session
    ///
    /// # Validation
    /// - Payment credentials must be configured
    /// - The payload must normalize into a complete order
    /// - The client's total (and unit price, when sent) must match the
    ///   server quote within the configured tolerance
    /// - The processor is charged the server-computed total
    pub async fn create_checkout(&self, raw: &RawOrderPayload) -> Result<CheckoutResponse, OrderError> {
        let gateway = self.gateway.as_ref().ok_or_else(|| {
            OrderError::Configuration("STRIPE_SECRET_KEY is not set".to_string())
        })?;

        let order = normalize(raw)?;
        let quote = self
            .calculator
            .quote(order.width_in, order.height_in, order.quantity)?;

        reconcile(&order, &quote, self.price_tolerance_cents)?;

        let reference = Uuid::new_v4();
        let request = CheckoutRequest::new(reference, &order, &quote, &self.urls);
        let session = gateway.create_session(&request).await?;

        tracing::info!(
            "Checkout session {} created for order {} ({} cents)",
            session.id,
            reference,
            quote.total_cents
        );

        Ok(CheckoutResponse {
            url: session.url,
            reference: reference.to_string(),
            unit_cents: quote.unit_cents,
            total_cents: quote.total_cents,
        })
    }
}

/// Reject client prices that disagree with the server quote
pub fn reconcile(order: &NormalizedOrder, quote: &PriceQuote, tolerance_cents: i64) -> Result<(), OrderError> {
    if (order.total_cents - quote.total_cents).abs() > tolerance_cents {
        tracing::warn!(
            "Client total {} does not match quote {}",
            order.total_cents,
            quote.total_cents
        );
        return Err(OrderError::PriceMismatch {
            field: OrderField::Total,
            client_cents: order.total_cents,
            quoted_cents: quote.total_cents,
        });
    }

    if let Some(unit_cents) = order.unit_cents {
        if (unit_cents - quote.unit_cents).abs() > tolerance_cents {
            tracing::warn!(
                "Client unit price {} does not match quote {}",
                unit_cents,
                quote.unit_cents
            );
            return Err(OrderError::PriceMismatch {
                field: OrderField::UnitCents,
                client_cents: unit_cents,
                quoted_cents: quote.unit_cents,
            });
        }
    }

    Ok(())
}
