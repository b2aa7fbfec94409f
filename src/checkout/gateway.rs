use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::checkout::GatewayError;
use crate::orders::NormalizedOrder;
use crate::pricing::PriceQuote;

/// The one currency orders are charged in
pub const CURRENCY: &str = "usd";

/// Product name shown on the payment page
pub const PRODUCT_NAME: &str = "Custom Stickers";

/// Where the processor sends the buyer afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// Processor-agnostic checkout session request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutRequest {
    pub reference: Uuid,
    pub product_name: String,
    pub description: String,
    pub currency: String,
    /// Charged as a single line, so the buyer pays exactly the quoted total
    pub amount_cents: i64,
    pub metadata: BTreeMap<String, String>,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Build the request for a normalized order priced by the server
    pub fn new(
        reference: Uuid,
        order: &NormalizedOrder,
        quote: &PriceQuote,
        urls: &CheckoutUrls,
    ) -> Self {
        let description = format!(
            "{} stickers - {} x {} in",
            order.quantity, order.width_in, order.height_in
        );

        let metadata = BTreeMap::from([
            ("job_name".to_string(), order.job_name.clone()),
            ("width".to_string(), order.width_in.to_string()),
            ("height".to_string(), order.height_in.to_string()),
            ("quantity".to_string(), order.quantity.to_string()),
            ("upload_source".to_string(), order.upload_source.clone()),
            ("unit_cents".to_string(), quote.unit_cents.to_string()),
            ("total_cents".to_string(), quote.total_cents.to_string()),
            ("order_reference".to_string(), reference.to_string()),
        ]);

        Self {
            reference,
            product_name: PRODUCT_NAME.to_string(),
            description,
            currency: CURRENCY.to_string(),
            amount_cents: quote.total_cents,
            metadata,
            success_url: urls.success_url.clone(),
            cancel_url: urls.cancel_url.clone(),
        }
    }
}

/// Session minted by the processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Turns a priced order into a hosted payment page
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> NormalizedOrder {
        NormalizedOrder {
            width_in: 3.0,
            height_in: 2.5,
            quantity: 50,
            total_cents: 3000,
            unit_cents: None,
            job_name: "Farmers market".to_string(),
            upload_source: "File Request Pro".to_string(),
        }
    }

    fn urls() -> CheckoutUrls {
        CheckoutUrls {
            success_url: "https://shop.example.com/thanks".to_string(),
            cancel_url: "https://shop.example.com/cart".to_string(),
        }
    }

    #[test]
    fn test_request_charges_server_total() {
        let quote = crate::pricing::PriceCalculator::default().quote(3.0, 2.5, 50).unwrap();
        let reference = Uuid::new_v4();
        let request = CheckoutRequest::new(reference, &order(), &quote, &urls());

        assert_eq!(request.amount_cents, quote.total_cents);
        assert_eq!(request.currency, "usd");
        assert_eq!(request.product_name, "Custom Stickers");
        assert_eq!(request.description, "50 stickers - 3 x 2.5 in");
        assert_eq!(request.success_url, "https://shop.example.com/thanks");
        assert_eq!(request.cancel_url, "https://shop.example.com/cart");
    }

    #[test]
    fn test_request_metadata_echoes_order() {
        let quote = crate::pricing::PriceCalculator::default().quote(3.0, 2.5, 50).unwrap();
        let reference = Uuid::new_v4();
        let request = CheckoutRequest::new(reference, &order(), &quote, &urls());

        assert_eq!(request.metadata["job_name"], "Farmers market");
        assert_eq!(request.metadata["width"], "3");
        assert_eq!(request.metadata["height"], "2.5");
        assert_eq!(request.metadata["quantity"], "50");
        assert_eq!(request.metadata["upload_source"], "File Request Pro");
        assert_eq!(request.metadata["total_cents"], quote.total_cents.to_string());
        assert_eq!(request.metadata["unit_cents"], quote.unit_cents.to_string());
        assert_eq!(request.metadata["order_reference"], reference.to_string());
    }
}
