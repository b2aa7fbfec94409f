use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use utoipa::ToSchema;

use crate::pricing::{cents_to_dollars, PriceQuote};

/// Upload source recorded when the client does not name one
pub const DEFAULT_UPLOAD_SOURCE: &str = "File Request Pro";

/// Untyped order body as sent by any storefront version
///
/// Known shapes are flat dollars (`width`, `total`), flat cents
/// (`total_cents`, `unit_cents`) and nested `{order, pricing}`. Nothing
/// here is validated; see [`crate::orders::normalizer`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct RawOrderPayload {
    fields: Map<String, Value>,
}

impl RawOrderPayload {
    /// Parse a request body. An empty body is an empty payload.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from(value))
    }

    /// Object holding the given section's fields, if the payload has one
    pub(crate) fn section(&self, section: Section) -> Option<&Map<String, Value>> {
        match section {
            Section::Top => Some(&self.fields),
            Section::Pricing => self.fields.get("pricing").and_then(Value::as_object),
            // Flat payloads carry order fields at the top level.
            Section::Order => self
                .fields
                .get("order")
                .and_then(Value::as_object)
                .or(Some(&self.fields)),
        }
    }

    /// Value at `section.key`, or `None` when absent, null or blank
    pub(crate) fn lookup(&self, section: Section, key: &str) -> Option<&Value> {
        self.section(section)?.get(key).filter(|value| is_present(value))
    }
}

impl From<Value> for RawOrderPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Where in the payload a field is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
    Top,
    Pricing,
    Order,
}

/// Fields the normalizer can reject
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    Width,
    Height,
    Quantity,
    Total,
    UnitCents,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Width => "width",
            OrderField::Height => "height",
            OrderField::Quantity => "quantity",
            OrderField::Total => "total",
            OrderField::UnitCents => "unit_cents",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated dimensions and quantity, enough to price an order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderDimensions {
    pub width_in: f64,
    pub height_in: f64,
    pub quantity: u32,
}

/// Canonical order resolved from any payload shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedOrder {
    pub width_in: f64,
    pub height_in: f64,
    pub quantity: u32,
    /// Client-declared total, always in cents
    pub total_cents: i64,
    /// Client-declared unit price, when the payload carried one
    pub unit_cents: Option<i64>,
    pub job_name: String,
    pub upload_source: String,
}

/// Response DTO for a price preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    #[schema(example = 3.0)]
    pub width_in: f64,
    #[schema(example = 3.0)]
    pub height_in: f64,
    #[schema(example = 50)]
    pub quantity: u32,
    #[schema(example = 80)]
    pub unit_cents: i64,
    #[schema(example = 3984)]
    pub total_cents: i64,
    /// Unit price in dollars, e.g. "0.80"
    #[schema(example = "0.80")]
    pub unit_price: String,
    /// Total in dollars, e.g. "39.84"
    #[schema(example = "39.84")]
    pub total_price: String,
    #[schema(example = 12.75)]
    pub rate_per_sqft: f64,
    #[schema(example = 1.0)]
    pub size_multiplier: f64,
    pub minimum_applied: bool,
}

impl QuoteResponse {
    pub fn new(dimensions: OrderDimensions, quote: &PriceQuote) -> Self {
        Self {
            width_in: dimensions.width_in,
            height_in: dimensions.height_in,
            quantity: dimensions.quantity,
            unit_cents: quote.unit_cents,
            total_cents: quote.total_cents,
            unit_price: cents_to_dollars(quote.unit_cents).to_string(),
            total_price: cents_to_dollars(quote.total_cents).to_string(),
            rate_per_sqft: quote.rate_per_sqft,
            size_multiplier: quote.size_multiplier,
            minimum_applied: quote.minimum_applied,
        }
    }
}

/// Response DTO for a created checkout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    /// Payment page the browser should be redirected to
    #[schema(example = "https://checkout.stripe.com/c/pay/cs_test_123")]
    pub url: String,
    /// Order reference echoed to the payment processor
    #[schema(example = "9b2f3c1e-8a8f-4f5e-9d43-2b8f0f6f7a10")]
    pub reference: String,
    #[schema(example = 80)]
    pub unit_cents: i64,
    #[schema(example = 3984)]
    pub total_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_empty_payload() {
        assert_eq!(RawOrderPayload::from_slice(b"").unwrap(), RawOrderPayload::default());
        assert_eq!(RawOrderPayload::from_slice(b"  \n").unwrap(), RawOrderPayload::default());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(RawOrderPayload::from_slice(b"{width: 3").is_err());
    }

    #[test]
    fn test_non_object_body_has_no_fields() {
        let payload = RawOrderPayload::from(json!([1, 2, 3]));
        assert_eq!(payload, RawOrderPayload::default());
    }

    #[test]
    fn test_order_section_falls_back_to_top_level() {
        let flat = RawOrderPayload::from(json!({"width_in": 3}));
        assert_eq!(flat.lookup(Section::Order, "width_in"), Some(&json!(3)));

        let nested = RawOrderPayload::from(json!({"width_in": 3, "order": {"width_in": 4}}));
        assert_eq!(nested.lookup(Section::Order, "width_in"), Some(&json!(4)));
    }

    #[test]
    fn test_null_and_blank_values_are_absent() {
        let payload = RawOrderPayload::from(json!({"width": null, "height": "  ", "quantity": 0}));
        assert_eq!(payload.lookup(Section::Top, "width"), None);
        assert_eq!(payload.lookup(Section::Top, "height"), None);
        assert_eq!(payload.lookup(Section::Top, "quantity"), Some(&json!(0)));
    }

    #[test]
    fn test_pricing_section_must_be_object() {
        let payload = RawOrderPayload::from(json!({"pricing": "12x12"}));
        assert!(payload.section(Section::Pricing).is_none());
    }
}
