use std::collections::BTreeSet;

use crate::checkout::GatewayError;
use crate::orders::OrderField;
use crate::pricing::PricingError;

/// Every missing or invalid field found in one payload
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing or invalid field(s): {}", join_field_names(.fields))]
pub struct ValidationError {
    fields: BTreeSet<OrderField>,
}

impl ValidationError {
    pub fn new(fields: BTreeSet<OrderField>) -> Self {
        Self { fields }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(OrderField::as_str).collect()
    }
}

fn join_field_names(fields: &BTreeSet<OrderField>) -> String {
    fields
        .iter()
        .map(OrderField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error types for quote and checkout operations
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Client {field} of {client_cents} cents does not match quoted {quoted_cents} cents")]
    PriceMismatch {
        field: OrderField,
        client_cents: i64,
        quoted_cents: i64,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Checkout gateway error: {0}")]
    Upstream(#[from] GatewayError),
}
