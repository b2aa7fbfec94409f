// Order Normalizer
//
// Resolves every known storefront payload shape into one NormalizedOrder.
// Each field has an ordered list of sources; the first present source wins,
// independently per field, so a client may mix shapes. Failures accumulate
// so callers get the complete list of bad fields in one error.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::orders::models::Section;
use crate::orders::{
    NormalizedOrder, OrderDimensions, OrderField, RawOrderPayload, ValidationError,
    DEFAULT_UPLOAD_SOURCE,
};

type Source = (Section, &'static str);

const WIDTH_SOURCES: &[Source] = &[
    (Section::Top, "width"),
    (Section::Pricing, "width_in"),
    (Section::Pricing, "width"),
    (Section::Order, "width_in"),
    (Section::Order, "width"),
];

const HEIGHT_SOURCES: &[Source] = &[
    (Section::Top, "height"),
    (Section::Pricing, "height_in"),
    (Section::Pricing, "height"),
    (Section::Order, "height_in"),
    (Section::Order, "height"),
];

const QUANTITY_SOURCES: &[Source] = &[
    (Section::Top, "quantity"),
    (Section::Pricing, "quantity"),
    (Section::Order, "quantity"),
];

/// Dollar-denominated totals. Consulted before any cents source.
const TOTAL_DOLLAR_SOURCES: &[Source] = &[
    (Section::Top, "total"),
    (Section::Pricing, "total"),
    (Section::Order, "total"),
];

const TOTAL_CENT_SOURCES: &[Source] = &[
    (Section::Top, "total_cents"),
    (Section::Pricing, "total_cents"),
    (Section::Order, "total_cents"),
];

const UNIT_CENT_SOURCES: &[Source] = &[
    (Section::Top, "unit_cents"),
    (Section::Pricing, "unit_cents"),
    (Section::Order, "unit_cents"),
];

const JOB_NAME_SOURCES: &[Source] = &[
    (Section::Top, "jobName"),
    (Section::Order, "project_name"),
    (Section::Order, "jobName"),
];

const UPLOAD_SOURCE_SOURCES: &[Source] = &[
    (Section::Top, "upload_source"),
    (Section::Order, "upload_source"),
];

/// Resolve a raw payload into a canonical order
///
/// # Errors
/// Returns every missing or invalid field at once; no required field is
/// ever defaulted.
pub fn normalize(raw: &RawOrderPayload) -> Result<NormalizedOrder, ValidationError> {
    let mut resolver = Resolver::new(raw);

    let width_in = resolver.dimension(WIDTH_SOURCES, OrderField::Width);
    let height_in = resolver.dimension(HEIGHT_SOURCES, OrderField::Height);
    let quantity = resolver.quantity();
    let total_cents = resolver.total_cents();
    let unit_cents = resolver.unit_cents();

    let job_name = resolve_text(raw, JOB_NAME_SOURCES).unwrap_or_default();
    let upload_source = resolve_text(raw, UPLOAD_SOURCE_SOURCES)
        .unwrap_or_else(|| DEFAULT_UPLOAD_SOURCE.to_string());

    let invalid = resolver.finish();

    match (width_in, height_in, quantity, total_cents) {
        (Some(width_in), Some(height_in), Some(quantity), Some(total_cents)) if invalid.is_empty() => {
            tracing::debug!(
                width_in,
                height_in,
                quantity,
                total_cents,
                "Normalized order payload"
            );
            Ok(NormalizedOrder {
                width_in,
                height_in,
                quantity,
                total_cents,
                unit_cents,
                job_name,
                upload_source,
            })
        }
        _ => Err(ValidationError::new(invalid)),
    }
}

/// Resolve only what pricing needs: width, height and quantity
pub fn resolve_dimensions(raw: &RawOrderPayload) -> Result<OrderDimensions, ValidationError> {
    let mut resolver = Resolver::new(raw);

    let width_in = resolver.dimension(WIDTH_SOURCES, OrderField::Width);
    let height_in = resolver.dimension(HEIGHT_SOURCES, OrderField::Height);
    let quantity = resolver.quantity();

    let invalid = resolver.finish();

    match (width_in, height_in, quantity) {
        (Some(width_in), Some(height_in), Some(quantity)) if invalid.is_empty() => Ok(OrderDimensions {
            width_in,
            height_in,
            quantity,
        }),
        _ => Err(ValidationError::new(invalid)),
    }
}

/// Field-by-field lookup that records every failure
struct Resolver<'a> {
    raw: &'a RawOrderPayload,
    invalid: BTreeSet<OrderField>,
}

impl<'a> Resolver<'a> {
    fn new(raw: &'a RawOrderPayload) -> Self {
        Self {
            raw,
            invalid: BTreeSet::new(),
        }
    }

    fn finish(self) -> BTreeSet<OrderField> {
        self.invalid
    }

    fn reject<T>(&mut self, field: OrderField) -> Option<T> {
        self.invalid.insert(field);
        None
    }

    /// A required, finite, positive number
    fn dimension(&mut self, sources: &[Source], field: OrderField) -> Option<f64> {
        match first_present(self.raw, sources).and_then(coerce_number) {
            Some(value) if value > 0.0 => Some(value),
            _ => self.reject(field),
        }
    }

    /// A required positive whole number
    fn quantity(&mut self) -> Option<u32> {
        match first_present(self.raw, QUANTITY_SOURCES).and_then(coerce_number) {
            Some(value) if value > 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) => {
                Some(value as u32)
            }
            _ => self.reject(OrderField::Quantity),
        }
    }

    /// Client total in cents. A dollars value, once present, is final.
    fn total_cents(&mut self) -> Option<i64> {
        let cents = if let Some(dollars) = first_present(self.raw, TOTAL_DOLLAR_SOURCES) {
            coerce_number(dollars).map(|dollars| dollars * 100.0)
        } else {
            first_present(self.raw, TOTAL_CENT_SOURCES).and_then(coerce_number)
        };

        match cents.and_then(positive_cents) {
            Some(cents) => Some(cents),
            None => self.reject(OrderField::Total),
        }
    }

    /// Optional client unit price; invalid only when present and unusable
    fn unit_cents(&mut self) -> Option<i64> {
        let value = first_present(self.raw, UNIT_CENT_SOURCES)?;
        match coerce_number(value).and_then(positive_cents) {
            Some(cents) => Some(cents),
            None => self.reject(OrderField::UnitCents),
        }
    }
}

fn first_present<'a>(raw: &'a RawOrderPayload, sources: &[Source]) -> Option<&'a Value> {
    sources
        .iter()
        .find_map(|(section, key)| raw.lookup(*section, key))
}

/// Numbers and numeric strings, finite only
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn positive_cents(cents: f64) -> Option<i64> {
    let rounded = cents.round();
    (rounded >= 1.0 && rounded <= i64::MAX as f64).then_some(rounded as i64)
}

fn resolve_text(raw: &RawOrderPayload, sources: &[Source]) -> Option<String> {
    sources.iter().find_map(|(section, key)| match raw.lookup(*section, key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
