// Pricing Engine
//
// Area-based sticker pricing: tiered per-square-foot rates by quantity
// breakpoint, a size discount curve, and an order minimum. Pure, no I/O.

pub mod price_calculator;
pub mod rate_table;
pub mod size_curve;

pub use price_calculator::{
    cents_to_dollars, quote, PriceCalculator, PriceQuote, PricingError, DEFAULT_MINIMUM_TOTAL_CENTS,
    MAXIMUM_TOTAL_CENTS,
};
pub use rate_table::{RateTable, RateTableError};
pub use size_curve::SizeCurve;
