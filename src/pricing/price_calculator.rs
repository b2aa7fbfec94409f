use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::pricing::{RateTable, SizeCurve};

/// Square inches per square foot
const SQ_IN_PER_SQ_FT: f64 = 144.0;

/// Default order floor: $30.00
pub const DEFAULT_MINIMUM_TOTAL_CENTS: i64 = 3000;

/// Largest single charge the payment processor accepts: $999,999.99
pub const MAXIMUM_TOTAL_CENTS: i64 = 99_999_999;

/// Orders the engine refuses to price
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Order total exceeds the maximum of {maximum_cents} cents")]
    TotalTooLarge { maximum_cents: i64 },
}

/// Computed price for one order line
///
/// Always derived server-side from dimensions and quantity. `unit_cents` is
/// recomputed from the enforced total so `unit_cents * quantity` reconciles
/// with `total_cents` up to rounding.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PriceQuote {
    #[schema(example = 80)]
    pub unit_cents: i64,
    #[schema(example = 3984)]
    pub total_cents: i64,
    #[schema(example = 9.0)]
    pub area_in2: f64,
    #[schema(example = 0.0625)]
    pub sqft_each: f64,
    #[schema(example = 12.75)]
    pub rate_per_sqft: f64,
    #[schema(example = 1.0)]
    pub size_multiplier: f64,
    /// Total before the order minimum was enforced
    #[schema(example = 3984)]
    pub raw_total_cents: i64,
    /// True when the order minimum replaced the computed total
    pub minimum_applied: bool,
}

impl PriceQuote {
    pub fn unit_dollars(&self) -> Decimal {
        cents_to_dollars(self.unit_cents)
    }

    pub fn total_dollars(&self) -> Decimal {
        cents_to_dollars(self.total_cents)
    }
}

/// Exact dollar amount for an integer number of cents
pub fn cents_to_dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Quote with the default size curve
///
/// Callers must pass finite, positive dimensions and a non-zero quantity;
/// the order normalizer guarantees this for request data.
pub fn quote(
    width_in: f64,
    height_in: f64,
    quantity: u32,
    rate_table: &RateTable,
    minimum_total_cents: i64,
) -> Result<PriceQuote, PricingError> {
    PriceCalculator::new(rate_table.clone(), minimum_total_cents).quote(width_in, height_in, quantity)
}

/// Pricing policy: tiered per-sqft rates, size discount and order minimum
#[derive(Debug, Clone)]
pub struct PriceCalculator {
    rate_table: RateTable,
    size_curve: SizeCurve,
    minimum_total_cents: i64,
}

impl PriceCalculator {
    pub fn new(rate_table: RateTable, minimum_total_cents: i64) -> Self {
        Self {
            rate_table,
            size_curve: SizeCurve::default(),
            minimum_total_cents,
        }
    }

    pub fn with_size_curve(mut self, size_curve: SizeCurve) -> Self {
        self.size_curve = size_curve;
        self
    }

    /// Calculate unit and total price for `quantity` pieces of `width_in` x `height_in`
    ///
    /// # Errors
    /// `TotalTooLarge` when the total is not finite or above `MAXIMUM_TOTAL_CENTS`.
    pub fn quote(&self, width_in: f64, height_in: f64, quantity: u32) -> Result<PriceQuote, PricingError> {
        let area_in2 = width_in * height_in;
        let sqft_each = area_in2 / SQ_IN_PER_SQ_FT;

        let rate_per_sqft = self.rate_table.rate_for(quantity);
        let base_unit_dollars = sqft_each * rate_per_sqft;

        let size_multiplier = self.size_curve.multiplier(area_in2);
        let unit_dollars = base_unit_dollars * size_multiplier;

        let total_dollars = unit_dollars * f64::from(quantity);
        let raw_total = (total_dollars * 100.0).round();
        if !raw_total.is_finite() || raw_total > MAXIMUM_TOTAL_CENTS as f64 {
            return Err(PricingError::TotalTooLarge {
                maximum_cents: MAXIMUM_TOTAL_CENTS,
            });
        }
        let raw_total_cents = raw_total as i64;

        let total_cents = raw_total_cents.max(self.minimum_total_cents);
        if total_cents > MAXIMUM_TOTAL_CENTS {
            return Err(PricingError::TotalTooLarge {
                maximum_cents: MAXIMUM_TOTAL_CENTS,
            });
        }
        let unit_cents = if quantity == 0 {
            total_cents.max(1)
        } else {
            ((total_cents as f64 / f64::from(quantity)).round() as i64).max(1)
        };

        Ok(PriceQuote {
            unit_cents,
            total_cents,
            area_in2,
            sqft_each,
            rate_per_sqft,
            size_multiplier,
            raw_total_cents,
            minimum_applied: raw_total_cents < self.minimum_total_cents,
        })
    }
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self::new(RateTable::default(), DEFAULT_MINIMUM_TOTAL_CENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_three_inch_square_fifty_pieces() {
        let quote = PriceCalculator::default().quote(3.0, 3.0, 50).unwrap();

        assert_eq!(quote.area_in2, 9.0);
        assert_eq!(quote.sqft_each, 0.0625);
        assert_eq!(quote.rate_per_sqft, 12.75);
        assert_eq!(quote.size_multiplier, 1.0);
        // 0.796875 * 50 * 100 = 3984.375
        assert_eq!(quote.raw_total_cents, 3984);
        assert_eq!(quote.total_cents, 3984);
        assert!(!quote.minimum_applied);
        // 3984 / 50 = 79.68
        assert_eq!(quote.unit_cents, 80);
        assert_eq!(quote.total_dollars(), dec!(39.84));
        assert_eq!(quote.unit_dollars(), dec!(0.80));
    }

    #[test]
    fn test_minimum_total_engages() {
        let quote = PriceCalculator::default().quote(2.0, 2.0, 50).unwrap();

        // 4 in² -> 0.3541666 per piece -> 17.71 for 50
        assert_eq!(quote.raw_total_cents, 1771);
        assert!(quote.minimum_applied);
        assert_eq!(quote.total_cents, 3000);
        assert_eq!(quote.unit_cents, 60);
    }

    #[test]
    fn test_size_discount_applies_to_large_pieces() {
        let quote = PriceCalculator::default().quote(12.0, 12.0, 100).unwrap();

        // 1 sqft at $11.50 with 0.80 multiplier = $9.20 each
        assert_eq!(quote.sqft_each, 1.0);
        assert!((quote.size_multiplier - 0.80).abs() < 1e-12);
        assert_eq!(quote.total_cents, 92000);
        assert_eq!(quote.unit_cents, 920);
    }

    #[test]
    fn test_off_breakpoint_quantity_uses_smallest_tier() {
        let calculator = PriceCalculator::default();
        let quote = calculator.quote(3.0, 3.0, 77).unwrap();

        assert_eq!(quote.rate_per_sqft, 12.75);
        // 0.796875 * 77 * 100 = 6135.9375
        assert_eq!(quote.total_cents, 6136);
        assert_eq!(quote.unit_cents, 80);
    }

    #[test]
    fn test_unit_never_below_one_cent() {
        let calculator = PriceCalculator::new(RateTable::default(), 0);
        let quote = calculator.quote(0.1, 0.1, 50).unwrap();

        // 4.43 cents for the whole order rounds to 4, under a cent each
        assert_eq!(quote.total_cents, 4);
        assert_eq!(quote.unit_cents, 1);
    }

    #[test]
    fn test_free_function_matches_calculator() {
        let table = RateTable::default();
        let via_fn = quote(4.0, 2.5, 250, &table, 3000).unwrap();
        let via_calc = PriceCalculator::new(table, 3000).quote(4.0, 2.5, 250).unwrap();
        assert_eq!(via_fn, via_calc);
    }

    #[test]
    fn test_custom_size_curve() {
        let calculator = PriceCalculator::new(RateTable::default(), 0)
            .with_size_curve(SizeCurve::new(0.0, 1.0, 0.5));
        let quote = calculator.quote(12.0, 12.0, 50).unwrap();

        assert_eq!(quote.size_multiplier, 0.5);
        // 1 sqft * 12.75 * 0.5 * 50
        assert_eq!(quote.total_cents, 31875);
    }

    #[test]
    fn test_overflowing_area_is_refused() {
        let err = PriceCalculator::default().quote(1e200, 1e200, 50).unwrap_err();
        assert_eq!(
            err,
            PricingError::TotalTooLarge {
                maximum_cents: MAXIMUM_TOTAL_CENTS
            }
        );
    }

    #[test]
    fn test_total_above_processor_ceiling_is_refused() {
        // 100 sqft each at $12.75 * 0.8 over a million pieces
        let calculator = PriceCalculator::default();
        assert!(calculator.quote(120.0, 120.0, 1_000_000).is_err());

        // $999,999.99 is the largest total that still prices
        let ceiling = PriceCalculator::new(RateTable::default(), MAXIMUM_TOTAL_CENTS);
        assert_eq!(ceiling.quote(3.0, 3.0, 50).unwrap().total_cents, MAXIMUM_TOTAL_CENTS);
        let above = PriceCalculator::new(RateTable::default(), MAXIMUM_TOTAL_CENTS + 1);
        assert!(above.quote(3.0, 3.0, 50).is_err());
    }

    #[test]
    fn test_cents_to_dollars() {
        assert_eq!(cents_to_dollars(3000), dec!(30.00));
        assert_eq!(cents_to_dollars(1), dec!(0.01));
        assert_eq!(cents_to_dollars(3000).to_string(), "30.00");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn breakpoint() -> impl Strategy<Value = u32> {
        prop::sample::select(vec![50u32, 100, 250, 500, 1000])
    }

    /// Total equals the closed-form price or the minimum, whichever is larger
    #[test]
    fn prop_total_matches_closed_form() {
        proptest!(|(
            width in 0.25f64..48.0,
            height in 0.25f64..48.0,
            quantity in breakpoint()
        )| {
            let table = RateTable::default();
            let quote = quote(width, height, quantity, &table, DEFAULT_MINIMUM_TOTAL_CENTS).unwrap();

            let area = width * height;
            let unit = area / 144.0 * table.rate_for(quantity) * SizeCurve::default().multiplier(area);
            let expected = ((unit * f64::from(quantity) * 100.0).round() as i64)
                .max(DEFAULT_MINIMUM_TOTAL_CENTS);

            prop_assert_eq!(quote.total_cents, expected);
        });
    }

    /// Unit price is at least a cent and reconciles with the total
    #[test]
    fn prop_unit_reconciles_with_total() {
        proptest!(|(
            width in 0.1f64..60.0,
            height in 0.1f64..60.0,
            quantity in 1u32..=2000,
            minimum in 0i64..=10_000
        )| {
            let calculator = PriceCalculator::new(RateTable::default(), minimum);
            let quote = calculator.quote(width, height, quantity).unwrap();

            prop_assert!(quote.unit_cents >= 1);
            prop_assert!(quote.total_cents >= minimum);

            let drift = (quote.unit_cents * i64::from(quantity) - quote.total_cents).abs();
            prop_assert!(
                quote.unit_cents == 1 || drift * 2 <= i64::from(quantity),
                "unit {} x {} drifted {} from total {}",
                quote.unit_cents, quantity, drift, quote.total_cents
            );
        });
    }

    /// Same inputs always produce the same quote
    #[test]
    fn prop_quote_is_deterministic() {
        proptest!(|(
            width in 0.1f64..60.0,
            height in 0.1f64..60.0,
            quantity in 1u32..=2000
        )| {
            let calculator = PriceCalculator::default();
            prop_assert_eq!(calculator.quote(width, height, quantity), calculator.quote(width, height, quantity));
        });
    }
}
