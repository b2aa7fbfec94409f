/// Area-based discount curve
///
/// Full price up to `full_price_area` square inches, then a linear ramp down
/// to `1.0 - max_discount` at `floor_area`, flat beyond that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeCurve {
    pub full_price_area: f64,
    pub floor_area: f64,
    pub max_discount: f64,
}

impl SizeCurve {
    pub const fn new(full_price_area: f64, floor_area: f64, max_discount: f64) -> Self {
        Self {
            full_price_area,
            floor_area,
            max_discount,
        }
    }

    /// Multiplier applied to the base unit price for a piece of `area_in2`
    pub fn multiplier(&self, area_in2: f64) -> f64 {
        let span = self.floor_area - self.full_price_area;
        if span <= 0.0 {
            return if area_in2 <= self.full_price_area {
                1.0
            } else {
                1.0 - self.max_discount
            };
        }

        let t = ((area_in2 - self.full_price_area) / span).clamp(0.0, 1.0);
        1.0 - self.max_discount * t
    }
}

impl Default for SizeCurve {
    /// 1.00 at 9 in², ramping to 0.80 at 16 in²
    fn default() -> Self {
        Self::new(9.0, 16.0, 0.20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_full_price_at_and_below_nine() {
        let curve = SizeCurve::default();
        assert_eq!(curve.multiplier(9.0), 1.0);
        assert_eq!(curve.multiplier(1.0), 1.0);
        assert_eq!(curve.multiplier(0.25), 1.0);
    }

    #[test]
    fn test_floor_at_and_above_sixteen() {
        let curve = SizeCurve::default();
        assert!(approx(curve.multiplier(16.0), 0.80));
        assert!(approx(curve.multiplier(144.0), 0.80));
    }

    #[test]
    fn test_midpoint() {
        let curve = SizeCurve::default();
        assert!(approx(curve.multiplier(12.5), 0.90));
    }

    #[test]
    fn test_ramp_is_monotonic() {
        let curve = SizeCurve::default();
        let mut previous = curve.multiplier(9.0);
        for step in 1..=70 {
            let area = 9.0 + step as f64 * 0.1;
            let current = curve.multiplier(area);
            assert!(current <= previous, "multiplier rose at area {}", area);
            previous = current;
        }
    }

    #[test]
    fn test_degenerate_span_is_a_step() {
        let curve = SizeCurve::new(10.0, 10.0, 0.5);
        assert_eq!(curve.multiplier(10.0), 1.0);
        assert_eq!(curve.multiplier(10.5), 0.5);
    }
}
