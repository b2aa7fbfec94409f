use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while building a rate table
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateTableError {
    #[error("Rate table must contain at least one breakpoint")]
    Empty,

    #[error("Breakpoint quantity must be positive")]
    ZeroBreakpoint,

    #[error("Rate for quantity {quantity} must be a positive number, got {rate}")]
    InvalidRate { quantity: u32, rate: f64 },

    #[error("Malformed rate table entry '{0}', expected 'quantity:rate'")]
    MalformedEntry(String),
}

/// Per-square-foot rates keyed by quantity breakpoint
///
/// Lookup is exact-match only. Quantities that are not a breakpoint are
/// charged at the smallest breakpoint's rate, never interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<u32, f64>,
}

impl RateTable {
    /// Build a rate table from `(quantity, dollars per sqft)` pairs
    pub fn new<I>(entries: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut rates = BTreeMap::new();
        for (quantity, rate) in entries {
            if quantity == 0 {
                return Err(RateTableError::ZeroBreakpoint);
            }
            if !rate.is_finite() || rate <= 0.0 {
                return Err(RateTableError::InvalidRate { quantity, rate });
            }
            rates.insert(quantity, rate);
        }

        if rates.is_empty() {
            return Err(RateTableError::Empty);
        }

        Ok(Self { rates })
    }

    /// Rate for the given quantity, falling back to the smallest breakpoint
    pub fn rate_for(&self, quantity: u32) -> f64 {
        match self.rates.get(&quantity) {
            Some(rate) => *rate,
            None => self.fallback_rate(),
        }
    }

    /// Whether the quantity is one of the configured breakpoints
    pub fn is_breakpoint(&self, quantity: u32) -> bool {
        self.rates.contains_key(&quantity)
    }

    pub fn breakpoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.rates.keys().copied()
    }

    fn fallback_rate(&self) -> f64 {
        // Construction guarantees at least one entry.
        self.rates.values().next().copied().unwrap_or_default()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            rates: BTreeMap::from([
                (50, 12.75),
                (100, 11.50),
                (250, 10.50),
                (500, 9.75),
                (1000, 9.00),
            ]),
        }
    }
}

/// Parses `"50:12.75,100:11.50"` style lists
impl FromStr for RateTable {
    type Err = RateTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = s
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (quantity, rate) = entry
                    .split_once(':')
                    .ok_or_else(|| RateTableError::MalformedEntry(entry.to_string()))?;
                let quantity = quantity
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| RateTableError::MalformedEntry(entry.to_string()))?;
                let rate = rate
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| RateTableError::MalformedEntry(entry.to_string()))?;
                Ok((quantity, rate))
            })
            .collect::<Result<Vec<_>, RateTableError>>()?;

        Self::new(entries)
    }
}

impl fmt::Display for RateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .rates
            .iter()
            .map(|(quantity, rate)| format!("{}:{:.2}", quantity, rate))
            .collect();
        write!(f, "{}", entries.join(","))
    }
}
