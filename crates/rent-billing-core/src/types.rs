use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{RentBillingError, RentBillingResult};

/// All monetary values (VND). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Meter units (kWh for electricity, m³ for water).
pub type Usage = i64;

/// A calendar month a bill is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub year: i32,
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> RentBillingResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(RentBillingError::InvalidInput {
                field: "month".into(),
                reason: format!("Month must be between 1 and 12, got {month}."),
            });
        }
        Ok(Self { year, month })
    }

    /// Single integer key: `year * 12 + (month - 1)`. Consecutive calendar
    /// months differ by exactly one.
    pub fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    pub fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn previous(&self) -> Self {
        Self::from_index(self.index() - 1)
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation. Carries no wall-clock data so that the
/// same input always produces the same envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Error for an amount that left the representable decimal range.
pub fn amount_overflow(field: &str) -> RentBillingError {
    RentBillingError::InvalidInput {
        field: field.into(),
        reason: format!("{field} overflows the supported decimal range."),
    }
}

/// Sum amounts, failing instead of overflowing.
pub fn checked_sum(
    field: &str,
    amounts: impl IntoIterator<Item = Money>,
) -> RentBillingResult<Money> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or_else(|| amount_overflow(field))
    })
}

/// `units * price`, failing instead of overflowing.
pub fn checked_charge(field: &str, units: Usage, price: Money) -> RentBillingResult<Money> {
    Decimal::from(units)
        .checked_mul(price)
        .ok_or_else(|| amount_overflow(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_sum_reports_overflow_field() {
        assert_eq!(
            checked_sum("fees", [Decimal::ONE, Decimal::TWO]).unwrap(),
            Decimal::from(3)
        );
        match checked_sum("fees", [Decimal::MAX, Decimal::MAX]).unwrap_err() {
            RentBillingError::InvalidInput { field, .. } => assert_eq!(field, "fees"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_checked_charge_overflow() {
        assert!(checked_charge("electricity", 10, Decimal::MAX).is_err());
        assert_eq!(
            checked_charge("electricity", 10, Decimal::TWO).unwrap(),
            Decimal::from(20)
        );
    }

    #[test]
    fn test_period_index_is_contiguous_across_years() {
        let dec = BillingPeriod::new(2023, 12).unwrap();
        let jan = BillingPeriod::new(2024, 1).unwrap();
        assert_eq!(jan.index() - dec.index(), 1);
        assert_eq!(jan.previous(), dec);
    }

    #[test]
    fn test_period_round_trips_through_index() {
        let p = BillingPeriod::new(2024, 7).unwrap();
        assert_eq!(BillingPeriod::from_index(p.index()), p);
    }

    #[test]
    fn test_invalid_month_rejected() {
        for month in [0, 13] {
            match BillingPeriod::new(2024, month).unwrap_err() {
                RentBillingError::InvalidInput { field, .. } => assert_eq!(field, "month"),
                other => panic!("Expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_display_zero_pads_month() {
        assert_eq!(BillingPeriod::new(2024, 3).unwrap().to_string(), "03/2024");
    }
}
