use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Usage};
use crate::{RentBillingError, RentBillingResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One contiguous usage band of a progressive price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredRate {
    pub min_usage: Usage,
    /// Inclusive upper bound; `None` means unbounded.
    #[serde(default)]
    pub max_usage: Option<Usage>,
    pub price_per_unit: Money,
}

impl TieredRate {
    pub fn is_unbounded(&self) -> bool {
        self.max_usage.is_none()
    }

    pub fn label(&self, position: usize) -> String {
        match self.max_usage {
            Some(max) => format!("Tier {} ({}-{})", position + 1, self.min_usage, max),
            None => format!("Tier {} ({}+)", position + 1, self.min_usage),
        }
    }
}

/// A tier list that passed [`validate_tiered_rates`]: sorted ascending,
/// contiguous, non-empty, and closed by a single unbounded tier.
///
/// Deserialising runs the validator, so a `ValidatedTiers` value can never
/// hold an invalid table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TieredRate>", into = "Vec<TieredRate>")]
pub struct ValidatedTiers(Vec<TieredRate>);

impl ValidatedTiers {
    pub fn as_slice(&self) -> &[TieredRate] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TieredRate> {
        self.0.iter()
    }
}

impl TryFrom<Vec<TieredRate>> for ValidatedTiers {
    type Error = RentBillingError;

    fn try_from(tiers: Vec<TieredRate>) -> Result<Self, Self::Error> {
        validate_tiered_rates(tiers)
    }
}

impl From<ValidatedTiers> for Vec<TieredRate> {
    fn from(tiers: ValidatedTiers) -> Self {
        tiers.0
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Sort and validate a tier list. Runs when rate settings are written; the
/// electricity calculator trusts the result without checking again.
pub fn validate_tiered_rates(mut tiers: Vec<TieredRate>) -> RentBillingResult<ValidatedTiers> {
    if tiers.is_empty() {
        return Err(invalid("at least one tier required"));
    }

    tiers.sort_by_key(|t| t.min_usage);

    for (i, tier) in tiers.iter().enumerate() {
        if tier.min_usage < 0 {
            return Err(invalid(format!(
                "tier {} has negative min_usage {}",
                i + 1,
                tier.min_usage
            )));
        }
        if tier.price_per_unit < Decimal::ZERO {
            return Err(invalid(format!(
                "tier {} has negative price_per_unit {}",
                i + 1,
                tier.price_per_unit
            )));
        }
        if let Some(max) = tier.max_usage {
            if max <= tier.min_usage {
                return Err(invalid(format!(
                    "tier {} max_usage {} must be greater than min_usage {}",
                    i + 1,
                    max,
                    tier.min_usage
                )));
            }
        }
    }

    for (i, pair) in tiers.windows(2).enumerate() {
        let contiguous = match pair[0].max_usage {
            Some(max) => max.checked_add(1) == Some(pair[1].min_usage),
            None => false,
        };
        if !contiguous {
            return Err(invalid(format!(
                "gap or overlap between tier {} and tier {}",
                i + 1,
                i + 2
            )));
        }
    }

    if tiers.last().is_some_and(|t| !t.is_unbounded()) {
        return Err(invalid("last tier must be unbounded"));
    }

    Ok(ValidatedTiers(tiers))
}

fn invalid(reason: impl Into<String>) -> RentBillingError {
    RentBillingError::InvalidTierConfiguration(reason.into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tier(min: Usage, max: Option<Usage>, price: Money) -> TieredRate {
        TieredRate {
            min_usage: min,
            max_usage: max,
            price_per_unit: price,
        }
    }

    fn reason(err: RentBillingError) -> String {
        match err {
            RentBillingError::InvalidTierConfiguration(r) => r,
            other => panic!("Expected InvalidTierConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_unsorted_list_is_sorted() {
        let tiers = validate_tiered_rates(vec![
            tier(101, None, dec!(2500)),
            tier(0, Some(50), dec!(1500)),
            tier(51, Some(100), dec!(2000)),
        ])
        .unwrap();
        let mins: Vec<Usage> = tiers.iter().map(|t| t.min_usage).collect();
        assert_eq!(mins, vec![0, 51, 101]);
    }

    #[test]
    fn test_single_unbounded_tier_valid() {
        assert!(validate_tiered_rates(vec![tier(0, None, dec!(3000))]).is_ok());
    }

    #[test]
    fn test_empty_rejected() {
        let r = reason(validate_tiered_rates(vec![]).unwrap_err());
        assert!(r.contains("at least one tier"));
    }

    #[test]
    fn test_gap_rejected() {
        let r = reason(
            validate_tiered_rates(vec![
                tier(0, Some(50), dec!(1500)),
                tier(52, Some(100), dec!(2000)),
                tier(101, None, dec!(2500)),
            ])
            .unwrap_err(),
        );
        assert!(r.contains("gap or overlap"));
    }

    #[test]
    fn test_overlap_rejected() {
        let r = reason(
            validate_tiered_rates(vec![
                tier(0, Some(50), dec!(1500)),
                tier(50, None, dec!(2000)),
            ])
            .unwrap_err(),
        );
        assert!(r.contains("gap or overlap"));
    }

    #[test]
    fn test_bounded_last_tier_rejected() {
        let r = reason(
            validate_tiered_rates(vec![
                tier(0, Some(50), dec!(1500)),
                tier(51, Some(100), dec!(2000)),
            ])
            .unwrap_err(),
        );
        assert!(r.contains("last tier must be unbounded"));
    }

    #[test]
    fn test_unbounded_middle_tier_rejected() {
        let r = reason(
            validate_tiered_rates(vec![tier(0, None, dec!(1500)), tier(51, None, dec!(2000))])
                .unwrap_err(),
        );
        assert!(r.contains("gap or overlap"));
    }

    #[test]
    fn test_max_not_above_min_rejected() {
        let r = reason(
            validate_tiered_rates(vec![tier(10, Some(10), dec!(1500)), tier(11, None, dec!(2000))])
                .unwrap_err(),
        );
        assert!(r.contains("must be greater than"));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(validate_tiered_rates(vec![tier(0, None, dec!(-1))]).is_err());
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let bad = r#"[{"min_usage": 0, "max_usage": 50, "price_per_unit": "1500"}]"#;
        assert!(serde_json::from_str::<ValidatedTiers>(bad).is_err());

        let good = r#"[{"min_usage": 0, "max_usage": null, "price_per_unit": "1500"}]"#;
        let tiers: ValidatedTiers = serde_json::from_str(good).unwrap();
        assert_eq!(tiers.as_slice().len(), 1);
    }

    #[test]
    fn test_labels() {
        assert_eq!(tier(0, Some(50), dec!(1)).label(0), "Tier 1 (0-50)");
        assert_eq!(tier(101, None, dec!(1)).label(2), "Tier 3 (101+)");
    }

    #[test]
    fn test_tier_bounded_at_usage_max_is_overlap_not_panic() {
        let r = reason(
            validate_tiered_rates(vec![
                tier(0, Some(Usage::MAX), dec!(1500)),
                tier(5, None, dec!(2000)),
            ])
            .unwrap_err(),
        );
        assert!(r.contains("gap or overlap between tier 1 and tier 2"));
    }
}
