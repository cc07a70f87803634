use rust_decimal::Decimal;

use super::rates::{ElectricityPricing, UtilityRateConfig};
use super::tiers::ValidatedTiers;
use super::{ChargeLine, UtilityCharge};
use crate::types::{amount_overflow, checked_charge, Money, Usage};
use crate::{RentBillingError, RentBillingResult};

/// Price electricity usage under the configured method.
///
/// Tiered pricing is progressive: each band charges only the units that
/// fall inside it. Band capacity is `max_usage - min_usage`, so with
/// `[0-50] [51-100] [101+]` the first band absorbs 50 units and the second
/// 49.
pub fn calculate_electricity_cost(
    usage: Usage,
    config: &UtilityRateConfig,
) -> RentBillingResult<UtilityCharge> {
    if usage < 0 {
        return Err(RentBillingError::InvalidUsage(usage));
    }

    match &config.electricity {
        ElectricityPricing::Tiered { tiers } => tiered_cost(usage, tiers),
        ElectricityPricing::Flat { price } => {
            let price = price.ok_or_else(|| {
                RentBillingError::MissingRateConfiguration(
                    "electricity flat price is not set".into(),
                )
            })?;
            flat_cost(usage, price)
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

struct TierWalk {
    remaining: Usage,
    cost: Money,
    lines: Vec<ChargeLine>,
}

fn tiered_cost(usage: Usage, tiers: &ValidatedTiers) -> RentBillingResult<UtilityCharge> {
    let start = TierWalk {
        remaining: usage,
        cost: Decimal::ZERO,
        lines: Vec::new(),
    };

    let walk = tiers
        .iter()
        .enumerate()
        .try_fold(start, |mut acc, (position, tier)| {
            if acc.remaining == 0 {
                return Ok(acc);
            }
            let tier_capacity = match tier.max_usage {
                Some(max) => max - tier.min_usage,
                None => acc.remaining,
            };
            let tier_usage = acc.remaining.min(tier_capacity);
            let subtotal = checked_charge("electricity_cost", tier_usage, tier.price_per_unit)?;

            acc.lines.push(ChargeLine {
                label: tier.label(position),
                usage: tier_usage,
                unit_price: tier.price_per_unit,
                subtotal,
            });
            acc.cost = acc
                .cost
                .checked_add(subtotal)
                .ok_or_else(|| amount_overflow("electricity_cost"))?;
            acc.remaining -= tier_usage;
            Ok::<_, RentBillingError>(acc)
        })?;

    Ok(UtilityCharge {
        cost: walk.cost,
        breakdown: walk.lines,
    })
}

fn flat_cost(usage: Usage, price: Money) -> RentBillingResult<UtilityCharge> {
    let cost = checked_charge("electricity_cost", usage, price)?;
    Ok(UtilityCharge {
        cost,
        breakdown: vec![ChargeLine {
            label: "Flat rate".into(),
            usage,
            unit_price: price,
            subtotal: cost,
        }],
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::rates::WaterPricing;
    use crate::billing::tiers::{validate_tiered_rates, TieredRate};
    use rust_decimal_macros::dec;

    fn tiered_config() -> UtilityRateConfig {
        let tiers = validate_tiered_rates(vec![
            TieredRate {
                min_usage: 0,
                max_usage: Some(50),
                price_per_unit: dec!(1500),
            },
            TieredRate {
                min_usage: 51,
                max_usage: Some(100),
                price_per_unit: dec!(2000),
            },
            TieredRate {
                min_usage: 101,
                max_usage: None,
                price_per_unit: dec!(2500),
            },
        ])
        .unwrap();
        UtilityRateConfig {
            electricity: ElectricityPricing::Tiered { tiers },
            water: WaterPricing::Meter { price: None },
        }
    }

    fn flat_config(price: Option<Money>) -> UtilityRateConfig {
        UtilityRateConfig {
            electricity: ElectricityPricing::Flat { price },
            water: WaterPricing::Meter { price: None },
        }
    }

    #[test]
    fn test_tiered_100_units() {
        // 50 * 1500 + 49 * 2000 + 1 * 2500
        let charge = calculate_electricity_cost(100, &tiered_config()).unwrap();
        assert_eq!(charge.cost, dec!(175_500));
        assert_eq!(charge.breakdown.len(), 3);
        assert_eq!(charge.breakdown[1].usage, 49);
        assert_eq!(charge.breakdown[2].usage, 1);
    }

    #[test]
    fn test_tiered_120_units() {
        // 75_000 + 98_000 + 21 * 2500
        let charge = calculate_electricity_cost(120, &tiered_config()).unwrap();
        assert_eq!(charge.cost, dec!(225_500));
    }

    #[test]
    fn test_tiered_within_first_band() {
        let charge = calculate_electricity_cost(30, &tiered_config()).unwrap();
        assert_eq!(charge.cost, dec!(45_000));
        assert_eq!(charge.breakdown.len(), 1);
        assert_eq!(charge.breakdown[0].label, "Tier 1 (0-50)");
    }

    #[test]
    fn test_tiered_zero_usage() {
        let charge = calculate_electricity_cost(0, &tiered_config()).unwrap();
        assert_eq!(charge.cost, Decimal::ZERO);
        assert!(charge.breakdown.is_empty());
    }

    #[test]
    fn test_breakdown_sums_to_cost() {
        let charge = calculate_electricity_cost(437, &tiered_config()).unwrap();
        let sum: Money = charge.breakdown.iter().map(|l| l.subtotal).sum();
        let units: Usage = charge.breakdown.iter().map(|l| l.usage).sum();
        assert_eq!(sum, charge.cost);
        assert_eq!(units, 437);
    }

    #[test]
    fn test_tiered_cost_monotonic() {
        let cfg = tiered_config();
        let mut previous = Decimal::ZERO;
        for usage in 0..=300 {
            let cost = calculate_electricity_cost(usage, &cfg).unwrap().cost;
            assert!(cost >= previous, "cost decreased at usage {usage}");
            previous = cost;
        }
    }

    #[test]
    fn test_flat_rate() {
        let charge = calculate_electricity_cost(120, &flat_config(Some(dec!(3500)))).unwrap();
        assert_eq!(charge.cost, dec!(420_000));
        assert_eq!(charge.breakdown.len(), 1);
    }

    #[test]
    fn test_flat_rate_missing_price() {
        assert!(matches!(
            calculate_electricity_cost(10, &flat_config(None)),
            Err(RentBillingError::MissingRateConfiguration(_))
        ));
    }

    #[test]
    fn test_negative_usage_rejected() {
        assert_eq!(
            calculate_electricity_cost(-5, &flat_config(Some(dec!(1)))).unwrap_err(),
            RentBillingError::InvalidUsage(-5)
        );
    }

    #[test]
    fn test_flat_price_overflow_is_an_error() {
        let err = calculate_electricity_cost(10, &flat_config(Some(Decimal::MAX))).unwrap_err();
        match err {
            RentBillingError::InvalidInput { field, .. } => assert_eq!(field, "electricity_cost"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_tier_price_overflow_is_an_error() {
        let tiers = validate_tiered_rates(vec![
            TieredRate {
                min_usage: 0,
                max_usage: Some(10),
                price_per_unit: Decimal::MAX,
            },
            TieredRate {
                min_usage: 11,
                max_usage: None,
                price_per_unit: Decimal::MAX,
            },
        ])
        .unwrap();
        let config = UtilityRateConfig {
            electricity: ElectricityPricing::Tiered { tiers },
            water: WaterPricing::Meter { price: None },
        };
        assert!(matches!(
            calculate_electricity_cost(1, &config),
            Ok(UtilityCharge { cost, .. }) if cost == Decimal::MAX
        ));
        assert!(matches!(
            calculate_electricity_cost(20, &config),
            Err(RentBillingError::InvalidInput { .. })
        ));
    }
}
