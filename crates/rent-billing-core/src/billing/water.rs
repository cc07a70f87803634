use super::rates::{UtilityRateConfig, WaterPricing};
use super::{ChargeLine, UtilityCharge};
use crate::types::{checked_charge, Usage};
use crate::{RentBillingError, RentBillingResult};

/// Price water for a billing period. Under per-occupant pricing the meter
/// usage is ignored entirely.
pub fn calculate_water_cost(
    usage: Usage,
    config: &UtilityRateConfig,
    occupant_count: i64,
) -> RentBillingResult<UtilityCharge> {
    match &config.water {
        WaterPricing::Meter { price } => {
            let price = price.ok_or_else(|| {
                RentBillingError::MissingRateConfiguration("water flat price is not set".into())
            })?;
            if usage < 0 {
                return Err(RentBillingError::InvalidUsage(usage));
            }
            let cost = checked_charge("water_cost", usage, price)?;
            Ok(UtilityCharge {
                cost,
                breakdown: vec![ChargeLine {
                    label: "Metered".into(),
                    usage,
                    unit_price: price,
                    subtotal: cost,
                }],
            })
        }
        WaterPricing::Person { price_per_occupant } => {
            let price = price_per_occupant.ok_or_else(|| {
                RentBillingError::MissingRateConfiguration(
                    "water price per occupant is not set".into(),
                )
            })?;
            if occupant_count < 1 {
                return Err(RentBillingError::InvalidOccupantCount(occupant_count));
            }
            let cost = checked_charge("water_cost", occupant_count, price)?;
            Ok(UtilityCharge {
                cost,
                breakdown: vec![ChargeLine {
                    label: format!("Per occupant ({occupant_count})"),
                    usage: occupant_count,
                    unit_price: price,
                    subtotal: cost,
                }],
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::rates::ElectricityPricing;
    use crate::types::Money;
    use rust_decimal_macros::dec;

    fn config(water: WaterPricing) -> UtilityRateConfig {
        UtilityRateConfig {
            electricity: ElectricityPricing::Flat { price: None },
            water,
        }
    }

    fn metered(price: Option<Money>) -> UtilityRateConfig {
        config(WaterPricing::Meter { price })
    }

    fn per_person(price: Option<Money>) -> UtilityRateConfig {
        config(WaterPricing::Person {
            price_per_occupant: price,
        })
    }

    #[test]
    fn test_metered_water() {
        let charge = calculate_water_cost(12, &metered(Some(dec!(15000))), 3).unwrap();
        assert_eq!(charge.cost, dec!(180_000));
    }

    #[test]
    fn test_metered_missing_price() {
        assert!(matches!(
            calculate_water_cost(12, &metered(None), 1),
            Err(RentBillingError::MissingRateConfiguration(_))
        ));
    }

    #[test]
    fn test_metered_negative_usage() {
        assert_eq!(
            calculate_water_cost(-1, &metered(Some(dec!(15000))), 1).unwrap_err(),
            RentBillingError::InvalidUsage(-1)
        );
    }

    #[test]
    fn test_per_person_ignores_usage() {
        let cfg = per_person(Some(dec!(100_000)));
        let low = calculate_water_cost(0, &cfg, 3).unwrap();
        let high = calculate_water_cost(9_000, &cfg, 3).unwrap();
        assert_eq!(low.cost, dec!(300_000));
        assert_eq!(low, high);
    }

    #[test]
    fn test_per_person_zero_occupants_rejected() {
        assert_eq!(
            calculate_water_cost(5, &per_person(Some(dec!(100_000))), 0).unwrap_err(),
            RentBillingError::InvalidOccupantCount(0)
        );
    }

    #[test]
    fn test_per_person_missing_price_checked_first() {
        assert!(matches!(
            calculate_water_cost(5, &per_person(None), 0),
            Err(RentBillingError::MissingRateConfiguration(_))
        ));
    }

    #[test]
    fn test_price_overflow_is_an_error() {
        let max = Some(rust_decimal::Decimal::MAX);
        assert!(matches!(
            calculate_water_cost(2, &metered(max), 1),
            Err(RentBillingError::InvalidInput { .. })
        ));
        assert!(matches!(
            calculate_water_cost(0, &per_person(max), 3),
            Err(RentBillingError::InvalidInput { .. })
        ));
    }
}
