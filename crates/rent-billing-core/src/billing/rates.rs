use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tiers::{validate_tiered_rates, TieredRate, ValidatedTiers};
use crate::types::Money;
use crate::{RentBillingError, RentBillingResult};

// ---------------------------------------------------------------------------
// Settings record (as written by the settings screen)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WaterPricingMethod {
    Meter,
    Person,
}

/// Flat utility pricing settings for a property, in the shape the settings
/// store persists them. Call [`RateSettings::validate`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity_flat_price: Option<Money>,
    #[serde(default)]
    pub use_tiered_electricity: bool,
    #[serde(default)]
    pub tiers: Vec<TieredRate>,
    pub water_pricing_method: WaterPricingMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_flat_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_price_per_occupant: Option<Money>,
}

// ---------------------------------------------------------------------------
// Validated configuration consumed by the calculators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum ElectricityPricing {
    Flat { price: Option<Money> },
    Tiered { tiers: ValidatedTiers },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum WaterPricing {
    /// Charged per metered unit.
    Meter { price: Option<Money> },
    /// Charged per occupant; meter usage is ignored.
    Person { price_per_occupant: Option<Money> },
}

/// Immutable rate configuration injected into every bill computation.
///
/// Prices may be absent; the calculators report `MissingRateConfiguration`
/// when a bill needs one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityRateConfig {
    pub electricity: ElectricityPricing,
    pub water: WaterPricing,
}

impl RateSettings {
    /// Validate the settings record. The tier table is checked only when
    /// tiered electricity is switched on.
    pub fn validate(&self) -> RentBillingResult<UtilityRateConfig> {
        for (field, price) in [
            ("electricity_flat_price", self.electricity_flat_price),
            ("water_flat_price", self.water_flat_price),
            ("water_price_per_occupant", self.water_price_per_occupant),
        ] {
            if price.is_some_and(|p| p < Decimal::ZERO) {
                return Err(RentBillingError::InvalidInput {
                    field: field.into(),
                    reason: "Price cannot be negative.".into(),
                });
            }
        }

        let electricity = if self.use_tiered_electricity {
            ElectricityPricing::Tiered {
                tiers: validate_tiered_rates(self.tiers.clone())?,
            }
        } else {
            ElectricityPricing::Flat {
                price: self.electricity_flat_price,
            }
        };

        let water = match self.water_pricing_method {
            WaterPricingMethod::Meter => WaterPricing::Meter {
                price: self.water_flat_price,
            },
            WaterPricingMethod::Person => WaterPricing::Person {
                price_per_occupant: self.water_price_per_occupant,
            },
        };

        Ok(UtilityRateConfig { electricity, water })
    }
}

impl TryFrom<RateSettings> for UtilityRateConfig {
    type Error = RentBillingError;

    fn try_from(settings: RateSettings) -> Result<Self, Self::Error> {
        settings.validate()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
