use serde::{Deserialize, Serialize};

use crate::types::Usage;
use crate::{RentBillingError, RentBillingResult};

/// Counter maximum of a standard five-digit meter.
pub const DEFAULT_METER_CAPACITY: Usage = 99_999;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Start and end readings of a meter over one billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterPeriodReading {
    pub old: Usage,
    pub new: Usage,
    pub capacity: Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionResult {
    pub usage: Usage,
    /// The counter passed its maximum and restarted during the period.
    pub rollover: bool,
}

/// Meter counter capacities for a room. Room-level overrides take
/// precedence over the property-wide default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterCapacities {
    #[serde(default = "default_capacity")]
    pub property_default: Usage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity_override: Option<Usage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_override: Option<Usage>,
}

fn default_capacity() -> Usage {
    DEFAULT_METER_CAPACITY
}

impl Default for MeterCapacities {
    fn default() -> Self {
        Self {
            property_default: DEFAULT_METER_CAPACITY,
            electricity_override: None,
            water_override: None,
        }
    }
}

impl MeterCapacities {
    pub fn electricity(&self) -> Usage {
        self.electricity_override.unwrap_or(self.property_default)
    }

    pub fn water(&self) -> Usage {
        self.water_override.unwrap_or(self.property_default)
    }
}

impl MeterPeriodReading {
    pub fn interpret(&self) -> RentBillingResult<ConsumptionResult> {
        interpret_reading(self.old, self.new, self.capacity)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Convert a pair of readings into consumption.
///
/// When the new reading is below the old one the meter wrapped: the units
/// from `old` up to `capacity`, the zero crossing itself (one unit), and the
/// units from zero up to `new` are all counted. Electricity and water use
/// this same rule.
pub fn interpret_reading(
    old: Usage,
    new: Usage,
    capacity: Usage,
) -> RentBillingResult<ConsumptionResult> {
    validate_reading(old, new, capacity)?;

    if new >= old {
        Ok(ConsumptionResult {
            usage: new - old,
            rollover: false,
        })
    } else {
        Ok(ConsumptionResult {
            usage: (capacity - old) + new + 1,
            rollover: true,
        })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_reading(old: Usage, new: Usage, capacity: Usage) -> RentBillingResult<()> {
    if capacity <= 0 {
        return Err(RentBillingError::InvalidReading {
            field: "capacity".into(),
            reason: format!("Meter capacity must be positive, got {capacity}."),
        });
    }
    for (field, value) in [("old", old), ("new", new)] {
        if value < 0 {
            return Err(RentBillingError::InvalidReading {
                field: field.into(),
                reason: format!("Reading cannot be negative, got {value}."),
            });
        }
        if value > capacity {
            return Err(RentBillingError::InvalidReading {
                field: field.into(),
                reason: format!("Reading {value} exceeds meter capacity {capacity}."),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
