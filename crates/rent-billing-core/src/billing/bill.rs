use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::electricity::calculate_electricity_cost;
use super::meter::{MeterCapacities, MeterPeriodReading};
use super::rates::{ElectricityPricing, UtilityRateConfig, WaterPricing};
use super::water::calculate_water_cost;
use super::ChargeLine;
use crate::money_text::{decimal_amount_to_words, round_to_dong};
use crate::types::{checked_sum, with_metadata, ComputationOutput, Money, Usage};
use crate::{RentBillingError, RentBillingResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Start and end readings of one meter; the capacity comes from
/// [`MeterCapacities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingPair {
    pub old: Usage,
    pub new: Usage,
}

/// An extra charge on a bill (internet, parking, cleaning, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillInput {
    pub electricity: ReadingPair,
    pub water: ReadingPair,
    /// Monthly rent of the room.
    pub room_price: Money,
    pub occupant_count: i64,
    #[serde(default)]
    pub fees: Vec<Fee>,
    pub rates: UtilityRateConfig,
    #[serde(default)]
    pub capacities: MeterCapacities,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillComputationResult {
    pub electricity_usage: Usage,
    pub electricity_rollover: bool,
    pub water_usage: Usage,
    pub water_rollover: bool,
    pub room_price: Money,
    pub electricity_cost: Money,
    pub water_cost: Money,
    pub fees_total: Money,
    /// `room_price + electricity_cost + water_cost + fees_total`
    pub total_cost: Money,
    /// `total_cost` rounded to whole đồng and spelled in words.
    pub total_cost_text: String,
    pub electricity_breakdown: Vec<ChargeLine>,
    pub water_breakdown: Vec<ChargeLine>,
    pub fees: Vec<Fee>,
}

/// An edit to the fee list of an issued bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FeeChange {
    Add { fee: Fee },
    Update { index: usize, fee: Fee },
    Remove { index: usize },
}

/// A bill input after a fee edit, together with its recomputed bill. The
/// caller persists both in one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecomputedBill {
    pub input: BillInput,
    pub bill: ComputationOutput<BillComputationResult>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute a full monthly bill from meter readings, rent, fees and the
/// property's rate configuration.
///
/// The same input always yields the same output.
pub fn compute_bill(
    input: &BillInput,
) -> RentBillingResult<ComputationOutput<BillComputationResult>> {
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    // -- Meters ---------------------------------------------------------------
    let electricity_reading = MeterPeriodReading {
        old: input.electricity.old,
        new: input.electricity.new,
        capacity: input.capacities.electricity(),
    };
    let water_reading = MeterPeriodReading {
        old: input.water.old,
        new: input.water.new,
        capacity: input.capacities.water(),
    };
    let electricity_consumption = electricity_reading.interpret()?;
    let water_consumption = water_reading.interpret()?;

    if electricity_consumption.rollover {
        warn!(
            old = electricity_reading.old,
            new = electricity_reading.new,
            capacity = electricity_reading.capacity,
            "Electricity meter rolled over"
        );
        warnings.push(format!(
            "Electricity meter rolled over ({} -> {}, capacity {}).",
            electricity_reading.old, electricity_reading.new, electricity_reading.capacity
        ));
    }
    if water_consumption.rollover {
        warn!(
            old = water_reading.old,
            new = water_reading.new,
            capacity = water_reading.capacity,
            "Water meter rolled over"
        );
        warnings.push(format!(
            "Water meter rolled over ({} -> {}, capacity {}).",
            water_reading.old, water_reading.new, water_reading.capacity
        ));
    }

    // -- Utilities ------------------------------------------------------------
    let electricity = calculate_electricity_cost(electricity_consumption.usage, &input.rates)?;
    let water = calculate_water_cost(water_consumption.usage, &input.rates, input.occupant_count)?;

    // -- Totals ---------------------------------------------------------------
    let fees_total = checked_sum("fees", input.fees.iter().map(|f| f.amount))?;
    let total_cost = checked_sum(
        "total_cost",
        [input.room_price, electricity.cost, water.cost, fees_total],
    )?;
    let total_cost_text = decimal_amount_to_words(total_cost)?;

    if round_to_dong(total_cost) != total_cost {
        warnings.push(format!(
            "Total {total_cost} has fractional đồng; the text amount is rounded."
        ));
    }

    debug!(
        electricity_usage = electricity_consumption.usage,
        water_usage = water_consumption.usage,
        electricity_cost = %electricity.cost,
        water_cost = %water.cost,
        fees_total = %fees_total,
        total_cost = %total_cost,
        "Bill computed"
    );

    let output = BillComputationResult {
        electricity_usage: electricity_consumption.usage,
        electricity_rollover: electricity_consumption.rollover,
        water_usage: water_consumption.usage,
        water_rollover: water_consumption.rollover,
        room_price: input.room_price,
        electricity_cost: electricity.cost,
        water_cost: water.cost,
        fees_total,
        total_cost,
        total_cost_text,
        electricity_breakdown: electricity.breakdown,
        water_breakdown: water.breakdown,
        fees: input.fees.clone(),
    };

    let electricity_method = match &input.rates.electricity {
        ElectricityPricing::Flat { .. } => "flat",
        ElectricityPricing::Tiered { .. } => "tiered",
    };
    let water_method = match &input.rates.water {
        WaterPricing::Meter { .. } => "meter",
        WaterPricing::Person { .. } => "person",
    };
    let assumptions = serde_json::json!({
        "electricity_method": electricity_method,
        "water_method": water_method,
        "electricity_meter_capacity": input.capacities.electricity(),
        "water_meter_capacity": input.capacities.water(),
        "occupant_count": input.occupant_count,
    });

    Ok(with_metadata(
        "Monthly bill (rent + electricity + water + fees)",
        &assumptions,
        warnings,
        output,
    ))
}

/// Apply a fee edit to a bill input and recompute the bill with
/// [`compute_bill`].
pub fn apply_fee_change(
    input: &BillInput,
    change: &FeeChange,
) -> RentBillingResult<RecomputedBill> {
    let mut updated = input.clone();

    match change {
        FeeChange::Add { fee } => updated.fees.push(fee.clone()),
        FeeChange::Update { index, fee } => {
            let slot = updated
                .fees
                .get_mut(*index)
                .ok_or_else(|| fee_index_error(*index, input.fees.len()))?;
            *slot = fee.clone();
        }
        FeeChange::Remove { index } => {
            if *index >= updated.fees.len() {
                return Err(fee_index_error(*index, input.fees.len()));
            }
            updated.fees.remove(*index);
        }
    }

    let bill = compute_bill(&updated)?;
    Ok(RecomputedBill {
        input: updated,
        bill,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &BillInput) -> RentBillingResult<()> {
    if input.room_price < Decimal::ZERO {
        return Err(RentBillingError::InvalidInput {
            field: "room_price".into(),
            reason: "Room price cannot be negative.".into(),
        });
    }
    for (i, fee) in input.fees.iter().enumerate() {
        if fee.amount < Decimal::ZERO {
            return Err(RentBillingError::InvalidInput {
                field: format!("fees[{i}].amount"),
                reason: format!("Fee '{}' cannot be negative.", fee.name),
            });
        }
    }
    Ok(())
}

fn fee_index_error(index: usize, len: usize) -> RentBillingError {
    RentBillingError::InvalidInput {
        field: "index".into(),
        reason: format!("Fee index {index} is out of range for {len} fee(s)."),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
