use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use rent_billing_core::billing::bill::{self, BillInput, Fee, FeeChange, ReadingPair};
use rent_billing_core::billing::electricity::calculate_electricity_cost;
use rent_billing_core::billing::meter::{
    interpret_reading, MeterCapacities, DEFAULT_METER_CAPACITY,
};
use rent_billing_core::billing::rates::RateSettings;
use rent_billing_core::billing::tiers::{validate_tiered_rates, TieredRate};
use rent_billing_core::billing::water::calculate_water_cost;
use rent_billing_core::types::with_metadata;
use rust_decimal::Decimal;

use crate::{config, input};

/// Bill document accepted on the command line. Rate settings may be
/// embedded; otherwise they come from `--rates` or the environment.
#[derive(Debug, Deserialize)]
pub struct BillRequest {
    pub electricity: ReadingPair,
    pub water: ReadingPair,
    pub room_price: Decimal,
    pub occupant_count: i64,
    #[serde(default)]
    pub fees: Vec<Fee>,
    #[serde(default)]
    pub rates: Option<RateSettings>,
    #[serde(default)]
    pub capacities: MeterCapacities,
}

#[derive(Debug, Deserialize)]
pub struct FeeChangeRequest {
    pub bill: BillRequest,
    pub change: FeeChange,
}

/// Arguments for a full bill computation
#[derive(Args)]
pub struct BillArgs {
    /// Path to JSON bill input
    #[arg(long)]
    pub input: Option<String>,

    /// Path to rate settings (JSON or YAML)
    #[arg(long)]
    pub rates: Option<String>,
}

/// Arguments for a fee edit with recomputation
#[derive(Args)]
pub struct FeeChangeArgs {
    /// Path to JSON input: {"bill": {...}, "change": {...}}
    #[arg(long)]
    pub input: Option<String>,

    /// Path to rate settings (JSON or YAML)
    #[arg(long)]
    pub rates: Option<String>,
}

/// Arguments for interpreting a pair of meter readings
#[derive(Args)]
pub struct MeterArgs {
    /// Reading at the start of the period
    #[arg(long)]
    pub old: i64,

    /// Reading at the end of the period
    #[arg(long)]
    pub new: i64,

    /// Meter counter maximum
    #[arg(long, default_value_t = DEFAULT_METER_CAPACITY)]
    pub capacity: i64,
}

/// Arguments for pricing electricity usage
#[derive(Args)]
pub struct ElectricityArgs {
    /// Consumed units (kWh)
    #[arg(long)]
    pub usage: i64,

    /// Path to rate settings (JSON or YAML)
    #[arg(long)]
    pub rates: Option<String>,
}

/// Arguments for pricing water usage
#[derive(Args)]
pub struct WaterArgs {
    /// Consumed units (m3); ignored under per-occupant pricing
    #[arg(long, default_value_t = 0)]
    pub usage: i64,

    /// Number of occupants
    #[arg(long, default_value_t = 1)]
    pub occupants: i64,

    /// Path to rate settings (JSON or YAML)
    #[arg(long)]
    pub rates: Option<String>,
}

/// Arguments for validating a tier table
#[derive(Args)]
pub struct TiersArgs {
    /// Path to JSON array of tiers
    #[arg(long)]
    pub input: Option<String>,
}

impl BillRequest {
    fn into_input(self, rates_path: Option<&str>) -> Result<BillInput, Box<dyn std::error::Error>> {
        let rates = config::resolve_rates(self.rates, rates_path)?;
        Ok(BillInput {
            electricity: self.electricity,
            water: self.water,
            room_price: self.room_price,
            occupant_count: self.occupant_count,
            fees: self.fees,
            rates,
            capacities: self.capacities,
        })
    }
}

pub fn run_bill(args: BillArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: BillRequest = input::load(args.input.as_deref(), "bill computation")?;
    let bill_input = request.into_input(args.rates.as_deref())?;
    let result = bill::compute_bill(&bill_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fee_change(args: FeeChangeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: FeeChangeRequest = input::load(args.input.as_deref(), "fee changes")?;
    let bill_input = request.bill.into_input(args.rates.as_deref())?;
    let result = bill::apply_fee_change(&bill_input, &request.change)?;
    Ok(serde_json::to_value(result.bill)?)
}

pub fn run_meter_usage(args: MeterArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let consumption = interpret_reading(args.old, args.new, args.capacity)?;
    let assumptions = serde_json::json!({ "capacity": args.capacity });
    let mut warnings = Vec::new();
    if consumption.rollover {
        warnings.push("Meter rolled over; the zero crossing counts as one unit.".to_string());
    }
    Ok(serde_json::to_value(with_metadata(
        "Meter consumption (with rollover)",
        &assumptions,
        warnings,
        consumption,
    ))?)
}

pub fn run_electricity_cost(args: ElectricityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rates = config::resolve_rates(None, args.rates.as_deref())?;
    let charge = calculate_electricity_cost(args.usage, &rates)?;
    let assumptions = serde_json::json!({ "usage": args.usage });
    Ok(serde_json::to_value(with_metadata(
        "Electricity cost (flat or progressive tiers)",
        &assumptions,
        Vec::new(),
        charge,
    ))?)
}

pub fn run_water_cost(args: WaterArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rates = config::resolve_rates(None, args.rates.as_deref())?;
    let charge = calculate_water_cost(args.usage, &rates, args.occupants)?;
    let assumptions = serde_json::json!({
        "usage": args.usage,
        "occupants": args.occupants,
    });
    Ok(serde_json::to_value(with_metadata(
        "Water cost (metered or per occupant)",
        &assumptions,
        Vec::new(),
        charge,
    ))?)
}

pub fn run_validate_tiers(args: TiersArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tiers: Vec<TieredRate> = input::load(args.input.as_deref(), "tier validation")?;
    let count = tiers.len();
    let validated = validate_tiered_rates(tiers)?;
    let assumptions = serde_json::json!({ "tiers_supplied": count });
    Ok(serde_json::to_value(with_metadata(
        "Tier table validation (sorted, contiguous, unbounded tail)",
        &assumptions,
        Vec::new(),
        validated,
    ))?)
}
