use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use rent_billing_core::billing::{bill, electricity, meter, rates, tiers, water};
use rent_billing_core::debt::{fleet, ledger};
use rent_billing_core::money_text;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: serde::de::DeserializeOwned>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn render<T: serde::Serialize>(output: &T) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct MeterRequest {
    old: i64,
    new: i64,
    #[serde(default = "default_capacity")]
    capacity: i64,
}

fn default_capacity() -> i64 {
    meter::DEFAULT_METER_CAPACITY
}

#[derive(Deserialize)]
struct UsageRequest {
    #[serde(default)]
    usage: i64,
    #[serde(default = "default_occupants")]
    occupant_count: i64,
    rates: rates::RateSettings,
}

fn default_occupants() -> i64 {
    1
}

#[derive(Deserialize)]
struct FeeChangeRequest {
    bill: bill::BillInput,
    change: bill::FeeChange,
}

#[derive(Deserialize)]
struct PaymentRequest {
    bill: ledger::BillRecord,
    amount: Decimal,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Validate a settings record; returns the calculator-ready configuration.
#[napi]
pub fn validate_rate_settings(settings_json: String) -> NapiResult<String> {
    let settings: rates::RateSettings = parse(&settings_json)?;
    render(&settings.validate().map_err(to_napi_error)?)
}

#[napi]
pub fn validate_tiered_rates(tiers_json: String) -> NapiResult<String> {
    let input: Vec<tiers::TieredRate> = parse(&tiers_json)?;
    render(&tiers::validate_tiered_rates(input).map_err(to_napi_error)?)
}

// ---------------------------------------------------------------------------
// Billing
// ---------------------------------------------------------------------------

#[napi]
pub fn interpret_reading(input_json: String) -> NapiResult<String> {
    let input: MeterRequest = parse(&input_json)?;
    let output =
        meter::interpret_reading(input.old, input.new, input.capacity).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn electricity_cost(input_json: String) -> NapiResult<String> {
    let input: UsageRequest = parse(&input_json)?;
    let config = input.rates.validate().map_err(to_napi_error)?;
    let output =
        electricity::calculate_electricity_cost(input.usage, &config).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn water_cost(input_json: String) -> NapiResult<String> {
    let input: UsageRequest = parse(&input_json)?;
    let config = input.rates.validate().map_err(to_napi_error)?;
    let output = water::calculate_water_cost(input.usage, &config, input.occupant_count)
        .map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn compute_bill(input_json: String) -> NapiResult<String> {
    let input: bill::BillInput = parse(&input_json)?;
    render(&bill::compute_bill(&input).map_err(to_napi_error)?)
}

#[napi]
pub fn apply_fee_change(input_json: String) -> NapiResult<String> {
    let input: FeeChangeRequest = parse(&input_json)?;
    render(&bill::apply_fee_change(&input.bill, &input.change).map_err(to_napi_error)?)
}

#[napi]
pub fn amount_to_words(amount: String) -> NapiResult<String> {
    let amount: Decimal = amount.trim().parse().map_err(to_napi_error)?;
    money_text::decimal_amount_to_words(amount).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Debt
// ---------------------------------------------------------------------------

#[napi]
pub fn room_debt(input_json: String) -> NapiResult<String> {
    let input: ledger::RoomDebtInput = parse(&input_json)?;
    render(&ledger::assess_room_debt(&input).map_err(to_napi_error)?)
}

#[napi]
pub fn fleet_debt_warnings(input_json: String) -> NapiResult<String> {
    let input: fleet::FleetDebtInput = parse(&input_json)?;
    render(&fleet::assess_fleet_debt(&input).map_err(to_napi_error)?)
}

#[napi]
pub fn record_payment(input_json: String) -> NapiResult<String> {
    let input: PaymentRequest = parse(&input_json)?;
    render(&ledger::record_payment(&input.bill, input.amount).map_err(to_napi_error)?)
}
