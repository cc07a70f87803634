use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use rent_billing_core::debt::fleet::{assess_fleet_debt, FleetDebtInput};
use rent_billing_core::debt::ledger::{
    assess_room_debt, record_payment, remaining_debt, BillRecord, RoomDebtInput,
};
use rent_billing_core::types::with_metadata;
use rust_decimal::Decimal;

use crate::input;

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub bill: BillRecord,
    pub amount: Decimal,
}

/// Arguments for a single room's debt snapshot
#[derive(Args)]
pub struct RoomDebtArgs {
    /// Path to JSON input: {"room_id": "...", "bills": [...]}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for fleet-wide debt warnings
#[derive(Args)]
pub struct DebtWarningsArgs {
    /// Path to JSON input: {"rooms": [{"room_id", "occupied", "bills"}]}
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for recording a payment against a bill
#[derive(Args)]
pub struct PaymentArgs {
    /// Path to JSON input: {"bill": {...}, "amount": "..."}
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_room_debt(args: RoomDebtArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let room: RoomDebtInput = input::load(args.input.as_deref(), "room debt")?;
    let result = assess_room_debt(&room)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_debt_warnings(args: DebtWarningsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fleet: FleetDebtInput = input::load(args.input.as_deref(), "debt warnings")?;
    let result = assess_fleet_debt(&fleet)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_record_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PaymentRequest = input::load(args.input.as_deref(), "payments")?;
    let updated = record_payment(&request.bill, request.amount)?;
    let remaining = remaining_debt(&updated);

    let mut warnings = Vec::new();
    if remaining > Decimal::ZERO {
        warnings.push(format!("Bill is partially paid; {remaining} remains outstanding."));
    }
    let assumptions = serde_json::json!({
        "payment": request.amount.to_string(),
        "remaining_debt": remaining.to_string(),
    });
    Ok(serde_json::to_value(with_metadata(
        "Payment recording (accumulated paid amount)",
        &assumptions,
        warnings,
        updated,
    ))?)
}
