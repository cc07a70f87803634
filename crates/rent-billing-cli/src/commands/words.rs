use clap::Args;
use serde_json::Value;

use rent_billing_core::money_text::{decimal_amount_to_words, round_to_dong};
use rent_billing_core::types::with_metadata;
use rust_decimal::Decimal;

/// Arguments for spelling an amount in Vietnamese words
#[derive(Args)]
pub struct WordsArgs {
    /// Amount in đồng; fractions are rounded half away from zero
    #[arg(long)]
    pub amount: Decimal,
}

pub fn run_amount_in_words(args: WordsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let words = decimal_amount_to_words(args.amount)?;
    let rounded = round_to_dong(args.amount);
    let assumptions = serde_json::json!({ "rounded_amount": rounded.to_string() });
    Ok(serde_json::to_value(with_metadata(
        "Vietnamese amount in words",
        &assumptions,
        Vec::new(),
        serde_json::json!({ "amount": rounded.to_string(), "words": words }),
    ))?)
}
