//! Vietnamese spelling of đồng amounts, as printed on invoices
//! ("Một trăm bảy mươi lăm nghìn năm trăm đồng").

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Money;
use crate::{RentBillingError, RentBillingResult};

const ZERO_TEXT: &str = "Không đồng";
const CURRENCY: &str = "đồng";

const DIGITS: [&str; 10] = [
    "không", "một", "hai", "ba", "bốn", "năm", "sáu", "bảy", "tám", "chín",
];

const BILLION: u64 = 1_000_000_000;
const MILLION: u64 = 1_000_000;
const THOUSAND: u64 = 1_000;

/// Spell a whole đồng amount in Vietnamese words.
pub fn amount_to_words(amount: u64) -> String {
    if amount == 0 {
        return ZERO_TEXT.to_string();
    }
    let words = spell(amount).join(" ");
    format!("{} {}", capitalize(&words), CURRENCY)
}

/// Round a decimal amount to whole đồng (half away from zero) and spell it.
pub fn decimal_amount_to_words(amount: Money) -> RentBillingResult<String> {
    if amount < Decimal::ZERO {
        return Err(RentBillingError::InvalidInput {
            field: "amount".into(),
            reason: "Amount to spell cannot be negative.".into(),
        });
    }
    let whole = round_to_dong(amount)
        .to_u64()
        .ok_or_else(|| RentBillingError::InvalidInput {
            field: "amount".into(),
            reason: format!("Amount {amount} is too large to spell."),
        })?;
    Ok(amount_to_words(whole))
}

/// Round to whole đồng, half away from zero.
pub fn round_to_dong(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn spell(amount: u64) -> Vec<&'static str> {
    let billions = amount / BILLION;
    let millions = (amount / MILLION) % 1_000;
    let thousands = (amount / THOUSAND) % 1_000;
    let units = amount % 1_000;

    let mut words = Vec::new();
    // A billion count can itself exceed 999 ("một nghìn tỷ").
    if billions > 0 {
        words.extend(spell(billions));
        words.push("tỷ");
    }
    let groups = [
        (millions, Some("triệu")),
        (thousands, Some("nghìn")),
        (units, None),
    ];
    for (group, label) in groups {
        if group == 0 {
            continue;
        }
        words.extend(spell_group(group));
        if let Some(label) = label {
            words.push(label);
        }
    }
    words
}

/// Spell a group in 1..=999.
fn spell_group(group: u64) -> Vec<&'static str> {
    let hundreds = (group / 100) as usize;
    let tens = ((group / 10) % 10) as usize;
    let ones = (group % 10) as usize;

    let mut words = Vec::new();
    if hundreds > 0 {
        words.push(DIGITS[hundreds]);
        words.push("trăm");
        if tens == 0 && ones > 0 {
            words.push("lẻ");
        }
    }

    match tens {
        0 => {
            if ones > 0 {
                words.push(DIGITS[ones]);
            }
        }
        1 => {
            words.push("mười");
            words.extend(ones_after_tens(ones));
        }
        _ => {
            words.push(DIGITS[tens]);
            words.push("mươi");
            words.extend(ones_after_tens(ones));
        }
    }
    words
}

fn ones_after_tens(ones: usize) -> Option<&'static str> {
    match ones {
        0 => None,
        1 => Some("mốt"),
        5 => Some("lăm"),
        d => Some(DIGITS[d]),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
