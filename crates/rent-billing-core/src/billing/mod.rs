pub mod bill;
pub mod electricity;
pub mod meter;
pub mod rates;
pub mod tiers;
pub mod water;

use serde::{Deserialize, Serialize};

use crate::types::{Money, Usage};

/// One line of a utility charge breakdown, kept on the bill for display and
/// audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLine {
    pub label: String,
    pub usage: Usage,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// A priced utility: the total plus the lines it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityCharge {
    pub cost: Money,
    pub breakdown: Vec<ChargeLine>,
}
