use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{
    amount_overflow, checked_sum, with_metadata, BillingPeriod, ComputationOutput, Money,
};
use crate::{RentBillingError, RentBillingResult};

/// The backward walk never looks further than a year.
pub const MAX_STREAK_MONTHS: i64 = 12;

/// Streak length from which a room is flagged.
pub const DEBT_WARNING_STREAK: u32 = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A persisted monthly bill, as far as debt is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub month: u32,
    pub year: i32,
    pub total_cost: Money,
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<Money>,
}

impl BillRecord {
    pub fn period(&self) -> RentBillingResult<BillingPeriod> {
        BillingPeriod::new(self.year, self.month)
    }
}

/// An unpaid or partially paid bill with what is still owed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpaidBill {
    #[serde(flatten)]
    pub bill: BillRecord,
    pub remaining_debt: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDebtSnapshot {
    pub room_id: String,
    /// Lifetime sum of remaining debt over every bill of the room.
    pub total_debt: Money,
    pub consecutive_months: u32,
    pub has_debt_warning: bool,
    /// Newest first.
    pub unpaid_bills: Vec<UnpaidBill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDebtInput {
    pub room_id: String,
    pub bills: Vec<BillRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// What is still owed on one bill. An unpaid bill owes its full total; a
/// paid bill owes whatever the recorded payment did not cover.
pub fn remaining_debt(bill: &BillRecord) -> Money {
    if !bill.is_paid {
        return bill.total_cost;
    }
    let paid = bill.paid_amount.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
    if paid >= bill.total_cost {
        Decimal::ZERO
    } else {
        bill.total_cost - paid
    }
}

/// Lifetime debt of a room: remaining debt summed over every bill ever
/// issued. Fully paid bills contribute zero.
pub fn total_debt(bills: &[BillRecord]) -> RentBillingResult<Money> {
    checked_sum("total_debt", bills.iter().map(remaining_debt))
}

/// Number of consecutive calendar months, counting back from the newest
/// month with remaining debt, that all carry remaining debt.
///
/// A month without debt (paid, or never billed) ends the run even when older
/// unpaid months exist. The walk stops after [`MAX_STREAK_MONTHS`].
pub fn consecutive_unpaid_streak(bills: &[BillRecord]) -> RentBillingResult<u32> {
    let unpaid = unpaid_month_indices(bills)?;

    let Some(&anchor) = unpaid.last() else {
        return Ok(0);
    };

    let streak = (0..MAX_STREAK_MONTHS)
        .take_while(|step| unpaid.contains(&(anchor - step)))
        .count();

    Ok(streak as u32)
}

pub fn has_debt_warning(bills: &[BillRecord]) -> RentBillingResult<bool> {
    Ok(consecutive_unpaid_streak(bills)? >= DEBT_WARNING_STREAK)
}

pub fn room_debt_snapshot(
    room_id: &str,
    bills: &[BillRecord],
) -> RentBillingResult<RoomDebtSnapshot> {
    let sorted = sorted_newest_first(bills)?;
    let consecutive_months = consecutive_unpaid_streak(&sorted)?;

    let unpaid_bills: Vec<UnpaidBill> = sorted
        .iter()
        .filter_map(|bill| {
            let remaining = remaining_debt(bill);
            (remaining > Decimal::ZERO).then(|| UnpaidBill {
                bill: bill.clone(),
                remaining_debt: remaining,
            })
        })
        .collect();

    Ok(RoomDebtSnapshot {
        room_id: room_id.to_string(),
        total_debt: total_debt(&sorted)?,
        consecutive_months,
        has_debt_warning: consecutive_months >= DEBT_WARNING_STREAK,
        unpaid_bills,
    })
}

/// Snapshot a single room and wrap it in the standard output envelope.
pub fn assess_room_debt(
    input: &RoomDebtInput,
) -> RentBillingResult<ComputationOutput<RoomDebtSnapshot>> {
    let mut warnings: Vec<String> = Vec::new();
    let snapshot = room_debt_snapshot(&input.room_id, &input.bills)?;

    if snapshot.has_debt_warning {
        warnings.push(format!(
            "Room {} has {} consecutive months of unpaid bills.",
            snapshot.room_id, snapshot.consecutive_months
        ));
    }

    let assumptions = serde_json::json!({
        "bills_considered": input.bills.len(),
        "max_streak_months": MAX_STREAK_MONTHS,
        "warning_streak": DEBT_WARNING_STREAK,
    });

    Ok(with_metadata(
        "Room debt (lifetime remaining debt, consecutive unpaid months)",
        &assumptions,
        warnings,
        snapshot,
    ))
}

/// Record a payment against a bill. Payments accumulate, and the bill is
/// marked paid; any shortfall remains as debt.
pub fn record_payment(bill: &BillRecord, amount: Money) -> RentBillingResult<BillRecord> {
    if amount <= Decimal::ZERO {
        return Err(RentBillingError::InvalidInput {
            field: "amount".into(),
            reason: "Payment amount must be positive.".into(),
        });
    }
    let already_paid = if bill.is_paid {
        bill.paid_amount.unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let paid_amount = already_paid
        .checked_add(amount)
        .ok_or_else(|| amount_overflow("paid_amount"))?;
    Ok(BillRecord {
        is_paid: true,
        paid_amount: Some(paid_amount),
        ..bill.clone()
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn sorted_newest_first(bills: &[BillRecord]) -> RentBillingResult<Vec<BillRecord>> {
    let mut keyed = bills
        .iter()
        .map(|b| Ok((b.period()?.index(), b.clone())))
        .collect::<RentBillingResult<Vec<_>>>()?;
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(keyed.into_iter().map(|(_, b)| b).collect())
}

fn unpaid_month_indices(bills: &[BillRecord]) -> RentBillingResult<BTreeSet<i64>> {
    let mut unpaid = BTreeSet::new();
    for bill in bills {
        let index = bill.period()?.index();
        if remaining_debt(bill) > Decimal::ZERO {
            unpaid.insert(index);
        }
    }
    Ok(unpaid)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
