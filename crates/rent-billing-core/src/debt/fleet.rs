use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use super::ledger::{
    consecutive_unpaid_streak, room_debt_snapshot, total_debt, BillRecord, RoomDebtSnapshot,
    DEBT_WARNING_STREAK,
};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::{RentBillingError, RentBillingResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Rooms with a debt warning, longest streak first.
pub type FleetDebtWarnings = Vec<RoomDebtSnapshot>;

/// Read access to persisted bills. The ledger owns no bills itself.
pub trait BillStore {
    type Error: std::error::Error + 'static;

    fn bills_for_room(&self, room_id: &str) -> Result<Vec<BillRecord>, Self::Error>;

    /// Ids of the rooms that currently have tenants.
    fn occupied_rooms(&self) -> Result<Vec<String>, Self::Error>;
}

#[derive(Debug, Error)]
pub enum LedgerError<E: std::error::Error + 'static> {
    /// Failure of the bill store, passed through unchanged.
    #[error(transparent)]
    Store(E),

    #[error(transparent)]
    Engine(#[from] RentBillingError),
}

/// Debt queries backed by a [`BillStore`].
pub struct DebtLedger<S> {
    store: S,
}

/// A room and its bill history, as supplied to the in-memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomBills {
    pub room_id: String,
    #[serde(default = "default_occupied")]
    pub occupied: bool,
    #[serde(default)]
    pub bills: Vec<BillRecord>,
}

fn default_occupied() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetDebtInput {
    pub rooms: Vec<RoomBills>,
}

/// Bill store over rooms held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBillStore {
    order: Vec<String>,
    rooms: HashMap<String, RoomBills>,
}

// ---------------------------------------------------------------------------
// DebtLedger
// ---------------------------------------------------------------------------

impl<S: BillStore> DebtLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn bills(&self, room_id: &str) -> Result<Vec<BillRecord>, LedgerError<S::Error>> {
        self.store.bills_for_room(room_id).map_err(LedgerError::Store)
    }

    pub fn total_debt(&self, room_id: &str) -> Result<Money, LedgerError<S::Error>> {
        Ok(total_debt(&self.bills(room_id)?)?)
    }

    pub fn consecutive_unpaid_streak(&self, room_id: &str) -> Result<u32, LedgerError<S::Error>> {
        Ok(consecutive_unpaid_streak(&self.bills(room_id)?)?)
    }

    pub fn has_debt_warning(&self, room_id: &str) -> Result<bool, LedgerError<S::Error>> {
        Ok(self.consecutive_unpaid_streak(room_id)? >= DEBT_WARNING_STREAK)
    }

    pub fn room_debt_snapshot(
        &self,
        room_id: &str,
    ) -> Result<RoomDebtSnapshot, LedgerError<S::Error>> {
        Ok(room_debt_snapshot(room_id, &self.bills(room_id)?)?)
    }

    /// Snapshots of every occupied room with a debt warning, sorted by
    /// streak descending. Rooms with equal streaks keep the store's order.
    pub fn fleet_debt_warnings(&self) -> Result<FleetDebtWarnings, LedgerError<S::Error>> {
        let rooms = self.store.occupied_rooms().map_err(LedgerError::Store)?;
        let snapshots = rooms
            .iter()
            .map(|room_id| self.room_debt_snapshot(room_id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(flagged_by_streak(snapshots))
    }
}

// ---------------------------------------------------------------------------
// InMemoryBillStore
// ---------------------------------------------------------------------------

impl InMemoryBillStore {
    /// Each room id may appear once.
    pub fn new(rooms: Vec<RoomBills>) -> RentBillingResult<Self> {
        let mut store = Self::default();
        for room in rooms {
            if store.rooms.contains_key(&room.room_id) {
                return Err(RentBillingError::InvalidInput {
                    field: "room_id".into(),
                    reason: format!("Duplicate room '{}'.", room.room_id),
                });
            }
            store.order.push(room.room_id.clone());
            store.rooms.insert(room.room_id.clone(), room);
        }
        Ok(store)
    }
}

impl BillStore for InMemoryBillStore {
    type Error = RentBillingError;

    fn bills_for_room(&self, room_id: &str) -> Result<Vec<BillRecord>, Self::Error> {
        self.rooms
            .get(room_id)
            .map(|r| r.bills.clone())
            .ok_or_else(|| RentBillingError::InvalidInput {
                field: "room_id".into(),
                reason: format!("Unknown room '{room_id}'."),
            })
    }

    fn occupied_rooms(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self
            .order
            .iter()
            .filter(|id| self.rooms.get(*id).is_some_and(|r| r.occupied))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Fleet-wide debt warnings over rooms supplied in full, wrapped in the
/// standard output envelope.
pub fn assess_fleet_debt(
    input: &FleetDebtInput,
) -> RentBillingResult<ComputationOutput<FleetDebtWarnings>> {
    let ledger = DebtLedger::new(InMemoryBillStore::new(input.rooms.clone())?);
    let flagged = ledger.fleet_debt_warnings().map_err(|e| match e {
        LedgerError::Store(e) | LedgerError::Engine(e) => e,
    })?;

    let occupied = input.rooms.iter().filter(|r| r.occupied).count();
    let assumptions = serde_json::json!({
        "rooms_supplied": input.rooms.len(),
        "occupied_rooms": occupied,
        "warning_streak": DEBT_WARNING_STREAK,
    });

    Ok(with_metadata(
        "Fleet debt warnings (occupied rooms, streak >= 2, longest first)",
        &assumptions,
        Vec::new(),
        flagged,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn flagged_by_streak(snapshots: Vec<RoomDebtSnapshot>) -> FleetDebtWarnings {
    let total = snapshots.len();
    let mut flagged: Vec<RoomDebtSnapshot> = snapshots
        .into_iter()
        .filter(|s| s.consecutive_months >= DEBT_WARNING_STREAK)
        .collect();
    flagged.sort_by(|a, b| b.consecutive_months.cmp(&a.consecutive_months));

    debug!(rooms = total, flagged = flagged.len(), "Fleet debt warnings computed");
    flagged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn unpaid(year: i32, month: u32) -> BillRecord {
        BillRecord {
            id: None,
            month,
            year,
            total_cost: dec!(2_500_000),
            is_paid: false,
            paid_amount: None,
        }
    }

    fn room(id: &str, occupied: bool, months: &[u32]) -> RoomBills {
        RoomBills {
            room_id: id.into(),
            occupied,
            bills: months.iter().map(|m| unpaid(2024, *m)).collect(),
        }
    }

    #[derive(Debug, Error)]
    #[error("bill store offline")]
    struct Offline;

    struct OfflineStore;

    impl BillStore for OfflineStore {
        type Error = Offline;

        fn bills_for_room(&self, _room_id: &str) -> Result<Vec<BillRecord>, Self::Error> {
            Err(Offline)
        }

        fn occupied_rooms(&self) -> Result<Vec<String>, Self::Error> {
            Err(Offline)
        }
    }

    #[test]
    fn test_fleet_sorted_by_streak_descending() {
        let store = InMemoryBillStore::new(vec![
            room("A", true, &[5, 6]),
            room("B", true, &[2, 3, 4, 5, 6]),
            room("C", true, &[6]),
            room("D", true, &[4, 5, 6]),
        ])
        .unwrap();
        let flagged = DebtLedger::new(store).fleet_debt_warnings().unwrap();
        let ids: Vec<&str> = flagged.iter().map(|s| s.room_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "D", "A"]);
    }

    #[test]
    fn test_vacant_rooms_excluded() {
        let store =
            InMemoryBillStore::new(vec![room("A", false, &[1, 2, 3]), room("B", true, &[1, 2])])
                .unwrap();
        let flagged = DebtLedger::new(store).fleet_debt_warnings().unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].room_id, "B");
    }

    #[test]
    fn test_equal_streaks_keep_store_order() {
        let store =
            InMemoryBillStore::new(vec![room("X", true, &[1, 2]), room("Y", true, &[7, 8])])
                .unwrap();
        let flagged = DebtLedger::new(store).fleet_debt_warnings().unwrap();
        let ids: Vec<&str> = flagged.iter().map(|s| s.room_id.as_str()).collect();
        assert_eq!(ids, vec!["X", "Y"]);
    }

    #[test]
    fn test_ledger_room_queries() {
        let store = InMemoryBillStore::new(vec![room("A", true, &[1, 2, 3])]).unwrap();
        let ledger = DebtLedger::new(store);
        assert_eq!(ledger.total_debt("A").unwrap(), dec!(7_500_000));
        assert_eq!(ledger.consecutive_unpaid_streak("A").unwrap(), 3);
        assert!(ledger.has_debt_warning("A").unwrap());
    }

    #[test]
    fn test_store_failure_propagates_unchanged() {
        let ledger = DebtLedger::new(OfflineStore);
        match ledger.fleet_debt_warnings().unwrap_err() {
            LedgerError::Store(Offline) => {}
            other => panic!("Expected Store error, got {other:?}"),
        }
        let err = ledger.total_debt("A").unwrap_err();
        assert_eq!(err.to_string(), "bill store offline");
    }

    #[test]
    fn test_unknown_room_is_store_error() {
        let ledger = DebtLedger::new(InMemoryBillStore::default());
        assert!(matches!(
            ledger.room_debt_snapshot("missing"),
            Err(LedgerError::Store(RentBillingError::InvalidInput { .. }))
        ));
    }

    #[test]
    fn test_assess_fleet_debt_envelope() {
        let input = FleetDebtInput {
            rooms: vec![room("A", true, &[3, 4]), room("B", true, &[4])],
        };
        let out = assess_fleet_debt(&input).unwrap();
        assert_eq!(out.result.len(), 1);
        assert_eq!(out.assumptions["occupied_rooms"], 2);
    }

    #[test]
    fn test_duplicate_room_ids_rejected() {
        let rooms = vec![room("A", true, &[1, 2]), room("A", true, &[3, 4])];
        match InMemoryBillStore::new(rooms.clone()).unwrap_err() {
            RentBillingError::InvalidInput { field, reason } => {
                assert_eq!(field, "room_id");
                assert!(reason.contains("Duplicate room 'A'"));
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        assert!(assess_fleet_debt(&FleetDebtInput { rooms }).is_err());
    }
}
