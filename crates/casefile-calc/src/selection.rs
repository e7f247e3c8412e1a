//! Selection-Order Bookkeeping
//!
//! A stage may shortlist up to three records by assigning each a selection
//! order in 1..=3. On select, the lowest free order is taken; when the board
//! is full the selection is rejected and the caller reverts the flag. On
//! deselect the order is cleared unconditionally and becomes reusable.
//!
//! The board is rebuilt from the loaded records, so the invariant it keeps
//! is client-side only: two near-simultaneous sessions can still collide at
//! the storage layer. That race is a property of the storage design, not
//! resolved here.

use casefile_types::{Record, RecordId};
use serde_json::Value;
use std::collections::BTreeMap;

/// Maximum number of simultaneously selected records per stage.
pub const SELECTION_CAPACITY: u8 = 3;

/// Field names on a selectable record.
pub const FIELD_SELECTED: &str = "seleccionado";
pub const FIELD_SELECTION_ORDER: &str = "orden_seleccion";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SelectionError {
    /// All orders in 1..=3 are occupied; the selection flag must revert.
    #[error("All {SELECTION_CAPACITY} selection slots are occupied")]
    BoardFull,
}

/// Occupied selection orders for one stage's records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionBoard {
    orders: BTreeMap<RecordId, u8>,
}

impl SelectionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the board from loaded records, reading the selection fields.
    /// Records without a persisted id cannot hold an order and are ignored.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Self {
        let mut board = Self::new();
        for record in records {
            if let (Some(id), Some(order)) = (record.id, selection_order(record)) {
                board.orders.insert(id, order);
            }
        }
        board
    }

    /// Assign the lowest free order to `record_id`. Re-selecting a record
    /// that already holds an order keeps its order. Returns the assigned
    /// order, or `BoardFull` when every slot in 1..=3 is taken — the caller
    /// then reverts the selection flag with no order assigned.
    pub fn select(&mut self, record_id: RecordId) -> Result<u8, SelectionError> {
        if let Some(&order) = self.orders.get(&record_id) {
            return Ok(order);
        }
        let order = self.lowest_free().ok_or(SelectionError::BoardFull)?;
        self.orders.insert(record_id, order);
        tracing::debug!(record_id, order, "selection order assigned");
        Ok(order)
    }

    /// Clear the record's order unconditionally; the slot becomes free.
    pub fn deselect(&mut self, record_id: RecordId) -> Option<u8> {
        self.orders.remove(&record_id)
    }

    pub fn order_of(&self, record_id: RecordId) -> Option<u8> {
        self.orders.get(&record_id).copied()
    }

    /// Occupied orders, ascending. Always a duplicate-free subset of 1..=3.
    pub fn occupied(&self) -> Vec<u8> {
        let mut orders: Vec<u8> = self.orders.values().copied().collect();
        orders.sort_unstable();
        orders
    }

    pub fn is_full(&self) -> bool {
        self.orders.len() as u8 >= SELECTION_CAPACITY
    }

    fn lowest_free(&self) -> Option<u8> {
        (1..=SELECTION_CAPACITY).find(|order| !self.orders.values().any(|o| o == order))
    }
}

/// Read the persisted selection order off a record, if any.
pub fn selection_order(record: &Record) -> Option<u8> {
    record
        .get_i64(FIELD_SELECTION_ORDER)
        .and_then(|order| u8::try_from(order).ok())
        .filter(|order| (1..=SELECTION_CAPACITY).contains(order))
}

/// Write the selection flag and order back onto a record before upsert.
pub fn apply_selection(record: &mut Record, order: Option<u8>) {
    record.set(FIELD_SELECTED, order.is_some());
    match order {
        Some(order) => record.set(FIELD_SELECTION_ORDER, i64::from(order)),
        None => record.set(FIELD_SELECTION_ORDER, Value::Null),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected_record(id: RecordId, order: u8) -> Record {
        let mut record = Record::draft();
        record.id = Some(id);
        apply_selection(&mut record, Some(order));
        record
    }

    #[test]
    fn test_lowest_free_order_assigned() {
        let mut board = SelectionBoard::new();
        assert_eq!(board.select(10), Ok(1));
        assert_eq!(board.select(20), Ok(2));
        assert_eq!(board.select(30), Ok(3));
        assert_eq!(board.occupied(), vec![1, 2, 3]);
    }

    #[test]
    fn test_fourth_selection_rejected() {
        // End-to-end scenario D: three records hold {1,2,3}; a fourth is
        // rejected with no order assigned.
        let records: Vec<Record> = (1..=3).map(|i| selected_record(i, i as u8)).collect();
        let mut board = SelectionBoard::from_records(&records);

        assert_eq!(board.select(4), Err(SelectionError::BoardFull));
        assert_eq!(board.order_of(4), None);
        assert_eq!(board.occupied(), vec![1, 2, 3]);
    }

    #[test]
    fn test_deselect_frees_slot_for_reuse() {
        let mut board = SelectionBoard::new();
        board.select(10).unwrap();
        board.select(20).unwrap();
        board.select(30).unwrap();

        assert_eq!(board.deselect(20), Some(2));
        // The freed middle slot is the lowest available again.
        assert_eq!(board.select(40), Ok(2));
        assert_eq!(board.occupied(), vec![1, 2, 3]);
    }

    #[test]
    fn test_reselect_keeps_existing_order() {
        let mut board = SelectionBoard::new();
        board.select(10).unwrap();
        board.select(20).unwrap();
        assert_eq!(board.select(10), Ok(1));
        assert_eq!(board.occupied(), vec![1, 2]);
    }

    #[test]
    fn test_invariant_under_mixed_sequence() {
        let mut board = SelectionBoard::new();
        let ops: [(RecordId, bool); 10] = [
            (1, true),
            (2, true),
            (1, false),
            (3, true),
            (4, true),
            (5, true), // board full here
            (2, false),
            (5, true),
            (6, true),
            (3, false),
        ];
        for (id, select) in ops {
            if select {
                let _ = board.select(id);
            } else {
                board.deselect(id);
            }
            let occupied = board.occupied();
            let mut deduped = occupied.clone();
            deduped.dedup();
            assert_eq!(occupied, deduped, "duplicate order after op on {id}");
            assert!(occupied.iter().all(|o| (1..=SELECTION_CAPACITY).contains(o)));
        }
    }

    #[test]
    fn test_board_from_records_ignores_drafts_and_bad_orders() {
        let mut draft = Record::draft();
        apply_selection(&mut draft, Some(1));

        let mut out_of_range = Record::draft();
        out_of_range.id = Some(9);
        out_of_range.set(FIELD_SELECTION_ORDER, 7);

        let board = SelectionBoard::from_records([&draft, &out_of_range]);
        assert!(board.occupied().is_empty());
    }

    #[test]
    fn test_apply_selection_writes_fields() {
        let mut record = Record::draft();
        apply_selection(&mut record, Some(2));
        assert_eq!(record.get_bool(FIELD_SELECTED), Some(true));
        assert_eq!(record.get_i64(FIELD_SELECTION_ORDER), Some(2));

        apply_selection(&mut record, None);
        assert_eq!(record.get_bool(FIELD_SELECTED), Some(false));
        assert_eq!(record.get(FIELD_SELECTION_ORDER), Some(&Value::Null));
    }
}
