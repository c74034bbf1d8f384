//! Inventory reconciliation tests
//!
//! A small in-memory ledger models the reconciliation rules: purchases add
//! stock, sells subtract it behind a guard, updates apply the difference
//! between old and new quantities, deletes reverse the original effect.
//! Every mutation appends a signed movement entry, so stock must always
//! equal opening count plus the signed movement sum.

use proptest::prelude::*;

/// Minimal model of one product's stock ledger
#[derive(Debug, Default)]
struct Ledger {
    stock: i64,
    movements: Vec<i64>, // signed: purchases positive, sells negative
}

impl Ledger {
    fn with_opening(stock: i64) -> Self {
        Self {
            stock,
            movements: Vec::new(),
        }
    }

    fn record_purchase(&mut self, quantity: i64) {
        self.stock += quantity;
        self.movements.push(quantity);
    }

    fn record_sell(&mut self, quantity: i64) -> Result<(), i64> {
        if self.stock < quantity {
            return Err(self.stock);
        }
        self.stock -= quantity;
        self.movements.push(-quantity);
        Ok(())
    }

    fn update_purchase(&mut self, old: i64, new: i64) {
        let delta = new - old;
        if delta != 0 {
            self.stock += delta;
            self.movements.push(delta);
        }
    }

    fn update_sell(&mut self, old: i64, new: i64) -> Result<(), i64> {
        let delta = new - old;
        if delta > 0 && self.stock < delta {
            return Err(self.stock);
        }
        if delta != 0 {
            self.stock -= delta;
            self.movements.push(-delta);
        }
        Ok(())
    }

    fn delete_purchase(&mut self, quantity: i64) {
        self.stock -= quantity;
        self.movements.push(-quantity);
    }

    fn delete_sell(&mut self, quantity: i64) {
        self.stock += quantity;
        self.movements.push(quantity);
    }

    fn movement_sum(&self) -> i64 {
        self.movements.iter().sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_purchase_adds_stock() {
        let mut ledger = Ledger::with_opening(0);
        ledger.record_purchase(10);
        assert_eq!(ledger.stock, 10);
        ledger.record_purchase(5);
        assert_eq!(ledger.stock, 15);
    }

    #[test]
    fn test_sell_subtracts_stock() {
        let mut ledger = Ledger::with_opening(10);
        assert!(ledger.record_sell(4).is_ok());
        assert_eq!(ledger.stock, 6);
    }

    #[test]
    fn test_oversell_rejected_without_mutation() {
        let mut ledger = Ledger::with_opening(3);
        let result = ledger.record_sell(5);
        // Rejection reports the available quantity and changes nothing
        assert_eq!(result, Err(3));
        assert_eq!(ledger.stock, 3);
        assert!(ledger.movements.is_empty());
    }

    #[test]
    fn test_exact_stock_sell_allowed() {
        let mut ledger = Ledger::with_opening(5);
        assert!(ledger.record_sell(5).is_ok());
        assert_eq!(ledger.stock, 0);
    }

    #[test]
    fn test_purchase_update_applies_difference() {
        let mut ledger = Ledger::with_opening(0);
        ledger.record_purchase(10);
        // Correcting 10 to 7 removes 3, not 7
        ledger.update_purchase(10, 7);
        assert_eq!(ledger.stock, 7);
    }

    #[test]
    fn test_sell_update_increase_is_guarded() {
        let mut ledger = Ledger::with_opening(10);
        ledger.record_sell(8).unwrap();
        // Raising the sell from 8 to 15 needs 7 more units but only 2 remain
        assert_eq!(ledger.update_sell(8, 15), Err(2));
        assert_eq!(ledger.stock, 2);
    }

    #[test]
    fn test_sell_update_decrease_returns_stock() {
        let mut ledger = Ledger::with_opening(10);
        ledger.record_sell(8).unwrap();
        ledger.update_sell(8, 3).unwrap();
        assert_eq!(ledger.stock, 7);
    }

    #[test]
    fn test_unchanged_update_adds_no_movement() {
        let mut ledger = Ledger::with_opening(10);
        ledger.record_purchase(5);
        let before = ledger.movements.len();
        ledger.update_purchase(5, 5);
        assert_eq!(ledger.movements.len(), before);
    }

    #[test]
    fn test_delete_purchase_reverses_effect() {
        let mut ledger = Ledger::with_opening(0);
        ledger.record_purchase(10);
        ledger.delete_purchase(10);
        assert_eq!(ledger.stock, 0);
        // The reversal is a new entry, not an erased one
        assert_eq!(ledger.movements, vec![10, -10]);
    }

    #[test]
    fn test_delete_sell_reverses_effect() {
        let mut ledger = Ledger::with_opening(10);
        ledger.record_sell(4).unwrap();
        ledger.delete_sell(4);
        assert_eq!(ledger.stock, 10);
        assert_eq!(ledger.movements, vec![-4, 4]);
    }

    #[test]
    fn test_stock_equals_opening_plus_movement_sum() {
        let mut ledger = Ledger::with_opening(20);
        ledger.record_purchase(10);
        ledger.record_sell(12).unwrap();
        ledger.update_purchase(10, 15);
        ledger.update_sell(12, 9).unwrap();
        ledger.delete_purchase(15);
        assert_eq!(ledger.stock, 20 + ledger.movement_sum());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Purchase(i64),
    Sell(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..=100).prop_map(Op::Purchase),
        (1i64..=100).prop_map(Op::Sell),
    ]
}

proptest! {
    /// Stock is always opening plus signed movement sum, and never negative.
    #[test]
    fn prop_ledger_consistency(
        opening in 0i64..=500,
        ops in proptest::collection::vec(op_strategy(), 0..50),
    ) {
        let mut ledger = Ledger::with_opening(opening);
        for op in ops {
            match op {
                Op::Purchase(q) => ledger.record_purchase(q),
                Op::Sell(q) => {
                    let _ = ledger.record_sell(q);
                }
            }
            prop_assert!(ledger.stock >= 0);
            prop_assert_eq!(ledger.stock, opening + ledger.movement_sum());
        }
    }

    /// A rejected sell leaves the ledger untouched.
    #[test]
    fn prop_rejected_sell_is_noop(opening in 0i64..=50, extra in 1i64..=100) {
        let mut ledger = Ledger::with_opening(opening);
        let before = ledger.movement_sum();
        prop_assert_eq!(ledger.record_sell(opening + extra), Err(opening));
        prop_assert_eq!(ledger.stock, opening);
        prop_assert_eq!(ledger.movement_sum(), before);
    }

    /// Updating a purchase and then reverting the update restores stock.
    #[test]
    fn prop_purchase_update_round_trip(
        opening in 0i64..=100,
        original in 1i64..=100,
        revised in 1i64..=100,
    ) {
        let mut ledger = Ledger::with_opening(opening);
        ledger.record_purchase(original);
        let applied = ledger.stock;
        ledger.update_purchase(original, revised);
        ledger.update_purchase(revised, original);
        prop_assert_eq!(ledger.stock, applied);
    }

    /// Record-then-delete is stock-neutral for both trade kinds.
    #[test]
    fn prop_record_delete_neutral(opening in 0i64..=200, quantity in 1i64..=100) {
        let mut ledger = Ledger::with_opening(opening);
        ledger.record_purchase(quantity);
        ledger.delete_purchase(quantity);
        prop_assert_eq!(ledger.stock, opening);

        if opening >= quantity {
            let mut ledger = Ledger::with_opening(opening);
            ledger.record_sell(quantity).unwrap();
            ledger.delete_sell(quantity);
            prop_assert_eq!(ledger.stock, opening);
        }
    }
}
