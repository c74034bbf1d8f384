//! Analytics computation tests
//!
//! The analytics layer is pure arithmetic over trade records; these tests
//! pin down the money math on the shared models: derived amounts, the two
//! profit definitions, weighted cost averaging, and the cost fallback.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{Purchase, Sell};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn purchase(quantity: i64, price: &str) -> Purchase {
    Purchase {
        id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        firm_id: None,
        buyer_id: Uuid::new_v4(),
        recorded_by: Uuid::new_v4(),
        quantity,
        purchase_price: dec(price),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sell(quantity: i64, price: &str) -> Sell {
    Sell {
        id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        seller_id: Uuid::new_v4(),
        recorded_by: Uuid::new_v4(),
        quantity,
        sell_price: dec(price),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_cash_flow_profit() {
        // Buy 10 at 60, sell 4 at 100
        let spent: Decimal = [purchase(10, "60.00")].iter().map(Purchase::amount).sum();
        let gained: Decimal = [sell(4, "100.00")].iter().map(Sell::amount).sum();
        assert_eq!(spent, dec("600.00"));
        assert_eq!(gained, dec("400.00"));
        // Cash flow is negative while unsold stock sits in inventory
        assert_eq!(gained - spent, dec("-200.00"));
    }

    #[test]
    fn test_margin_profit() {
        // Same trades by margin: (100 - 60) * 4 sold units
        let cost = dec("60.00");
        let s = sell(4, "100.00");
        let margin = (s.sell_price - cost) * Decimal::from(s.quantity);
        assert_eq!(margin, dec("160.00"));
    }

    #[test]
    fn test_weighted_average_cost() {
        // 10 units at 60 plus 30 units at 80: 3000 / 40 = 75
        let purchases = [purchase(10, "60.00"), purchase(30, "80.00")];
        let total: Decimal = purchases.iter().map(Purchase::amount).sum();
        let quantity: i64 = purchases.iter().map(|p| p.quantity).sum();
        assert_eq!(total / Decimal::from(quantity), dec("75.00"));
    }

    #[test]
    fn test_assumed_cost_fallback() {
        // No purchase history: cost is price times the configured ratio
        let price = dec("100.00");
        assert_eq!(price * dec("0.75"), dec("75.00"));
        assert_eq!(price * dec("0.50"), dec("50.00"));
    }

    #[test]
    fn test_descending_rank_with_stable_ties() {
        let mut totals = vec![
            ("first".to_string(), dec("40.00")),
            ("second".to_string(), dec("90.00")),
            ("third".to_string(), dec("40.00")),
        ];
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        assert_eq!(totals[0].0, "second");
        // Equal totals keep their original relative order
        assert_eq!(totals[1].0, "first");
        assert_eq!(totals[2].0, "third");
    }

    #[test]
    fn test_decimal_amounts_are_exact() {
        // 3 units at 0.10 must be exactly 0.30
        assert_eq!(sell(3, "0.10").amount(), dec("0.30"));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// A derived amount is always unit price times quantity.
    #[test]
    fn prop_amount_is_price_times_quantity(quantity in 1i64..=10_000, cents in 0u32..=1_000_000) {
        let price = Decimal::new(cents as i64, 2);
        let p = purchase(quantity, &price.to_string());
        prop_assert_eq!(p.amount(), price * Decimal::from(quantity));
    }

    /// Cash-flow profit of a merged history equals the sum over any split
    /// of that history.
    #[test]
    fn prop_profit_is_additive(
        spends in proptest::collection::vec((1i64..=100, 0u32..=10_000), 0..20),
        gains in proptest::collection::vec((1i64..=100, 0u32..=10_000), 0..20),
        cut in 0usize..20,
    ) {
        let purchases: Vec<Purchase> = spends
            .iter()
            .map(|(q, cents)| purchase(*q, &Decimal::new(*cents as i64, 2).to_string()))
            .collect();
        let sells: Vec<Sell> = gains
            .iter()
            .map(|(q, cents)| sell(*q, &Decimal::new(*cents as i64, 2).to_string()))
            .collect();

        let profit_of = |purchases: &[Purchase], sells: &[Sell]| -> Decimal {
            sells.iter().map(Sell::amount).sum::<Decimal>()
                - purchases.iter().map(Purchase::amount).sum::<Decimal>()
        };

        let p_cut = cut.min(purchases.len());
        let s_cut = cut.min(sells.len());
        let whole = profit_of(&purchases, &sells);
        let parts = profit_of(&purchases[..p_cut], &sells[..s_cut])
            + profit_of(&purchases[p_cut..], &sells[s_cut..]);
        prop_assert_eq!(whole, parts);
    }

    /// Ranking never invents or drops totals, whatever the tie structure.
    #[test]
    fn prop_rank_preserves_entries(totals in proptest::collection::vec(0i64..=1000, 0..30)) {
        let mut entries: Vec<(usize, i64)> = totals.iter().copied().enumerate().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        prop_assert_eq!(entries.len(), totals.len());
        let mut sum_before: i64 = totals.iter().sum();
        for (_, t) in &entries {
            sum_before -= t;
        }
        prop_assert_eq!(sum_before, 0);
        // Descending order holds across the whole ranking
        for pair in entries.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
    }
}
