//! Purchase and sell records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stock purchase from a vendor firm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: Uuid,
    pub product_id: Uuid,
    pub firm_id: Option<Uuid>,
    pub buyer_id: Uuid,
    pub recorded_by: Uuid,
    pub quantity: i64,
    pub purchase_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    /// Total amount paid. Derived, never stored: always unit price times
    /// quantity.
    pub fn amount(&self) -> Decimal {
        self.purchase_price * Decimal::from(self.quantity)
    }
}

/// A stock sale to a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sell {
    pub id: Uuid,
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub recorded_by: Uuid,
    pub quantity: i64,
    pub sell_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sell {
    /// Total amount charged. Derived, never stored.
    pub fn amount(&self) -> Decimal {
        self.sell_price * Decimal::from(self.quantity)
    }
}
