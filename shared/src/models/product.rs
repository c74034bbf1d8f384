//! Product and stock movement models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product tracked in inventory.
///
/// `quantity` is the current stock count and is mutated only by the
/// reconciliation service; everything else is ordinary record data.
/// `category_name` is a denormalized fallback kept for records imported
/// without a proper category reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub price: Decimal,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "movement_kind", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Purchase,
    Sell,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Purchase => "purchase",
            MovementKind::Sell => "sell",
        }
    }
}

/// Append-only audit entry recorded whenever a purchase or sell touches a
/// product. Compensating entries written on update/delete carry a signed
/// `quantity`; a reversal is a negative-quantity row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub kind: MovementKind,
    pub counterparty_id: Option<Uuid>,
    pub unit_price: Decimal,
    pub quantity: i64,
    pub recorded_at: DateTime<Utc>,
}
