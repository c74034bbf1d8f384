//! Inventory reconciliation service
//!
//! Keeps `products.quantity` consistent with the net effect of every
//! purchase and sell record. Each operation runs in a single transaction:
//! the trade record, the product counter, and the movement trail either all
//! change or none do. Quantity changes are expressed as atomic SQL
//! increments so concurrent reconciliations never lose updates.
//!
//! Deltas are always computed as `new - old`, which keeps the trail and the
//! counter consistent under partial-field updates. Sells are guarded
//! against driving stock negative; purchase-side updates are not (a
//! purchase decrease paired with sells elsewhere may leave stock negative,
//! which matches the recorded history).

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use shared::models::{MovementKind, Purchase, Sell, StockMovement};
use shared::validation::validate_quantity;

use crate::error::{AppError, AppResult};
use crate::services::ListParams;

/// Delta applied to a product when a trade record's quantity changes.
pub fn quantity_delta(old: i64, new: i64) -> i64 {
    new - old
}

/// Reconciliation service for purchase/sell lifecycle
#[derive(Clone)]
pub struct ReconciliationService {
    db: PgPool,
}

/// Input for recording a purchase
#[derive(Debug, Deserialize)]
pub struct RecordPurchaseInput {
    pub product_id: Uuid,
    pub firm_id: Option<Uuid>,
    pub buyer_id: Option<Uuid>,
    pub quantity: i64,
    pub purchase_price: Decimal,
}

/// Partial-field update for a purchase
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseInput {
    pub quantity: Option<i64>,
    pub purchase_price: Option<Decimal>,
    pub buyer_id: Option<Uuid>,
}

/// Input for recording a sell
#[derive(Debug, Deserialize)]
pub struct RecordSellInput {
    pub product_id: Uuid,
    pub seller_id: Option<Uuid>,
    pub quantity: i64,
    pub sell_price: Decimal,
}

/// Partial-field update for a sell
#[derive(Debug, Deserialize)]
pub struct UpdateSellInput {
    pub quantity: Option<i64>,
    pub sell_price: Option<Decimal>,
    pub seller_id: Option<Uuid>,
}

const PURCHASE_COLUMNS: &str =
    "id, product_id, firm_id, buyer_id, recorded_by, quantity, purchase_price, created_at, updated_at";
const SELL_COLUMNS: &str =
    "id, product_id, seller_id, recorded_by, quantity, sell_price, created_at, updated_at";

impl ReconciliationService {
    /// Create a new ReconciliationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------
    // Purchases
    // ------------------------------------------------------------------

    /// Record a purchase: create the record, add its quantity to the
    /// product's stock, and append a history entry. No upper bound check.
    pub async fn record_purchase(
        &self,
        recorded_by: Uuid,
        buyer_id: Uuid,
        input: RecordPurchaseInput,
    ) -> AppResult<Purchase> {
        validate_quantity(input.quantity)
            .map_err(|msg| AppError::validation("quantity", msg))?;
        if input.purchase_price < Decimal::ZERO {
            return Err(AppError::validation(
                "purchase_price",
                "Price must not be negative",
            ));
        }

        let mut tx = self.db.begin().await?;

        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE products SET quantity = quantity + $2, updated_at = NOW() WHERE id = $1 RETURNING quantity",
        )
        .bind(input.product_id)
        .bind(input.quantity)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            "INSERT INTO purchases (product_id, firm_id, buyer_id, recorded_by, quantity, purchase_price) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PURCHASE_COLUMNS}",
        ))
        .bind(input.product_id)
        .bind(input.firm_id)
        .bind(buyer_id)
        .bind(recorded_by)
        .bind(input.quantity)
        .bind(input.purchase_price)
        .fetch_one(&mut *tx)
        .await?;

        append_movement(
            &mut tx,
            input.product_id,
            MovementKind::Purchase,
            input.firm_id,
            input.purchase_price,
            input.quantity,
        )
        .await?;

        tx.commit().await?;
        Ok(purchase)
    }

    /// Update a purchase's quantity/price/buyer and apply the quantity
    /// delta (`new - old`) to the product. The delta is unguarded: a
    /// quantity decrease can drive stock negative when paired with sells.
    pub async fn update_purchase(
        &self,
        purchase_id: Uuid,
        buyer_id: Option<Uuid>,
        input: UpdatePurchaseInput,
    ) -> AppResult<Purchase> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = $1 FOR UPDATE",
        ))
        .bind(purchase_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let new_quantity = input.quantity.unwrap_or(existing.quantity);
        validate_quantity(new_quantity)
            .map_err(|msg| AppError::validation("quantity", msg))?;
        let new_price = input.purchase_price.unwrap_or(existing.purchase_price);
        let new_buyer = buyer_id.unwrap_or(existing.buyer_id);

        let purchase = sqlx::query_as::<_, Purchase>(&format!(
            "UPDATE purchases SET quantity = $2, purchase_price = $3, buyer_id = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {PURCHASE_COLUMNS}",
        ))
        .bind(purchase_id)
        .bind(new_quantity)
        .bind(new_price)
        .bind(new_buyer)
        .fetch_one(&mut *tx)
        .await?;

        let delta = quantity_delta(existing.quantity, new_quantity);
        if delta != 0 {
            let updated = sqlx::query_scalar::<_, i64>(
                "UPDATE products SET quantity = quantity + $2, updated_at = NOW() WHERE id = $1 RETURNING quantity",
            )
            .bind(existing.product_id)
            .bind(delta)
            .fetch_optional(&mut *tx)
            .await?;

            if updated.is_none() {
                return Err(AppError::NotFound("Product".to_string()));
            }

            append_movement(
                &mut tx,
                existing.product_id,
                MovementKind::Purchase,
                existing.firm_id,
                new_price,
                delta,
            )
            .await?;
        }

        tx.commit().await?;
        Ok(purchase)
    }

    /// Delete a purchase and subtract its quantity from the product's
    /// stock, appending a compensating negative-quantity history entry.
    pub async fn delete_purchase(&self, purchase_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = $1 FOR UPDATE",
        ))
        .bind(purchase_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))?;

        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE products SET quantity = quantity - $2, updated_at = NOW() WHERE id = $1 RETURNING quantity",
        )
        .bind(existing.product_id)
        .bind(existing.quantity)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound("Product".to_string()));
        }

        append_movement(
            &mut tx,
            existing.product_id,
            MovementKind::Purchase,
            existing.firm_id,
            existing.purchase_price,
            -existing.quantity,
        )
        .await?;

        sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(purchase_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get a single purchase
    pub async fn get_purchase(&self, purchase_id: Uuid) -> AppResult<Purchase> {
        sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases WHERE id = $1",
        ))
        .bind(purchase_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase".to_string()))
    }

    /// List purchases, optionally scoped to records owned by one user
    /// (as buyer or as the recording user).
    pub async fn list_purchases(
        &self,
        scope: Option<Uuid>,
        params: &ListParams,
    ) -> AppResult<Vec<Purchase>> {
        let (limit, offset) = params.limit_offset();
        let purchases = sqlx::query_as::<_, Purchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM purchases \
             WHERE ($1::uuid IS NULL OR buyer_id = $1 OR recorded_by = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        ))
        .bind(scope)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(purchases)
    }

    // ------------------------------------------------------------------
    // Sells
    // ------------------------------------------------------------------

    /// Record a sell: create the record, subtract its quantity from the
    /// product's stock, and append a history entry. Fails with
    /// `InsufficientStock` before anything mutates when stock is short.
    pub async fn record_sell(
        &self,
        recorded_by: Uuid,
        seller_id: Uuid,
        input: RecordSellInput,
    ) -> AppResult<Sell> {
        validate_quantity(input.quantity)
            .map_err(|msg| AppError::validation("quantity", msg))?;
        if input.sell_price < Decimal::ZERO {
            return Err(AppError::validation(
                "sell_price",
                "Price must not be negative",
            ));
        }

        let mut tx = self.db.begin().await?;

        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE products SET quantity = quantity - $2, updated_at = NOW() \
             WHERE id = $1 AND quantity >= $2 RETURNING quantity",
        )
        .bind(input.product_id)
        .bind(input.quantity)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            let available = self
                .available_quantity(&mut tx, input.product_id)
                .await?;
            return Err(AppError::InsufficientStock { available });
        }

        let sell = sqlx::query_as::<_, Sell>(&format!(
            "INSERT INTO sells (product_id, seller_id, recorded_by, quantity, sell_price) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {SELL_COLUMNS}",
        ))
        .bind(input.product_id)
        .bind(seller_id)
        .bind(recorded_by)
        .bind(input.quantity)
        .bind(input.sell_price)
        .fetch_one(&mut *tx)
        .await?;

        append_movement(
            &mut tx,
            input.product_id,
            MovementKind::Sell,
            Some(seller_id),
            input.sell_price,
            input.quantity,
        )
        .await?;

        tx.commit().await?;
        Ok(sell)
    }

    /// Update a sell; a quantity increase is guarded against insufficient
    /// stock, a decrease returns stock to the product.
    pub async fn update_sell(
        &self,
        sell_id: Uuid,
        seller_id: Option<Uuid>,
        input: UpdateSellInput,
    ) -> AppResult<Sell> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Sell>(&format!(
            "SELECT {SELL_COLUMNS} FROM sells WHERE id = $1 FOR UPDATE",
        ))
        .bind(sell_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Sell".to_string()))?;

        let new_quantity = input.quantity.unwrap_or(existing.quantity);
        validate_quantity(new_quantity)
            .map_err(|msg| AppError::validation("quantity", msg))?;
        let new_price = input.sell_price.unwrap_or(existing.sell_price);
        let new_seller = seller_id.unwrap_or(existing.seller_id);

        let delta = quantity_delta(existing.quantity, new_quantity);
        if delta != 0 {
            let updated = if delta > 0 {
                sqlx::query_scalar::<_, i64>(
                    "UPDATE products SET quantity = quantity - $2, updated_at = NOW() \
                     WHERE id = $1 AND quantity >= $2 RETURNING quantity",
                )
                .bind(existing.product_id)
                .bind(delta)
                .fetch_optional(&mut *tx)
                .await?
            } else {
                sqlx::query_scalar::<_, i64>(
                    "UPDATE products SET quantity = quantity + $2, updated_at = NOW() \
                     WHERE id = $1 RETURNING quantity",
                )
                .bind(existing.product_id)
                .bind(-delta)
                .fetch_optional(&mut *tx)
                .await?
            };

            if updated.is_none() {
                if delta > 0 {
                    let available = self
                        .available_quantity(&mut tx, existing.product_id)
                        .await?;
                    return Err(AppError::InsufficientStock { available });
                }
                return Err(AppError::NotFound("Product".to_string()));
            }

            append_movement(
                &mut tx,
                existing.product_id,
                MovementKind::Sell,
                Some(new_seller),
                new_price,
                delta,
            )
            .await?;
        }

        let sell = sqlx::query_as::<_, Sell>(&format!(
            "UPDATE sells SET quantity = $2, sell_price = $3, seller_id = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {SELL_COLUMNS}",
        ))
        .bind(sell_id)
        .bind(new_quantity)
        .bind(new_price)
        .bind(new_seller)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(sell)
    }

    /// Delete a sell and return its quantity to the product's stock,
    /// appending a compensating negative-quantity sell entry.
    pub async fn delete_sell(&self, sell_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let existing = sqlx::query_as::<_, Sell>(&format!(
            "SELECT {SELL_COLUMNS} FROM sells WHERE id = $1 FOR UPDATE",
        ))
        .bind(sell_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Sell".to_string()))?;

        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE products SET quantity = quantity + $2, updated_at = NOW() WHERE id = $1 RETURNING quantity",
        )
        .bind(existing.product_id)
        .bind(existing.quantity)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound("Product".to_string()));
        }

        append_movement(
            &mut tx,
            existing.product_id,
            MovementKind::Sell,
            Some(existing.seller_id),
            existing.sell_price,
            -existing.quantity,
        )
        .await?;

        sqlx::query("DELETE FROM sells WHERE id = $1")
            .bind(sell_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get a single sell
    pub async fn get_sell(&self, sell_id: Uuid) -> AppResult<Sell> {
        sqlx::query_as::<_, Sell>(&format!(
            "SELECT {SELL_COLUMNS} FROM sells WHERE id = $1",
        ))
        .bind(sell_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sell".to_string()))
    }

    /// List sells, optionally scoped to records owned by one user
    /// (as seller or as the recording user).
    pub async fn list_sells(
        &self,
        scope: Option<Uuid>,
        params: &ListParams,
    ) -> AppResult<Vec<Sell>> {
        let (limit, offset) = params.limit_offset();
        let sells = sqlx::query_as::<_, Sell>(&format!(
            "SELECT {SELL_COLUMNS} FROM sells \
             WHERE ($1::uuid IS NULL OR seller_id = $1 OR recorded_by = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        ))
        .bind(scope)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(sells)
    }

    // ------------------------------------------------------------------
    // Movement trail
    // ------------------------------------------------------------------

    /// Full movement history for a product, oldest first.
    pub async fn product_history(&self, product_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT id, product_id, kind, counterparty_id, unit_price, quantity, recorded_at \
             FROM stock_movements WHERE product_id = $1 ORDER BY recorded_at ASC, id ASC",
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;
        Ok(movements)
    }

    /// Current quantity of a product, or `NotFound`.
    async fn available_quantity(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: Uuid,
    ) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT quantity FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }
}

/// Append an entry to the product's movement trail.
async fn append_movement(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: Uuid,
    kind: MovementKind,
    counterparty_id: Option<Uuid>,
    unit_price: Decimal,
    quantity: i64,
) -> AppResult<()> {
    let conn: &mut PgConnection = &mut *tx;
    sqlx::query(
        "INSERT INTO stock_movements (product_id, kind, counterparty_id, unit_price, quantity) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(product_id)
    .bind(kind)
    .bind(counterparty_id)
    .bind(unit_price)
    .bind(quantity)
    .execute(conn)
    .await?;
    Ok(())
}
