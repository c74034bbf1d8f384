//! Product catalog service
//!
//! CRUD for products. `quantity` is owned by the reconciliation service and
//! is never writable through an update here; the only direct write is the
//! opening stock count at creation time.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::Product;
use shared::validation::validate_entity_name;

use crate::error::{AppError, AppResult};
use crate::services::ListParams;

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub name: String,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub price: Decimal,
    /// Opening stock count; defaults to zero.
    pub initial_quantity: Option<i64>,
}

/// Partial-field update for a product. Quantity is deliberately absent.
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub price: Option<Decimal>,
}

const PRODUCT_COLUMNS: &str =
    "id, name, category_id, brand_id, category_name, price, quantity, created_at, updated_at";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product with an optional opening stock count.
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_entity_name(&input.name).map_err(|msg| AppError::validation("name", msg))?;
        let name = input.name.trim().to_string();
        if input.price < Decimal::ZERO {
            return Err(AppError::validation("price", "Price must not be negative"));
        }
        let initial_quantity = input.initial_quantity.unwrap_or(0);
        if initial_quantity < 0 {
            return Err(AppError::validation(
                "initial_quantity",
                "Opening stock must not be negative",
            ));
        }

        self.check_category(input.category_id).await?;
        self.check_brand(input.brand_id).await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, category_id, brand_id, price, quantity) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PRODUCT_COLUMNS}",
        ))
        .bind(&name)
        .bind(input.category_id)
        .bind(input.brand_id)
        .bind(input.price)
        .bind(initial_quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Update record fields. Stock quantity can only change through the
    /// reconciliation service.
    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        let existing = self.get(product_id).await?;

        let name = match input.name {
            Some(name) => {
                validate_entity_name(&name).map_err(|msg| AppError::validation("name", msg))?;
                name.trim().to_string()
            }
            None => existing.name,
        };
        let price = input.price.unwrap_or(existing.price);
        if price < Decimal::ZERO {
            return Err(AppError::validation("price", "Price must not be negative"));
        }
        let category_id = input.category_id.or(existing.category_id);
        let brand_id = input.brand_id.or(existing.brand_id);

        self.check_category(category_id).await?;
        self.check_brand(brand_id).await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET name = $2, category_id = $3, brand_id = $4, price = $5, updated_at = NOW() \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}",
        ))
        .bind(product_id)
        .bind(&name)
        .bind(category_id)
        .bind(brand_id)
        .bind(price)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Delete a product. Purchase and sell history referencing it is kept
    /// and shows up under sentinel names in analytics.
    pub async fn delete(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }

    /// Get a single product
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1",
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// List products with optional name search and category/brand filters.
    pub async fn list(&self, params: &ListParams) -> AppResult<Vec<Product>> {
        let (limit, offset) = params.limit_offset();
        let search = params
            .search
            .as_deref()
            .map(|s| format!("%{}%", s.trim()));

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE ($1::text IS NULL OR name ILIKE $1) \
               AND ($2::uuid IS NULL OR category_id = $2) \
               AND ($3::uuid IS NULL OR brand_id = $3) \
             ORDER BY name ASC LIMIT $4 OFFSET $5",
        ))
        .bind(search)
        .bind(params.category_id)
        .bind(params.brand_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(products)
    }

    async fn check_category(&self, category_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = category_id {
            let exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.db)
                    .await?;
            if !exists {
                return Err(AppError::NotFound("Category".to_string()));
            }
        }
        Ok(())
    }

    async fn check_brand(&self, brand_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = brand_id {
            let exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM brands WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.db)
                    .await?;
            if !exists {
                return Err(AppError::NotFound("Brand".to_string()));
            }
        }
        Ok(())
    }
}
