//! Catalog service for categories, brands, and vendor firms
//!
//! Plain CRUD over the three reference tables. Names are unique per table;
//! a duplicate is reported as a conflict. Deleting a catalog entry leaves
//! referencing products in place with the reference cleared.

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{Brand, Category, Firm};
use shared::validation::validate_entity_name;

use crate::error::{AppError, AppResult};
use crate::services::ListParams;

/// Catalog service
#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BrandInput {
    pub name: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FirmInput {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
}

const CATEGORY_COLUMNS: &str = "id, name, description, image_url, created_at, updated_at";
const BRAND_COLUMNS: &str = "id, name, image_url, created_at, updated_at";
const FIRM_COLUMNS: &str = "id, name, address, phone, image_url, created_at, updated_at";

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub async fn create_category(&self, input: CategoryInput) -> AppResult<Category> {
        let name = checked_name(&input.name)?;
        self.check_unique_name("categories", &name, None).await?;

        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (name, description, image_url) \
             VALUES ($1, $2, $3) RETURNING {CATEGORY_COLUMNS}",
        ))
        .bind(&name)
        .bind(&input.description)
        .bind(&input.image_url)
        .fetch_one(&self.db)
        .await?;
        Ok(category)
    }

    pub async fn update_category(&self, id: Uuid, input: CategoryInput) -> AppResult<Category> {
        let name = checked_name(&input.name)?;
        self.check_unique_name("categories", &name, Some(id)).await?;

        sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET name = $2, description = $3, image_url = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {CATEGORY_COLUMNS}",
        ))
        .bind(id)
        .bind(&name)
        .bind(&input.description)
        .bind(&input.image_url)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    pub async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        self.delete_row("categories", "Category", id).await
    }

    pub async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".to_string()))
    }

    pub async fn list_categories(&self, params: &ListParams) -> AppResult<Vec<Category>> {
        let (limit, offset) = params.limit_offset();
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name ASC LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(categories)
    }

    // ------------------------------------------------------------------
    // Brands
    // ------------------------------------------------------------------

    pub async fn create_brand(&self, input: BrandInput) -> AppResult<Brand> {
        let name = checked_name(&input.name)?;
        self.check_unique_name("brands", &name, None).await?;

        let brand = sqlx::query_as::<_, Brand>(&format!(
            "INSERT INTO brands (name, image_url) VALUES ($1, $2) RETURNING {BRAND_COLUMNS}",
        ))
        .bind(&name)
        .bind(&input.image_url)
        .fetch_one(&self.db)
        .await?;
        Ok(brand)
    }

    pub async fn update_brand(&self, id: Uuid, input: BrandInput) -> AppResult<Brand> {
        let name = checked_name(&input.name)?;
        self.check_unique_name("brands", &name, Some(id)).await?;

        sqlx::query_as::<_, Brand>(&format!(
            "UPDATE brands SET name = $2, image_url = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {BRAND_COLUMNS}",
        ))
        .bind(id)
        .bind(&name)
        .bind(&input.image_url)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Brand".to_string()))
    }

    pub async fn delete_brand(&self, id: Uuid) -> AppResult<()> {
        self.delete_row("brands", "Brand", id).await
    }

    pub async fn get_brand(&self, id: Uuid) -> AppResult<Brand> {
        sqlx::query_as::<_, Brand>(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Brand".to_string()))
    }

    pub async fn list_brands(&self, params: &ListParams) -> AppResult<Vec<Brand>> {
        let (limit, offset) = params.limit_offset();
        let brands = sqlx::query_as::<_, Brand>(&format!(
            "SELECT {BRAND_COLUMNS} FROM brands ORDER BY name ASC LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(brands)
    }

    // ------------------------------------------------------------------
    // Firms
    // ------------------------------------------------------------------

    pub async fn create_firm(&self, input: FirmInput) -> AppResult<Firm> {
        let name = checked_name(&input.name)?;
        self.check_unique_name("firms", &name, None).await?;

        let firm = sqlx::query_as::<_, Firm>(&format!(
            "INSERT INTO firms (name, address, phone, image_url) \
             VALUES ($1, $2, $3, $4) RETURNING {FIRM_COLUMNS}",
        ))
        .bind(&name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.image_url)
        .fetch_one(&self.db)
        .await?;
        Ok(firm)
    }

    pub async fn update_firm(&self, id: Uuid, input: FirmInput) -> AppResult<Firm> {
        let name = checked_name(&input.name)?;
        self.check_unique_name("firms", &name, Some(id)).await?;

        sqlx::query_as::<_, Firm>(&format!(
            "UPDATE firms SET name = $2, address = $3, phone = $4, image_url = $5, updated_at = NOW() \
             WHERE id = $1 RETURNING {FIRM_COLUMNS}",
        ))
        .bind(id)
        .bind(&name)
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.image_url)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Firm".to_string()))
    }

    pub async fn delete_firm(&self, id: Uuid) -> AppResult<()> {
        self.delete_row("firms", "Firm", id).await
    }

    pub async fn get_firm(&self, id: Uuid) -> AppResult<Firm> {
        sqlx::query_as::<_, Firm>(&format!(
            "SELECT {FIRM_COLUMNS} FROM firms WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Firm".to_string()))
    }

    pub async fn list_firms(&self, params: &ListParams) -> AppResult<Vec<Firm>> {
        let (limit, offset) = params.limit_offset();
        let firms = sqlx::query_as::<_, Firm>(&format!(
            "SELECT {FIRM_COLUMNS} FROM firms ORDER BY name ASC LIMIT $1 OFFSET $2",
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(firms)
    }

    // ------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------

    async fn check_unique_name(
        &self,
        table: &str,
        name: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {table} WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2)",
        ))
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken > 0 {
            return Err(AppError::Conflict(format!("Name '{}' already exists", name)));
        }
        Ok(())
    }

    async fn delete_row(&self, table: &str, label: &str, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(label.to_string()));
        }
        Ok(())
    }
}

fn checked_name(name: &str) -> AppResult<String> {
    validate_entity_name(name).map_err(|msg| AppError::validation("name", msg))?;
    Ok(name.trim().to_string())
}
