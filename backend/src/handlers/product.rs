//! HTTP handlers for product endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared::models::{Product, StockMovement};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::access::{self, AccessAction, ResourceKind};
use crate::services::product::{CreateProductInput, UpdateProductInput};
use crate::services::{ListParams, ProductService, ReconciliationService};
use crate::AppState;

/// List products with optional search and pagination
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list(&params).await?;
    Ok(Json(products))
}

/// Get a single product
pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    access::ensure(current_user.0.role, ResourceKind::Product, AccessAction::Create)?;
    let service = ProductService::new(state.db);
    let product = service.create(input).await?;
    Ok(Json(product))
}

/// Update a product's record fields
pub async fn update_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    access::ensure(current_user.0.role, ResourceKind::Product, AccessAction::Edit)?;
    let service = ProductService::new(state.db);
    let product = service.update(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    access::ensure(current_user.0.role, ResourceKind::Product, AccessAction::Delete)?;
    let service = ProductService::new(state.db);
    service.delete(product_id).await?;
    Ok(Json(()))
}

/// Movement trail for a product, oldest first
pub async fn get_product_history(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = ReconciliationService::new(state.db);
    let movements = service.product_history(product_id).await?;
    Ok(Json(movements))
}
