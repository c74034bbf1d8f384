//! HTTP handlers for category, brand, and firm endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared::models::{Brand, Category, Firm};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::access::{self, AccessAction, ResourceKind};
use crate::services::catalog::{BrandInput, CategoryInput, FirmInput};
use crate::services::{CatalogService, ListParams};
use crate::AppState;

// ----------------------------------------------------------------------
// Categories
// ----------------------------------------------------------------------

pub async fn list_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Category>>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.list_categories(&params).await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.get_category(id).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    access::ensure(current_user.0.role, ResourceKind::Category, AccessAction::Create)?;
    let service = CatalogService::new(state.db);
    Ok(Json(service.create_category(input).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> AppResult<Json<Category>> {
    access::ensure(current_user.0.role, ResourceKind::Category, AccessAction::Edit)?;
    let service = CatalogService::new(state.db);
    Ok(Json(service.update_category(id, input).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    access::ensure(current_user.0.role, ResourceKind::Category, AccessAction::Delete)?;
    let service = CatalogService::new(state.db);
    service.delete_category(id).await?;
    Ok(Json(()))
}

// ----------------------------------------------------------------------
// Brands
// ----------------------------------------------------------------------

pub async fn list_brands(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Brand>>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.list_brands(&params).await?))
}

pub async fn get_brand(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Brand>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.get_brand(id).await?))
}

pub async fn create_brand(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<BrandInput>,
) -> AppResult<Json<Brand>> {
    access::ensure(current_user.0.role, ResourceKind::Brand, AccessAction::Create)?;
    let service = CatalogService::new(state.db);
    Ok(Json(service.create_brand(input).await?))
}

pub async fn update_brand(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<BrandInput>,
) -> AppResult<Json<Brand>> {
    access::ensure(current_user.0.role, ResourceKind::Brand, AccessAction::Edit)?;
    let service = CatalogService::new(state.db);
    Ok(Json(service.update_brand(id, input).await?))
}

pub async fn delete_brand(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    access::ensure(current_user.0.role, ResourceKind::Brand, AccessAction::Delete)?;
    let service = CatalogService::new(state.db);
    service.delete_brand(id).await?;
    Ok(Json(()))
}

// ----------------------------------------------------------------------
// Firms
// ----------------------------------------------------------------------

pub async fn list_firms(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Firm>>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.list_firms(&params).await?))
}

pub async fn get_firm(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Firm>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.get_firm(id).await?))
}

pub async fn create_firm(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<FirmInput>,
) -> AppResult<Json<Firm>> {
    access::ensure(current_user.0.role, ResourceKind::Firm, AccessAction::Create)?;
    let service = CatalogService::new(state.db);
    Ok(Json(service.create_firm(input).await?))
}

pub async fn update_firm(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(input): Json<FirmInput>,
) -> AppResult<Json<Firm>> {
    access::ensure(current_user.0.role, ResourceKind::Firm, AccessAction::Edit)?;
    let service = CatalogService::new(state.db);
    Ok(Json(service.update_firm(id, input).await?))
}

pub async fn delete_firm(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<()>> {
    access::ensure(current_user.0.role, ResourceKind::Firm, AccessAction::Delete)?;
    let service = CatalogService::new(state.db);
    service.delete_firm(id).await?;
    Ok(Json(()))
}
