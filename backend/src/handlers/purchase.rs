//! HTTP handlers for purchase endpoints
//!
//! The access gate runs first, then actor resolution (only admins may
//! record a purchase for someone else), then ownership checks for
//! self-scoped roles mutating existing records.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared::models::Purchase;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::access::{self, AccessAction, ResourceKind};
use crate::services::reconciliation::{RecordPurchaseInput, UpdatePurchaseInput};
use crate::services::{ListParams, ReconciliationService};
use crate::AppState;

/// List purchases; self-scoped roles only see their own records
pub async fn list_purchases(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Purchase>>> {
    let caller = current_user.0;
    let scope = access::scopes_to_self(caller.role, ResourceKind::Purchase)
        .then_some(caller.user_id);
    let service = ReconciliationService::new(state.db);
    let purchases = service.list_purchases(scope, &params).await?;
    Ok(Json(purchases))
}

/// Get a single purchase
pub async fn get_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<Purchase>> {
    let caller = current_user.0;
    let service = ReconciliationService::new(state.db);
    let purchase = service.get_purchase(purchase_id).await?;
    access::ensure_owner(caller.role, caller.user_id, purchase.buyer_id, purchase.recorded_by)?;
    Ok(Json(purchase))
}

/// Record a purchase
pub async fn record_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordPurchaseInput>,
) -> AppResult<Json<Purchase>> {
    let caller = current_user.0;
    access::ensure(caller.role, ResourceKind::Purchase, AccessAction::Create)?;
    let buyer_id = access::resolve_actor(caller.role, caller.user_id, input.buyer_id)?;

    let service = ReconciliationService::new(state.db);
    let purchase = service.record_purchase(caller.user_id, buyer_id, input).await?;
    Ok(Json(purchase))
}

/// Update a purchase
pub async fn update_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseInput>,
) -> AppResult<Json<Purchase>> {
    let caller = current_user.0;
    access::ensure(caller.role, ResourceKind::Purchase, AccessAction::Edit)?;

    let service = ReconciliationService::new(state.db);
    let existing = service.get_purchase(purchase_id).await?;
    access::ensure_owner(caller.role, caller.user_id, existing.buyer_id, existing.recorded_by)?;

    let buyer_id = match input.buyer_id {
        Some(requested) => Some(access::resolve_actor(caller.role, caller.user_id, Some(requested))?),
        None => None,
    };

    let purchase = service.update_purchase(purchase_id, buyer_id, input).await?;
    Ok(Json(purchase))
}

/// Delete a purchase, returning its quantity to the shelf count
pub async fn delete_purchase(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let caller = current_user.0;
    access::ensure(caller.role, ResourceKind::Purchase, AccessAction::Delete)?;

    let service = ReconciliationService::new(state.db);
    let existing = service.get_purchase(purchase_id).await?;
    access::ensure_owner(caller.role, caller.user_id, existing.buyer_id, existing.recorded_by)?;

    service.delete_purchase(purchase_id).await?;
    Ok(Json(()))
}
