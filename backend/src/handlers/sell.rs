//! HTTP handlers for sell endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared::models::Sell;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::access::{self, AccessAction, ResourceKind};
use crate::services::reconciliation::{RecordSellInput, UpdateSellInput};
use crate::services::{ListParams, ReconciliationService};
use crate::AppState;

/// List sells; self-scoped roles only see their own records
pub async fn list_sells(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Sell>>> {
    let caller = current_user.0;
    let scope = access::scopes_to_self(caller.role, ResourceKind::Sell)
        .then_some(caller.user_id);
    let service = ReconciliationService::new(state.db);
    let sells = service.list_sells(scope, &params).await?;
    Ok(Json(sells))
}

/// Get a single sell
pub async fn get_sell(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sell_id): Path<Uuid>,
) -> AppResult<Json<Sell>> {
    let caller = current_user.0;
    let service = ReconciliationService::new(state.db);
    let sell = service.get_sell(sell_id).await?;
    access::ensure_owner(caller.role, caller.user_id, sell.seller_id, sell.recorded_by)?;
    Ok(Json(sell))
}

/// Record a sell; rejected outright when stock is insufficient
pub async fn record_sell(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordSellInput>,
) -> AppResult<Json<Sell>> {
    let caller = current_user.0;
    access::ensure(caller.role, ResourceKind::Sell, AccessAction::Create)?;
    let seller_id = access::resolve_actor(caller.role, caller.user_id, input.seller_id)?;

    let service = ReconciliationService::new(state.db);
    let sell = service.record_sell(caller.user_id, seller_id, input).await?;
    Ok(Json(sell))
}

/// Update a sell
pub async fn update_sell(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sell_id): Path<Uuid>,
    Json(input): Json<UpdateSellInput>,
) -> AppResult<Json<Sell>> {
    let caller = current_user.0;
    access::ensure(caller.role, ResourceKind::Sell, AccessAction::Edit)?;

    let service = ReconciliationService::new(state.db);
    let existing = service.get_sell(sell_id).await?;
    access::ensure_owner(caller.role, caller.user_id, existing.seller_id, existing.recorded_by)?;

    let seller_id = match input.seller_id {
        Some(requested) => Some(access::resolve_actor(caller.role, caller.user_id, Some(requested))?),
        None => None,
    };

    let sell = service.update_sell(sell_id, seller_id, input).await?;
    Ok(Json(sell))
}

/// Delete a sell, returning its quantity to the shelf count
pub async fn delete_sell(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(sell_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let caller = current_user.0;
    access::ensure(caller.role, ResourceKind::Sell, AccessAction::Delete)?;

    let service = ReconciliationService::new(state.db);
    let existing = service.get_sell(sell_id).await?;
    access::ensure_owner(caller.role, caller.user_id, existing.seller_id, existing.recorded_by)?;

    service.delete_sell(sell_id).await?;
    Ok(Json(()))
}
