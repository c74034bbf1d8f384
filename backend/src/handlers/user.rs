//! HTTP handlers for user administration endpoints
//!
//! Any account may read and update its own profile; changing roles,
//! activation flags, or other people's accounts is admin territory.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use shared::models::User;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::access::{self, AccessAction, ResourceKind};
use crate::services::user::UpdateUserInput;
use crate::services::{ListParams, UserService};
use crate::AppState;

/// List users; self-scoped roles only see themselves
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<User>>> {
    let caller = current_user.0;
    let scope =
        access::scopes_to_self(caller.role, ResourceKind::User).then_some(caller.user_id);
    let service = UserService::new(state.db);
    let users = service.list(scope, &params).await?;
    Ok(Json(users))
}

/// Get a single user
pub async fn get_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    let caller = current_user.0;
    if access::scopes_to_self(caller.role, ResourceKind::User) && user_id != caller.user_id {
        return Err(AppError::Forbidden(
            "Account belongs to another user".to_string(),
        ));
    }
    let service = UserService::new(state.db);
    let user = service.get(user_id).await?;
    Ok(Json(user))
}

/// Update a user. Own profile fields are always editable; role and
/// activation changes go through the admin gate.
pub async fn update_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<User>> {
    let caller = current_user.0;
    let own_profile_edit = user_id == caller.user_id && !input.touches_privileged_fields();
    if !own_profile_edit {
        access::ensure(caller.role, ResourceKind::User, AccessAction::Edit)?;
    }

    let service = UserService::new(state.db);
    let user = service.update(user_id, input).await?;
    Ok(Json(user))
}

/// Delete a user. Admin-only, and admins cannot delete their own account.
/// Trade history survives the account.
pub async fn delete_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let caller = current_user.0;
    access::ensure(caller.role, ResourceKind::User, AccessAction::Delete)?;
    if user_id == caller.user_id {
        return Err(AppError::Forbidden(
            "Cannot delete your own account".to_string(),
        ));
    }

    let service = UserService::new(state.db);
    service.delete(user_id).await?;
    Ok(Json(()))
}
