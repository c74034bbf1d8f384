//! HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use serde::Deserialize;

use shared::models::User;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthResponse, AuthService, AuthTokens, LoginInput, RegisterInput};
use crate::services::UserService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<Json<AuthResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let response = service.register(input).await?;
    Ok(Json(response))
}

/// Log in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let response = service.login(input).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new token pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.refresh(&input.refresh_token).await?;
    Ok(Json(tokens))
}

/// Revoke every refresh token of the caller
pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<()>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    service.logout(current_user.0.user_id).await?;
    Ok(Json(()))
}

/// Profile of the authenticated caller
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = UserService::new(state.db);
    let user = service.get(current_user.0.user_id).await?;
    Ok(Json(user))
}
