//! Route definitions for the Stock Management Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public + protected)
        .nest("/auth", auth_routes(state))
        // Protected routes
        .nest("/products", product_routes(state))
        .nest("/categories", category_routes(state))
        .nest("/brands", brand_routes(state))
        .nest("/firms", firm_routes(state))
        .nest("/purchases", purchase_routes(state))
        .nest("/sells", sell_routes(state))
        .nest("/users", user_routes(state))
        .nest("/analytics", analytics_routes(state))
}

/// Authentication routes
fn auth_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .merge(protected)
}

/// Product routes (protected)
fn product_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/movements", get(handlers::get_product_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Category routes (protected)
fn category_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories).post(handlers::create_category))
        .route(
            "/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Brand routes (protected)
fn brand_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_brands).post(handlers::create_brand))
        .route(
            "/:brand_id",
            get(handlers::get_brand)
                .put(handlers::update_brand)
                .delete(handlers::delete_brand),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Firm routes (protected)
fn firm_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_firms).post(handlers::create_firm))
        .route(
            "/:firm_id",
            get(handlers::get_firm)
                .put(handlers::update_firm)
                .delete(handlers::delete_firm),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Purchase routes (protected)
fn purchase_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases).post(handlers::record_purchase))
        .route(
            "/:purchase_id",
            get(handlers::get_purchase)
                .put(handlers::update_purchase)
                .delete(handlers::delete_purchase),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Sell routes (protected)
fn sell_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sells).post(handlers::record_sell))
        .route(
            "/:sell_id",
            get(handlers::get_sell)
                .put(handlers::update_sell)
                .delete(handlers::delete_sell),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// User administration routes (protected)
fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users))
        .route(
            "/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}

/// Analytics routes (protected)
fn analytics_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_analytics_overview))
        .route("/categories", get(handlers::get_category_summaries))
        .route("/category/:name", get(handlers::get_category_analytics))
        .route("/top-products", get(handlers::get_top_products))
        .route("/top-buyers", get(handlers::get_top_buyers))
        .route("/top-sellers", get(handlers::get_top_sellers))
        .route("/top-profitable", get(handlers::get_top_profitable))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
}
