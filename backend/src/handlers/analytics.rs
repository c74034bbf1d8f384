//! HTTP handlers for analytics endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::analytics::{
    AnalyticsOverview, AnalyticsService, CategorySummary, PersonStat, ProductProfit, ProductSpend,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TopParams {
    /// How many entries the ranking carries. Defaults to 3.
    pub n: Option<usize>,
}

impl TopParams {
    fn n(&self) -> usize {
        self.n.unwrap_or(3)
    }
}

fn analytics(state: AppState) -> AnalyticsService {
    AnalyticsService::new(state.db, state.config.analytics.assumed_cost_ratio)
}

/// Top-list overview across the whole trade history
pub async fn get_analytics_overview(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(params): Query<TopParams>,
) -> AppResult<Json<AnalyticsOverview>> {
    let overview = analytics(state).overview(params.n()).await?;
    Ok(Json(overview))
}

/// Rollup for one category addressed by name
pub async fn get_category_analytics(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(name): Path<String>,
) -> AppResult<Json<CategorySummary>> {
    let summary = analytics(state).category_by_name(&name).await?;
    Ok(Json(summary))
}

/// Per-category rollups, in category name order
pub async fn get_category_summaries(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<CategorySummary>>> {
    let summaries = analytics(state).category_summaries().await?;
    Ok(Json(summaries))
}

/// Products ranked by total purchase spend
pub async fn get_top_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<ProductSpend>>> {
    let ranked = analytics(state).top_products(params.n()).await?;
    Ok(Json(ranked))
}

/// Buyers ranked by total spend
pub async fn get_top_buyers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<PersonStat>>> {
    let ranked = analytics(state).biggest_buyers(params.n()).await?;
    Ok(Json(ranked))
}

/// Sellers ranked by total take
pub async fn get_top_sellers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<PersonStat>>> {
    let ranked = analytics(state).biggest_sellers(params.n()).await?;
    Ok(Json(ranked))
}

/// Products ranked by sell-margin profit
pub async fn get_top_profitable(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<ProductProfit>>> {
    let ranked = analytics(state).most_profitable_products(params.n()).await?;
    Ok(Json(ranked))
}
