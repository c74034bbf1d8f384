//! Business logic services

pub mod access;
pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod product;
pub mod reconciliation;
pub mod user;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use catalog::CatalogService;
pub use product::ProductService;
pub use reconciliation::ReconciliationService;
pub use user::UserService;

use serde::Deserialize;

/// Common list parameters accepted by every collection endpoint.
///
/// A missing or non-positive `limit` disables pagination and returns the
/// whole collection; `page` is 1-based and only meaningful with a limit.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub search: Option<String>,
    pub category_id: Option<uuid::Uuid>,
    pub brand_id: Option<uuid::Uuid>,
}

impl ListParams {
    /// SQL-ready (limit, offset) pair. `None` limit binds as `LIMIT NULL`,
    /// which Postgres treats as no limit.
    pub fn limit_offset(&self) -> (Option<i64>, i64) {
        match self.limit {
            Some(limit) if limit > 0 => {
                let page = self.page.unwrap_or(1).max(1);
                (Some(limit), (page - 1) * limit)
            }
            _ => (None, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_disable_pagination() {
        let params = ListParams::default();
        assert_eq!(params.limit_offset(), (None, 0));
    }

    #[test]
    fn test_non_positive_limit_disables_pagination() {
        let params = ListParams {
            limit: Some(0),
            page: Some(3),
            ..Default::default()
        };
        assert_eq!(params.limit_offset(), (None, 0));

        let params = ListParams {
            limit: Some(-5),
            ..Default::default()
        };
        assert_eq!(params.limit_offset(), (None, 0));
    }

    #[test]
    fn test_paged_offsets() {
        let params = ListParams {
            limit: Some(20),
            page: Some(3),
            ..Default::default()
        };
        assert_eq!(params.limit_offset(), (Some(20), 40));

        // Page defaults to 1 and never goes below it
        let params = ListParams {
            limit: Some(20),
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(params.limit_offset(), (Some(20), 0));
    }
}
