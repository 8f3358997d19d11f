use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::models::{Page, ProductSortBy, SortOrder};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp raw query values into a usable page: page ≥ 1, 1 ≤ limit ≤ 100.
pub fn normalize_page(page: Option<i64>, limit: Option<i64>) -> Page {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    Page {
        page: page as u64,
        limit: limit as u64,
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page number, default 1.
    pub page: Option<i64>,
    /// Items per page, default 10, max 100.
    pub limit: Option<i64>,
    /// Case-insensitive search in name and description.
    pub q: Option<String>,
    pub category_id: Option<Uuid>,
    /// Minimum price in cents.
    pub min_price: Option<i64>,
    /// Maximum price in cents.
    pub max_price: Option<i64>,
    #[param(inline)]
    pub sort_by: Option<ProductSortBy>,
    #[param(inline)]
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn page(&self) -> Page {
        normalize_page(self.page, self.limit)
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// PENDING, SHIPPED, DELIVERED or CANCELLED.
    pub status: Option<String>,
    #[param(inline)]
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    pub fn page(&self) -> Page {
        normalize_page(self.page, self.limit)
    }
}
