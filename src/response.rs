use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
    pub has_next: Option<bool>,
    pub has_prev: Option<bool>,
}

impl Meta {
    /// Pagination metadata. An empty collection still reports one page.
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = total.div_ceil(limit.max(1)).max(1);
        Self {
            page: Some(page),
            limit: Some(limit),
            total: Some(total),
            total_pages: Some(total_pages),
            has_next: Some(page < total_pages),
            has_prev: Some(page > 1),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            limit: None,
            total: None,
            total_pages: None,
            has_next: None,
            has_prev: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Meta;

    #[test]
    fn second_page_of_fifteen_is_last() {
        let meta = Meta::new(2, 10, 15);
        assert_eq!(meta.total_pages, Some(2));
        assert_eq!(meta.has_next, Some(false));
        assert_eq!(meta.has_prev, Some(true));
    }

    #[test]
    fn empty_collection_has_one_page() {
        let meta = Meta::new(1, 10, 0);
        assert_eq!(meta.total_pages, Some(1));
        assert_eq!(meta.has_next, Some(false));
        assert_eq!(meta.has_prev, Some(false));
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() {
        let meta = Meta::new(1, 10, 20);
        assert_eq!(meta.total_pages, Some(2));
        assert_eq!(meta.has_next, Some(true));
    }
}
