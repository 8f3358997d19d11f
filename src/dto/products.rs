use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::categories::CategoryResponse,
    models::{Product, ProductDetails},
};

/// Full product payload, used for creation and full replacement.
///
/// Prices are integer minor units (cents). `categoryId` may be absent, null or
/// empty for an uncategorized product.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1 to 200 characters"))]
    #[schema(example = "Crème hydratante")]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Price must be greater than 0"))]
    #[schema(example = 2999)]
    pub price: i64,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    #[serde(default)]
    pub stock: i32,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
}

/// Partial product update. `categoryId: ""` removes the category.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1 to 200 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Price must be greater than 0"))]
    pub price: Option<i64>,
    #[validate(range(min = 0, message = "Stock cannot be negative"))]
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
}

impl PatchProductRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.image_url.is_none()
            && self.category_id.is_none()
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub category: Option<CategoryResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
            category_id: product.category_id,
            category: None,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<ProductDetails> for ProductResponse {
    fn from(details: ProductDetails) -> Self {
        Self {
            category: details.category.map(CategoryResponse::from),
            ..ProductResponse::from(details.product)
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductResponse>)]
    pub items: Vec<ProductResponse>,
}
