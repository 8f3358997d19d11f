use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::products::ProductResponse,
    models::{OrderDetails, OrderItemDetails, OrderLine, OrderStatus},
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be greater than 0"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

impl From<&OrderItemRequest> for OrderLine {
    fn from(item: &OrderItemRequest) -> Self {
        OrderLine {
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "An order must contain at least one product"), nested)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "SHIPPED")]
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub quantity: i32,
    /// Unit price at order time, in cents.
    pub price: i64,
    pub product: ProductResponse,
}

impl From<OrderItemDetails> for OrderItemResponse {
    fn from(details: OrderItemDetails) -> Self {
        Self {
            id: details.item.id,
            quantity: details.item.quantity,
            price: details.item.price,
            product: details.product.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_date: DateTime<Utc>,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub order_items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let order = details.order;
        Self {
            id: order.id,
            user_id: order.user_id,
            order_date: order.order_date,
            total_amount: order.total_amount,
            status: order.status,
            order_items: details.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<OrderResponse>)]
    pub items: Vec<OrderResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32) -> OrderItemRequest {
        OrderItemRequest {
            product_id: Uuid::new_v4(),
            quantity,
        }
    }

    #[test]
    fn an_order_needs_at_least_one_item() {
        let empty = CreateOrderRequest { items: vec![] };
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));

        let one = CreateOrderRequest { items: vec![item(2)] };
        assert!(one.validate().is_ok());
    }

    #[test]
    fn item_quantities_are_validated() {
        let order = CreateOrderRequest {
            items: vec![item(1), item(0)],
        };
        assert!(order.validate().is_err());
    }
}
