use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, OrderResponse, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{OrderFilter, OrderLine, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
};

fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    raw.trim()
        .to_uppercase()
        .parse()
        .map_err(AppError::BadRequest)
}

fn order_filter(user_id: Option<Uuid>, query: &OrderListQuery) -> AppResult<OrderFilter> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_status)
        .transpose()?;
    Ok(OrderFilter {
        user_id,
        status,
        sort_order: query.sort_order.unwrap_or_default(),
    })
}

async fn list_with_filter(
    state: &AppState,
    filter: OrderFilter,
    query: &OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let page = query.page();
    let (orders, total) = state.orders.list(&filter, page).await?;
    let items = orders.into_iter().map(OrderResponse::from).collect();
    let meta = Meta::new(page.page, page.limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderResponse>> {
    let lines: Vec<OrderLine> = payload.items.iter().map(OrderLine::from).collect();
    let order = state.orders.place_order(user.user_id, &lines).await?;

    tracing::info!(
        order_id = %order.order.id,
        user_id = %user.user_id,
        total = order.order.total_amount,
        "order placed"
    );
    Ok(ApiResponse::success(
        "Order created",
        order.into(),
        Some(Meta::empty()),
    ))
}

/// The caller's own orders.
pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let filter = order_filter(Some(user.user_id), &query)?;
    list_with_filter(state, filter, &query).await
}

/// Every order, for administrators.
pub async fn list_all_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let filter = order_filter(None, &query)?;
    list_with_filter(state, filter, &query).await
}

/// Another user's order reads as missing unless the caller is an admin.
pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state
        .orders
        .find_by_id(id)
        .await?
        .filter(|o| o.order.user_id == user.user_id || user.is_admin())
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(ApiResponse::success("Order", order.into(), Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderResponse>> {
    let status = parse_status(&payload.status)?;
    let order = state
        .orders
        .update_status(id, status)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    tracing::info!(order_id = %id, status = %status, "order status updated");
    Ok(ApiResponse::success(
        "Order status updated",
        order.into(),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(parse_status(" shipped ").unwrap(), OrderStatus::Shipped);
        assert!(matches!(parse_status("PAID"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn blank_status_filter_means_all() {
        let query = OrderListQuery {
            status: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(order_filter(None, &query).unwrap().status, None);
    }
}
