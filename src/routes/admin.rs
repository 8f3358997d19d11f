use axum::{Router, middleware::from_fn_with_state};

use crate::{
    middleware::auth::require_admin,
    routes::{categories, orders, products, users},
    state::AppState,
};

/// Everything under `/admin`, gated on an ADMIN token.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/products", products::admin_router())
        .nest("/categories", categories::admin_router())
        .nest("/orders", orders::admin_router())
        .merge(users::admin_router())
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}
