use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod categories;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod reviews;
pub mod users;

/// All API routes; state is provided at the top level.
pub fn create_api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .merge(users::router())
        .merge(reviews::router())
        .nest("/admin", admin::router(state))
}
