use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::reviews::{ProductReviewsResponse, ReviewRequest, ReviewResponse, UpdateReviewRequest},
    error::AppResult,
    middleware::{auth::AuthUser, extract::UuidPath, validation::ValidatedJson},
    response::ApiResponse,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/products/{id}/reviews",
            get(list_product_reviews).post(upsert_review),
        )
        .route("/products/{id}/reviews/me", get(get_my_review))
        .route("/reviews/{id}", put(update_review).delete(delete_review))
}

#[utoipa::path(
    post,
    path = "/products/{id}/reviews",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewResponse>),
        (status = 200, description = "Existing review updated", body = ApiResponse<ReviewResponse>),
        (status = 404, description = "Product not found")
    ),
    tag = "Reviews"
)]
pub async fn upsert_review(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(product_id): UuidPath,
    ValidatedJson(payload): ValidatedJson<ReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ReviewResponse>>)> {
    let (resp, created) = review_service::upsert_review(&state, &user, product_id, payload).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/products/{id}/reviews",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Reviews with rating summary", body = ApiResponse<ProductReviewsResponse>),
        (status = 404, description = "Product not found")
    ),
    tag = "Reviews"
)]
pub async fn list_product_reviews(
    State(state): State<AppState>,
    _user: AuthUser,
    UuidPath(product_id): UuidPath,
) -> AppResult<Json<ApiResponse<ProductReviewsResponse>>> {
    let resp = review_service::list_product_reviews(&state, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/products/{id}/reviews/me",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "The caller's review", body = ApiResponse<ReviewResponse>),
        (status = 404, description = "No review yet")
    ),
    tag = "Reviews"
)]
pub async fn get_my_review(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(product_id): UuidPath,
) -> AppResult<Json<ApiResponse<ReviewResponse>>> {
    let resp = review_service::get_my_review(&state, &user, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<ReviewResponse>),
        (status = 400, description = "No fields to update"),
        (status = 403, description = "Not your review"),
        (status = 404, description = "Review not found")
    ),
    tag = "Reviews"
)]
pub async fn update_review(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(payload): ValidatedJson<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<ReviewResponse>>> {
    let resp = review_service::update_review(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Not your review"),
        (status = 404, description = "Review not found")
    ),
    tag = "Reviews"
)]
pub async fn delete_review(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> AppResult<StatusCode> {
    review_service::delete_review(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
