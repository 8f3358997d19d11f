use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::products::{PatchProductRequest, ProductList, ProductRequest, ProductResponse},
    error::AppResult,
    middleware::{
        auth::AuthUser,
        extract::{ApiQuery, UuidPath},
        validation::ValidatedJson,
    },
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/", post(create_product)).route(
        "/{id}",
        put(replace_product)
            .patch(patch_product)
            .delete(delete_product),
    )
}

#[utoipa::path(
    get,
    path = "/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "Paginated products", body = ApiResponse<ProductList>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    _user: AuthUser,
    UuidPath(id): UuidPath,
) -> AppResult<Json<ApiResponse<ProductResponse>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, description = "Invalid payload or unknown category"),
        (status = 409, description = "Name already used")
    ),
    tag = "Admin"
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProductResponse>>)> {
    let resp = product_service::create_product(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product replaced", body = ApiResponse<ProductResponse>),
        (status = 404, description = "Product not found")
    ),
    tag = "Admin"
)]
pub async fn replace_product(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Json<ApiResponse<ProductResponse>>> {
    let resp = product_service::replace_product(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = PatchProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "Product not found")
    ),
    tag = "Admin"
)]
pub async fn patch_product(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
    ValidatedJson(payload): ValidatedJson<PatchProductRequest>,
) -> AppResult<Json<ApiResponse<ProductResponse>>> {
    let resp = product_service::patch_product(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is referenced by orders")
    ),
    tag = "Admin"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> AppResult<StatusCode> {
    product_service::delete_product(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
