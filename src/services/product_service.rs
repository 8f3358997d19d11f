use uuid::Uuid;

use crate::{
    dto::products::{PatchProductRequest, ProductList, ProductRequest, ProductResponse},
    error::{AppError, AppResult},
    models::{NewProduct, ProductDetails, ProductFilter},
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    state::AppState,
};

fn name_taken() -> AppError {
    AppError::Conflict("A product with this name already exists".into())
}

fn clean_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".into()));
    }
    Ok(name.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Absent or empty ids mean "no category"; anything else must name an existing one.
async fn resolve_category(state: &AppState, raw: Option<&str>) -> AppResult<Option<Uuid>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let id = Uuid::parse_str(raw)
        .map_err(|_| AppError::BadRequest("Invalid category id".into()))?;
    if state.categories.find_by_id(id).await?.is_none() {
        return Err(AppError::BadRequest("Category not found".into()));
    }
    Ok(Some(id))
}

async fn ensure_name_free(state: &AppState, name: &str, except: Option<Uuid>) -> AppResult<()> {
    match state.products.find_by_name(name).await? {
        Some(other) if Some(other.id) != except => Err(name_taken()),
        _ => Ok(()),
    }
}

async fn find_product(state: &AppState, id: Uuid) -> AppResult<ProductDetails> {
    state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let page = query.page();
    if let (Some(min), Some(max)) = (query.min_price, query.max_price) {
        if min > max {
            return Err(AppError::BadRequest(
                "minPrice cannot be greater than maxPrice".into(),
            ));
        }
    }

    let filter = ProductFilter {
        q: query.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
        category_id: query.category_id,
        min_price: query.min_price,
        max_price: query.max_price,
        sort_by: query.sort_by.unwrap_or_default(),
        sort_order: query.sort_order.unwrap_or_default(),
    };

    let (items, total) = state.products.list(&filter, page).await?;
    let items = items.into_iter().map(ProductResponse::from).collect();

    let meta = Meta::new(page.page, page.limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductResponse>> {
    let product = find_product(state, id).await?;
    Ok(ApiResponse::success(
        "Product",
        product.into(),
        Some(Meta::empty()),
    ))
}

pub async fn create_product(
    state: &AppState,
    payload: ProductRequest,
) -> AppResult<ApiResponse<ProductResponse>> {
    let name = clean_name(&payload.name)?;
    ensure_name_free(state, &name, None).await?;
    let category_id = resolve_category(state, payload.category_id.as_deref()).await?;

    let product = state
        .products
        .create(NewProduct {
            name,
            description: non_empty(payload.description),
            price: payload.price,
            stock: payload.stock,
            image_url: non_empty(payload.image_url),
            category_id,
        })
        .await?;

    tracing::info!(product_id = %product.product.id, "product created");
    Ok(ApiResponse::success(
        "Product created",
        product.into(),
        Some(Meta::empty()),
    ))
}

pub async fn replace_product(
    state: &AppState,
    id: Uuid,
    payload: ProductRequest,
) -> AppResult<ApiResponse<ProductResponse>> {
    let mut product = find_product(state, id).await?.product;
    let name = clean_name(&payload.name)?;
    ensure_name_free(state, &name, Some(id)).await?;

    product.name = name;
    product.description = non_empty(payload.description);
    product.price = payload.price;
    product.stock = payload.stock;
    product.image_url = non_empty(payload.image_url);
    product.category_id = resolve_category(state, payload.category_id.as_deref()).await?;

    let product = state.products.update(product).await?;
    tracing::info!(product_id = %id, "product replaced");
    Ok(ApiResponse::success(
        "Product updated",
        product.into(),
        Some(Meta::empty()),
    ))
}

pub async fn patch_product(
    state: &AppState,
    id: Uuid,
    payload: PatchProductRequest,
) -> AppResult<ApiResponse<ProductResponse>> {
    if payload.is_empty() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let mut product = find_product(state, id).await?.product;

    if let Some(name) = payload.name {
        let name = clean_name(&name)?;
        ensure_name_free(state, &name, Some(id)).await?;
        product.name = name;
    }
    if let Some(description) = payload.description {
        product.description = non_empty(Some(description));
    }
    if let Some(price) = payload.price {
        product.price = price;
    }
    if let Some(stock) = payload.stock {
        product.stock = stock;
    }
    if let Some(image_url) = payload.image_url {
        product.image_url = non_empty(Some(image_url));
    }
    if let Some(category_id) = payload.category_id {
        product.category_id = resolve_category(state, Some(&category_id)).await?;
    }

    let product = state.products.update(product).await?;
    tracing::info!(product_id = %id, "product patched");
    Ok(ApiResponse::success(
        "Product updated",
        product.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<()> {
    if !state.products.delete(id).await? {
        return Err(AppError::not_found("Product"));
    }
    tracing::info!(product_id = %id, "product deleted");
    Ok(())
}
