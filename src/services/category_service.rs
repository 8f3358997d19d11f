use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CategoryRequest, CategoryResponse},
    error::{AppError, AppResult},
    models::Category,
    response::{ApiResponse, Meta},
    state::AppState,
};

fn name_taken() -> AppError {
    AppError::Conflict("A category with this name already exists".into())
}

async fn find_category(state: &AppState, id: Uuid) -> AppResult<Category> {
    state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = state
        .categories
        .list()
        .await?
        .into_iter()
        .map(CategoryResponse::from)
        .collect();
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CategoryResponse>> {
    let category = find_category(state, id).await?;
    Ok(ApiResponse::success(
        "Category",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn create_category(
    state: &AppState,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".into()));
    }
    if state.categories.find_by_name(&name).await?.is_some() {
        return Err(name_taken());
    }

    let category = state.categories.create(name).await?;
    tracing::info!(category_id = %category.id, "category created");
    Ok(ApiResponse::success(
        "Category created",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    id: Uuid,
    payload: CategoryRequest,
) -> AppResult<ApiResponse<CategoryResponse>> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".into()));
    }

    let mut category = find_category(state, id).await?;
    if let Some(other) = state.categories.find_by_name(&name).await? {
        if other.id != id {
            return Err(name_taken());
        }
    }

    category.name = name;
    let category = state.categories.update(category).await?;
    tracing::info!(category_id = %category.id, "category updated");
    Ok(ApiResponse::success(
        "Category updated",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(state: &AppState, id: Uuid) -> AppResult<()> {
    if !state.categories.delete(id).await? {
        return Err(AppError::not_found("Category"));
    }
    tracing::info!(category_id = %id, "category deleted");
    Ok(())
}
