use uuid::Uuid;

use crate::{
    dto::reviews::{ProductReviewsResponse, ReviewRequest, ReviewResponse, UpdateReviewRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{NewReview, Review, ReviewDetails},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Hide most of the local part: `jane.doe@example.com` becomes `j***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}

/// Mean rating rounded to one decimal place.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

fn to_response(details: ReviewDetails) -> ReviewResponse {
    let review = details.review;
    ReviewResponse {
        id: review.id,
        rating: review.rating,
        comment: review.comment,
        user_id: review.user_id,
        user_email: mask_email(&details.user_email),
        product_id: review.product_id,
        created_at: review.created_at,
        updated_at: review.updated_at,
    }
}

fn clean_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

async fn ensure_product_exists(state: &AppState, product_id: Uuid) -> AppResult<()> {
    if state.products.find_by_id(product_id).await?.is_none() {
        return Err(AppError::not_found("Product"));
    }
    Ok(())
}

async fn owned_review(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<Review> {
    let review = state
        .reviews
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;
    if review.user_id != user.user_id {
        return Err(AppError::Forbidden(
            "You can only modify your own reviews".into(),
        ));
    }
    Ok(review)
}

/// Create the caller's review of a product, or overwrite it if one exists.
/// The flag is true when a new review was created.
pub async fn upsert_review(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: ReviewRequest,
) -> AppResult<(ApiResponse<ReviewResponse>, bool)> {
    ensure_product_exists(state, product_id).await?;
    let comment = clean_comment(payload.comment);

    let existing = state
        .reviews
        .find_by_user_and_product(user.user_id, product_id)
        .await?;

    let (details, created) = match existing {
        Some(mut details) => {
            details.review.rating = payload.rating;
            details.review.comment = comment;
            (state.reviews.update(details.review).await?, false)
        }
        None => {
            let review = NewReview {
                user_id: user.user_id,
                product_id,
                rating: payload.rating,
                comment,
            };
            (state.reviews.create(review).await?, true)
        }
    };

    tracing::info!(
        review_id = %details.review.id,
        product_id = %product_id,
        user_id = %user.user_id,
        created,
        "review saved"
    );
    let message = if created { "Review created" } else { "Review updated" };
    Ok((
        ApiResponse::success(message, to_response(details), Some(Meta::empty())),
        created,
    ))
}

pub async fn list_product_reviews(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ApiResponse<ProductReviewsResponse>> {
    ensure_product_exists(state, product_id).await?;
    let reviews = state.reviews.list_for_product(product_id).await?;

    let ratings: Vec<i32> = reviews.iter().map(|r| r.review.rating).collect();
    let data = ProductReviewsResponse {
        average_rating: average_rating(&ratings),
        total_reviews: reviews.len() as u64,
        reviews: reviews.into_iter().map(to_response).collect(),
    };
    Ok(ApiResponse::success("Reviews", data, Some(Meta::empty())))
}

pub async fn get_my_review(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state
        .reviews
        .find_by_user_and_product(user.user_id, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review"))?;
    Ok(ApiResponse::success(
        "Review",
        to_response(review),
        Some(Meta::empty()),
    ))
}

pub async fn update_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<ReviewResponse>> {
    if payload.rating.is_none() && payload.comment.is_none() {
        return Err(AppError::BadRequest("No fields to update".into()));
    }

    let mut review = owned_review(state, user, id).await?;
    if let Some(rating) = payload.rating {
        review.rating = rating;
    }
    if payload.comment.is_some() {
        review.comment = clean_comment(payload.comment);
    }

    let details = state.reviews.update(review).await?;
    tracing::info!(review_id = %id, "review updated");
    Ok(ApiResponse::success(
        "Review updated",
        to_response(details),
        Some(Meta::empty()),
    ))
}

pub async fn delete_review(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    owned_review(state, user, id).await?;
    if !state.reviews.delete(id).await? {
        return Err(AppError::not_found("Review"));
    }
    tracing::info!(review_id = %id, "review deleted");
    Ok(())
}
