use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Unchanged},
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{PgRepository, review_from_entity};
use crate::{
    entity::{
        Reviews, Users,
        reviews::{ActiveModel, Column, Model},
        users,
    },
    error::{AppError, AppResult},
    models::{NewReview, Review, ReviewDetails},
    repository::ReviewRepository,
};

fn details(review: Model, user: Option<users::Model>) -> ReviewDetails {
    ReviewDetails {
        review: review_from_entity(review),
        user_email: user.map(|u| u.email).unwrap_or_default(),
    }
}

impl PgRepository {
    async fn review_details(&self, id: Uuid) -> AppResult<ReviewDetails> {
        Reviews::find_by_id(id)
            .find_also_related(Users)
            .one(&self.db)
            .await?
            .map(|(review, user)| details(review, user))
            .ok_or_else(|| AppError::not_found("Review"))
    }
}

#[async_trait]
impl ReviewRepository for PgRepository {
    async fn create(&self, review: NewReview) -> AppResult<ReviewDetails> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(review.user_id),
            product_id: Set(review.product_id),
            rating: Set(review.rating),
            comment: Set(review.comment),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;
        self.review_details(model.id).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        Ok(Reviews::find_by_id(id)
            .one(&self.db)
            .await?
            .map(review_from_entity))
    }

    async fn find_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<ReviewDetails>> {
        Ok(Reviews::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ProductId.eq(product_id))
            .find_also_related(Users)
            .one(&self.db)
            .await?
            .map(|(review, user)| details(review, user)))
    }

    async fn list_for_product(&self, product_id: Uuid) -> AppResult<Vec<ReviewDetails>> {
        Ok(Reviews::find()
            .filter(Column::ProductId.eq(product_id))
            .order_by_desc(Column::CreatedAt)
            .find_also_related(Users)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(review, user)| details(review, user))
            .collect())
    }

    async fn update(&self, review: Review) -> AppResult<ReviewDetails> {
        let model = ActiveModel {
            id: Unchanged(review.id),
            user_id: NotSet,
            product_id: NotSet,
            rating: Set(review.rating),
            comment: Set(review.comment),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        }
        .update(&self.db)
        .await?;
        self.review_details(model.id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = Reviews::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
