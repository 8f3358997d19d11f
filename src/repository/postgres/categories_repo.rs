use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Unchanged},
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{PgRepository, category_from_entity};
use crate::{
    entity::{
        Categories,
        categories::{ActiveModel, Column},
    },
    error::AppResult,
    models::Category,
    repository::CategoryRepository,
};

#[async_trait]
impl CategoryRepository for PgRepository {
    async fn create(&self, name: String) -> AppResult<Category> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;
        Ok(category_from_entity(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        Ok(Categories::find_by_id(id)
            .one(&self.db)
            .await?
            .map(category_from_entity))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        Ok(Categories::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(category_from_entity))
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        Ok(Categories::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(category_from_entity)
            .collect())
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        let model = ActiveModel {
            id: Unchanged(category.id),
            name: Set(category.name),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        }
        .update(&self.db)
        .await?;
        Ok(category_from_entity(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = Categories::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
