use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Unchanged},
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{PgRepository, user_from_entity};
use crate::{
    entity::{
        Users,
        users::{ActiveModel, Column},
    },
    error::AppResult,
    models::{NewUser, User},
    repository::UserRepository,
};

#[async_trait]
impl UserRepository for PgRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            role: Set(user.role.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;
        user_from_entity(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Users::find_by_id(id)
            .one(&self.db)
            .await?
            .map(user_from_entity)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(user_from_entity)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Users::find()
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(user_from_entity)
            .collect()
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let model = ActiveModel {
            id: Unchanged(user.id),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            role: Set(user.role.to_string()),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        }
        .update(&self.db)
        .await?;
        user_from_entity(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = Users::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}
