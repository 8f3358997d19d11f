use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Unchanged},
    ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use super::{PgRepository, category_from_entity, product_from_entity};
use crate::{
    entity::{
        Categories, Products, categories,
        products::{ActiveModel, Column, Model},
    },
    error::{AppError, AppResult},
    models::{
        NewProduct, Page, Product, ProductDetails, ProductFilter, ProductSortBy, SortOrder,
    },
    repository::ProductRepository,
};

fn details(product: Model, category: Option<categories::Model>) -> ProductDetails {
    ProductDetails {
        product: product_from_entity(product),
        category: category.map(category_from_entity),
    }
}

/// Substring pattern for `ILIKE`; `\`, `%` and `_` in the search match literally.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn filter_condition(filter: &ProductFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(search) = filter.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = contains_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Products, Column::Name)).ilike(pattern.clone()))
                .add(Expr::col((Products, Column::Description)).ilike(pattern)),
        );
    }

    if let Some(category_id) = filter.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }

    if let Some(min_price) = filter.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = filter.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    condition
}

impl PgRepository {
    async fn product_details(&self, id: Uuid) -> AppResult<Option<ProductDetails>> {
        Ok(Products::find_by_id(id)
            .find_also_related(Categories)
            .one(&self.db)
            .await?
            .map(|(product, category)| details(product, category)))
    }
}

#[async_trait]
impl ProductRepository for PgRepository {
    async fn create(&self, product: NewProduct) -> AppResult<ProductDetails> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            stock: Set(product.stock),
            image_url: Set(product.image_url),
            category_id: Set(product.category_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;

        self.product_details(model.id)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProductDetails>> {
        self.product_details(id).await
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>> {
        Ok(Products::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(product_from_entity))
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: Page,
    ) -> AppResult<(Vec<ProductDetails>, u64)> {
        let condition = filter_condition(filter);

        let total = Products::find()
            .filter(condition.clone())
            .count(&self.db)
            .await?;

        let sort_col = match filter.sort_by {
            ProductSortBy::CreatedAt => Column::CreatedAt,
            ProductSortBy::Price => Column::Price,
            ProductSortBy::Name => Column::Name,
        };
        let order = match filter.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let items = Products::find()
            .filter(condition)
            .order_by(sort_col, order)
            .order_by_asc(Column::Id)
            .find_also_related(Categories)
            .limit(page.limit)
            .offset(page.offset())
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(product, category)| details(product, category))
            .collect();

        Ok((items, total))
    }

    async fn update(&self, product: Product) -> AppResult<ProductDetails> {
        let model = ActiveModel {
            id: Unchanged(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            stock: Set(product.stock),
            image_url: Set(product.image_url),
            category_id: Set(product.category_id),
            created_at: NotSet,
            updated_at: Set(Utc::now().into()),
        }
        .update(&self.db)
        .await?;

        self.product_details(model.id)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = Products::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn search_patterns_escape_like_wildcards() {
        assert_eq!(contains_pattern("creme"), "%creme%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("gel_douche"), "%gel\\_douche%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
