//! In-memory repositories backed by one shared store.
//!
//! Every trait is implemented on [`MemoryStore`]; clones share state. A single
//! `RwLock` guards all tables, so order placement is trivially atomic.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    checkout::price_order,
    error::{AppError, AppResult},
    models::{
        Category, NewProduct, NewReview, NewUser, Order, OrderDetails, OrderFilter, OrderItem,
        OrderItemDetails, OrderLine, OrderStatus, Page, Product, ProductDetails, ProductFilter,
        ProductSortBy, Review, ReviewDetails, SortOrder, User,
    },
    repository::{
        CategoryRepository, OrderRepository, ProductRepository, ReviewRepository, UserRepository,
    },
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
    order_items: Vec<OrderItem>,
    reviews: HashMap<Uuid, Review>,
}

fn already_exists() -> AppError {
    AppError::Conflict("Resource already exists".into())
}

fn still_referenced() -> AppError {
    AppError::Conflict("Resource is still referenced by other records".into())
}

fn page_of<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
        .collect()
}

fn apply_order(ordering: Ordering, sort_order: SortOrder) -> Ordering {
    match sort_order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

impl Tables {
    fn product_details(&self, product: &Product) -> ProductDetails {
        ProductDetails {
            product: product.clone(),
            category: product
                .category_id
                .and_then(|id| self.categories.get(&id))
                .cloned(),
        }
    }

    fn order_details(&self, order: &Order) -> AppResult<OrderDetails> {
        let items = self
            .order_items
            .iter()
            .filter(|item| item.order_id == order.id)
            .map(|item| {
                let product = self.products.get(&item.product_id).cloned().ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!(
                        "order item {} references a missing product",
                        item.id
                    ))
                })?;
                Ok(OrderItemDetails {
                    item: item.clone(),
                    product,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(OrderDetails {
            order: order.clone(),
            items,
        })
    }

    fn review_details(&self, review: &Review) -> ReviewDetails {
        ReviewDetails {
            review: review.clone(),
            user_email: self
                .users
                .get(&review.user_id)
                .map(|u| u.email.clone())
                .unwrap_or_default(),
        }
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn category_name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn product_name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.products
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }

    fn check_category(&self, category_id: Option<Uuid>) -> AppResult<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(still_referenced()),
            _ => Ok(()),
        }
    }

    fn matches(product: &Product, filter: &ProductFilter) -> bool {
        if let Some(q) = filter.q.as_ref().filter(|s| !s.is_empty()) {
            let q = q.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&q);
            let in_description = product
                .description
                .as_ref()
                .is_some_and(|d| d.to_lowercase().contains(&q));
            if !in_name && !in_description {
                return false;
            }
        }
        if filter.category_id.is_some() && product.category_id != filter.category_id {
            return false;
        }
        if filter.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if filter.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(already_exists());
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn update(&self, mut user: User) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, Some(user.id)) {
            return Err(already_exists());
        }
        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::not_found("User"))?;
        user.created_at = stored.created_at;
        user.updated_at = Utc::now();
        *stored = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let order_ids: Vec<Uuid> = tables
            .orders
            .values()
            .filter(|o| o.user_id == id)
            .map(|o| o.id)
            .collect();
        for order_id in &order_ids {
            tables.orders.remove(order_id);
        }
        tables
            .order_items
            .retain(|item| !order_ids.contains(&item.order_id));
        tables.reviews.retain(|_, r| r.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create(&self, name: String) -> AppResult<Category> {
        let mut tables = self.tables.write().await;
        if tables.category_name_taken(&name, None) {
            return Err(already_exists());
        }
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.name == name).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update(&self, mut category: Category) -> AppResult<Category> {
        let mut tables = self.tables.write().await;
        if tables.category_name_taken(&category.name, Some(category.id)) {
            return Err(already_exists());
        }
        let stored = tables
            .categories
            .get_mut(&category.id)
            .ok_or_else(|| AppError::not_found("Category"))?;
        category.created_at = stored.created_at;
        category.updated_at = Utc::now();
        *stored = category.clone();
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        for product in tables.products.values_mut() {
            if product.category_id == Some(id) {
                product.category_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create(&self, product: NewProduct) -> AppResult<ProductDetails> {
        let mut tables = self.tables.write().await;
        if tables.product_name_taken(&product.name, None) {
            return Err(already_exists());
        }
        tables.check_category(product.category_id)?;
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
            category_id: product.category_id,
            created_at: now,
            updated_at: now,
        };
        tables.products.insert(product.id, product.clone());
        Ok(tables.product_details(&product))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProductDetails>> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).map(|p| tables.product_details(p)))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables.products.values().find(|p| p.name == name).cloned())
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        page: Page,
    ) -> AppResult<(Vec<ProductDetails>, u64)> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&Product> = tables
            .products
            .values()
            .filter(|p| Tables::matches(p, filter))
            .collect();

        matching.sort_by(|a, b| {
            let ordering = match filter.sort_by {
                ProductSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                ProductSortBy::Price => a.price.cmp(&b.price),
                ProductSortBy::Name => a.name.cmp(&b.name),
            };
            apply_order(ordering, filter.sort_order).then(a.id.cmp(&b.id))
        });

        let total = matching.len() as u64;
        let items = page_of(matching, page)
            .into_iter()
            .map(|p| tables.product_details(p))
            .collect();
        Ok((items, total))
    }

    async fn update(&self, mut product: Product) -> AppResult<ProductDetails> {
        let mut tables = self.tables.write().await;
        if tables.product_name_taken(&product.name, Some(product.id)) {
            return Err(already_exists());
        }
        tables.check_category(product.category_id)?;
        let stored = tables
            .products
            .get_mut(&product.id)
            .ok_or_else(|| AppError::not_found("Product"))?;
        product.created_at = stored.created_at;
        product.updated_at = Utc::now();
        *stored = product.clone();
        Ok(tables.product_details(&product))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Ok(false);
        }
        if tables.order_items.iter().any(|item| item.product_id == id) {
            return Err(still_referenced());
        }
        tables.products.remove(&id);
        tables.reviews.retain(|_, r| r.product_id != id);
        Ok(true)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn place_order(&self, user_id: Uuid, lines: &[OrderLine]) -> AppResult<OrderDetails> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Err(still_referenced());
        }

        let catalog: HashMap<Uuid, Product> = lines
            .iter()
            .filter_map(|line| tables.products.get(&line.product_id))
            .map(|p| (p.id, p.clone()))
            .collect();
        let priced = price_order(lines, &catalog)?;

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            user_id,
            order_date: now,
            total_amount: priced.total,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        for line in &priced.lines {
            tables.order_items.push(OrderItem {
                id: Uuid::new_v4(),
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.unit_price,
            });
            if let Some(product) = tables.products.get_mut(&line.product_id) {
                product.stock -= line.quantity;
                product.updated_at = now;
            }
        }
        tables.orders.insert(order.id, order.clone());

        tables.order_details(&order)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<OrderDetails>> {
        let tables = self.tables.read().await;
        tables
            .orders
            .get(&id)
            .map(|order| tables.order_details(order))
            .transpose()
    }

    async fn list(&self, filter: &OrderFilter, page: Page) -> AppResult<(Vec<OrderDetails>, u64)> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&Order> = tables
            .orders
            .values()
            .filter(|o| filter.user_id.is_none_or(|user_id| o.user_id == user_id))
            .filter(|o| filter.status.is_none_or(|status| o.status == status))
            .collect();
        matching.sort_by(|a, b| {
            apply_order(a.created_at.cmp(&b.created_at), filter.sort_order).then(a.id.cmp(&b.id))
        });

        let total = matching.len() as u64;
        let items = page_of(matching, page)
            .into_iter()
            .map(|order| tables.order_details(order))
            .collect::<AppResult<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> AppResult<Option<OrderDetails>> {
        let mut tables = self.tables.write().await;
        let Some(order) = tables.orders.get_mut(&id) else {
            return Ok(None);
        };
        order.status = status;
        order.updated_at = Utc::now();
        let order = order.clone();
        tables.order_details(&order).map(Some)
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn create(&self, review: NewReview) -> AppResult<ReviewDetails> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .reviews
            .values()
            .any(|r| r.user_id == review.user_id && r.product_id == review.product_id);
        if duplicate {
            return Err(already_exists());
        }
        if !tables.users.contains_key(&review.user_id)
            || !tables.products.contains_key(&review.product_id)
        {
            return Err(still_referenced());
        }
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            user_id: review.user_id,
            product_id: review.product_id,
            rating: review.rating,
            comment: review.comment,
            created_at: now,
            updated_at: now,
        };
        tables.reviews.insert(review.id, review.clone());
        Ok(tables.review_details(&review))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn find_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<ReviewDetails>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .find(|r| r.user_id == user_id && r.product_id == product_id)
            .map(|r| tables.review_details(r)))
    }

    async fn list_for_product(&self, product_id: Uuid) -> AppResult<Vec<ReviewDetails>> {
        let tables = self.tables.read().await;
        let mut reviews: Vec<&Review> = tables
            .reviews
            .values()
            .filter(|r| r.product_id == product_id)
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(reviews.into_iter().map(|r| tables.review_details(r)).collect())
    }

    async fn update(&self, review: Review) -> AppResult<ReviewDetails> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .reviews
            .get_mut(&review.id)
            .ok_or_else(|| AppError::not_found("Review"))?;
        stored.rating = review.rating;
        stored.comment = review.comment;
        stored.updated_at = Utc::now();
        let stored = stored.clone();
        Ok(tables.review_details(&stored))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(store: &MemoryStore, email: &str) -> User {
        UserRepository::create(
            store,
            NewUser {
                email: email.into(),
                password_hash: "hash".into(),
                role: Default::default(),
            },
        )
        .await
        .unwrap()
    }

    async fn seed_product(store: &MemoryStore, name: &str, price: i64, stock: i32) -> Product {
        ProductRepository::create(
            store,
            NewProduct {
                name: name.into(),
                description: None,
                price,
                stock,
                image_url: None,
                category_id: None,
            },
        )
        .await
        .unwrap()
        .product
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let store = MemoryStore::new();
        seed_user(&store, "a@example.com").await;
        let err = UserRepository::create(
            &store,
            NewUser {
                email: "a@example.com".into(),
                password_hash: "x".into(),
                role: Default::default(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn placing_an_order_decrements_stock() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "buyer@example.com").await;
        let cream = seed_product(&store, "Cream", 2999, 5).await;

        let placed = store
            .place_order(user.id, &[OrderLine { product_id: cream.id, quantity: 2 }])
            .await
            .unwrap();

        assert_eq!(placed.order.total_amount, 5998);
        assert_eq!(placed.order.status, OrderStatus::Pending);
        assert_eq!(placed.items.len(), 1);
        assert_eq!(placed.items[0].item.price, 2999);
        let stored = ProductRepository::find_by_id(&store, cream.id).await.unwrap().unwrap();
        assert_eq!(stored.product.stock, 3);
    }

    #[tokio::test]
    async fn failed_order_leaves_stock_untouched() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "buyer@example.com").await;
        let serum = seed_product(&store, "Serum", 4999, 5).await;
        let gel = seed_product(&store, "Gel", 1599, 1).await;

        let err = store
            .place_order(
                user.id,
                &[
                    OrderLine { product_id: serum.id, quantity: 2 },
                    OrderLine { product_id: gel.id, quantity: 3 },
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let serum = ProductRepository::find_by_id(&store, serum.id).await.unwrap().unwrap();
        assert_eq!(serum.product.stock, 5);
        let (orders, total) = OrderRepository::list(
            &store,
            &OrderFilter::default(),
            Page { page: 1, limit: 10 },
        )
        .await
        .unwrap();
        assert!(orders.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn ordered_products_cannot_be_deleted() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "buyer@example.com").await;
        let lotion = seed_product(&store, "Lotion", 2499, 5).await;
        store
            .place_order(user.id, &[OrderLine { product_id: lotion.id, quantity: 1 }])
            .await
            .unwrap();

        let err = ProductRepository::delete(&store, lotion.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_a_category_unlinks_its_products() {
        let store = MemoryStore::new();
        let category = CategoryRepository::create(&store, "Skincare".into()).await.unwrap();
        let product = ProductRepository::create(
            &store,
            NewProduct {
                name: "Toner".into(),
                description: None,
                price: 1299,
                stock: 3,
                image_url: None,
                category_id: Some(category.id),
            },
        )
        .await
        .unwrap();
        assert_eq!(product.category.as_ref().map(|c| c.id), Some(category.id));

        assert!(CategoryRepository::delete(&store, category.id).await.unwrap());
        let product = ProductRepository::find_by_id(&store, product.product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(product.product.category_id, None);
        assert!(product.category.is_none());
    }

    #[tokio::test]
    async fn product_listing_filters_and_pages() {
        let store = MemoryStore::new();
        for i in 0..15 {
            seed_product(&store, &format!("Soap {i:02}"), 100 + i, 1).await;
        }
        seed_product(&store, "Shampoo", 5000, 1).await;

        let filter = ProductFilter {
            q: Some("soap".into()),
            sort_by: ProductSortBy::Price,
            sort_order: SortOrder::Asc,
            ..Default::default()
        };
        let (items, total) = ProductRepository::list(&store, &filter, Page { page: 2, limit: 10 })
            .await
            .unwrap();
        assert_eq!(total, 15);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].product.price, 110);

        let filter = ProductFilter {
            min_price: Some(1000),
            ..Default::default()
        };
        let (items, total) = ProductRepository::list(&store, &filter, Page { page: 1, limit: 10 })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].product.name, "Shampoo");
    }

    #[tokio::test]
    async fn one_review_per_user_and_product() {
        let store = MemoryStore::new();
        let user = seed_user(&store, "reviewer@example.com").await;
        let product = seed_product(&store, "Mask", 999, 1).await;
        let review = NewReview {
            user_id: user.id,
            product_id: product.id,
            rating: 4,
            comment: None,
        };

        let created = ReviewRepository::create(&store, review.clone()).await.unwrap();
        assert_eq!(created.user_email, "reviewer@example.com");
        let err = ReviewRepository::create(&store, review).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
