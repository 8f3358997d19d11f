//! Persistence interfaces, one trait per aggregate.
//!
//! Services only talk to these traits. `postgres` backs them with SeaORM and
//! `memory` keeps everything in a single lock-guarded store for tests.
//! Implementations enforce the same uniqueness and referential rules as the
//! SQL schema so both behave identically at the service boundary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Category, NewProduct, NewReview, NewUser, OrderDetails, OrderFilter, OrderLine,
        OrderStatus, Page, Product, ProductDetails, ProductFilter, Review, ReviewDetails, User,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    /// Persist email, password hash and role of an existing user.
    async fn update(&self, user: User) -> AppResult<User>;

    /// Returns false when no user had this id.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, name: String) -> AppResult<Category>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    async fn list(&self) -> AppResult<Vec<Category>>;

    async fn update(&self, category: Category) -> AppResult<Category>;

    /// Products of a deleted category keep existing without a category.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> AppResult<ProductDetails>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ProductDetails>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Product>>;

    /// One page of products matching `filter`, plus the total match count.
    async fn list(&self, filter: &ProductFilter, page: Page)
    -> AppResult<(Vec<ProductDetails>, u64)>;

    async fn update(&self, product: Product) -> AppResult<ProductDetails>;

    /// Fails with `Conflict` while order items still reference the product.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Atomically check stock, write the order with its items and decrement
    /// stock. Either everything is persisted or nothing is.
    async fn place_order(&self, user_id: Uuid, lines: &[OrderLine]) -> AppResult<OrderDetails>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<OrderDetails>>;

    async fn list(&self, filter: &OrderFilter, page: Page) -> AppResult<(Vec<OrderDetails>, u64)>;

    async fn update_status(&self, id: Uuid, status: OrderStatus)
    -> AppResult<Option<OrderDetails>>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: NewReview) -> AppResult<ReviewDetails>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>>;

    async fn find_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<ReviewDetails>>;

    async fn list_for_product(&self, product_id: Uuid) -> AppResult<Vec<ReviewDetails>>;

    /// Persist rating and comment of an existing review.
    async fn update(&self, review: Review) -> AppResult<ReviewDetails>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}
