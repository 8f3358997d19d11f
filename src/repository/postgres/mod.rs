//! SeaORM-backed repositories.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    entity::{categories, order_items, orders, products, reviews, users},
    error::{AppError, AppResult},
    models::{Category, Order, OrderItem, Product, Review, User},
};

mod categories_repo;
mod orders_repo;
mod products_repo;
mod reviews_repo;
mod users_repo;

/// One handle implementing every repository trait over a shared connection pool.
#[derive(Clone)]
pub struct PgRepository {
    db: DatabaseConnection,
}

impl PgRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn corrupt(what: &str, value: &str) -> AppError {
    AppError::Internal(anyhow::anyhow!("stored {what} is invalid: {value}"))
}

fn user_from_entity(model: users::Model) -> AppResult<User> {
    let role = model.role.parse().map_err(|_| corrupt("role", &model.role))?;
    Ok(User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        role,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn category_from_entity(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn product_from_entity(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        stock: model.stock,
        image_url: model.image_url,
        category_id: model.category_id,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn order_from_entity(model: orders::Model) -> AppResult<Order> {
    let status = model
        .status
        .parse()
        .map_err(|_| corrupt("order status", &model.status))?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        order_date: model.order_date.with_timezone(&Utc),
        total_amount: model.total_amount,
        status,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn order_item_from_entity(model: order_items::Model) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
    }
}

fn review_from_entity(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        rating: model.rating,
        comment: model.comment,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
