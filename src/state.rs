use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    repository::{
        CategoryRepository, MemoryStore, OrderRepository, ProductRepository, ReviewRepository,
        UserRepository, postgres::PgRepository,
    },
    security::TokenService,
};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn postgres(orm: DatabaseConnection, tokens: TokenService) -> Self {
        let repo = Arc::new(PgRepository::new(orm));
        Self {
            users: repo.clone(),
            categories: repo.clone(),
            products: repo.clone(),
            orders: repo.clone(),
            reviews: repo,
            tokens,
        }
    }

    pub fn in_memory(tokens: TokenService) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            categories: store.clone(),
            products: store.clone(),
            orders: store.clone(),
            reviews: store,
            tokens,
        }
    }
}
