use std::collections::HashMap;

use shop_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    models::{NewProduct, NewUser, Role},
    security::{TokenService, hash_password},
    state::AppState,
};
use uuid::Uuid;

const CATEGORIES: [&str; 4] = ["Visage", "Corps", "Cheveux", "Homme"];

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    stock: i32,
    image_url: &'static str,
    category: &'static str,
}

const PRODUCTS: [SeedProduct; 5] = [
    SeedProduct {
        name: "Crème hydratante visage",
        description: "Crème hydratante quotidienne pour tous les types de peaux. Formule enrichie en acide hyaluronique.",
        price: 2999,
        stock: 50,
        image_url: "https://example.com/images/creme-hydratante.jpg",
        category: "Visage",
    },
    SeedProduct {
        name: "Sérum anti-âge",
        description: "Sérum concentré en peptides et vitamines pour réduire les signes de l'âge.",
        price: 4999,
        stock: 30,
        image_url: "https://example.com/images/serum-antiage.jpg",
        category: "Visage",
    },
    SeedProduct {
        name: "Gel douche relaxant",
        description: "Gel douche parfumé à la lavande pour un moment de détente quotidien.",
        price: 1599,
        stock: 80,
        image_url: "https://example.com/images/gel-douche.jpg",
        category: "Corps",
    },
    SeedProduct {
        name: "Shampooing réparateur",
        description: "Shampooing intensif pour cheveux abîmés, enrichi en kératine et protéines.",
        price: 1999,
        stock: 60,
        image_url: "https://example.com/images/shampooing.jpg",
        category: "Cheveux",
    },
    SeedProduct {
        name: "Soin après-rasage",
        description: "Lotion apaisante après-rasage pour homme, réduit les irritations.",
        price: 2499,
        stock: 40,
        image_url: "https://example.com/images/apres-rasage.jpg",
        category: "Homme",
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let state = AppState::postgres(
        orm,
        TokenService::new(&config.jwt_secret, config.jwt_expiry_hours),
    );

    let admin_email =
        std::env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let admin_password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let admin_id = ensure_admin(&state, &admin_email, &admin_password).await?;
    let categories = seed_categories(&state).await?;
    seed_products(&state, &categories).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

/// Create the admin account, or promote an existing account with that email.
async fn ensure_admin(state: &AppState, email: &str, password: &str) -> anyhow::Result<Uuid> {
    if let Some(mut user) = state.users.find_by_email(email).await? {
        if user.role != Role::Admin {
            user.role = Role::Admin;
            user = state.users.update(user).await?;
            println!("Promoted {email} to ADMIN");
        } else {
            println!("Admin already exists: {email}");
        }
        return Ok(user.id);
    }

    let user = state
        .users
        .create(NewUser {
            email: email.to_string(),
            password_hash: hash_password(password)?,
            role: Role::Admin,
        })
        .await?;
    println!("Created admin {email}");
    Ok(user.id)
}

async fn seed_categories(state: &AppState) -> anyhow::Result<HashMap<&'static str, Uuid>> {
    let mut ids = HashMap::new();
    for name in CATEGORIES {
        let category = match state.categories.find_by_name(name).await? {
            Some(existing) => existing,
            None => {
                println!("Created category {name}");
                state.categories.create(name.to_string()).await?
            }
        };
        ids.insert(name, category.id);
    }
    Ok(ids)
}

async fn seed_products(
    state: &AppState,
    categories: &HashMap<&'static str, Uuid>,
) -> anyhow::Result<()> {
    for product in &PRODUCTS {
        if state.products.find_by_name(product.name).await?.is_some() {
            println!("Product already exists: {}", product.name);
            continue;
        }
        state
            .products
            .create(NewProduct {
                name: product.name.to_string(),
                description: Some(product.description.to_string()),
                price: product.price,
                stock: product.stock,
                image_url: Some(product.image_url.to_string()),
                category_id: categories.get(product.category).copied(),
            })
            .await?;
        println!("Created product {}", product.name);
    }
    Ok(())
}
