use shop_api::{
    db::{create_orm_conn, run_migrations},
    dto::{
        orders::{CreateOrderRequest, OrderItemRequest, UpdateOrderStatusRequest},
        products::ProductRequest,
        reviews::ReviewRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{NewUser, OrderStatus, Role},
    security::TokenService,
    services::{order_service, product_service, review_service},
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

// Order placement against Postgres: stock is taken inside the transaction and
// a failed order rolls back every line.
#[tokio::test]
async fn order_placement_against_postgres() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let buyer = create_user(&state, "buyer@example.com", Role::User).await?;
    let admin = create_user(&state, "admin@example.com", Role::Admin).await?;

    let cream = create_product(&state, "Crème hydratante", 2999, 5).await?;
    let gel = create_product(&state, "Gel douche", 1599, 1).await?;

    // Two lines for the same product are merged.
    let placed = order_service::create_order(
        &state,
        &buyer,
        CreateOrderRequest {
            items: vec![
                OrderItemRequest {
                    product_id: cream,
                    quantity: 1,
                },
                OrderItemRequest {
                    product_id: cream,
                    quantity: 1,
                },
            ],
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(placed.total_amount, 5998);
    assert_eq!(placed.status, OrderStatus::Pending);
    assert_eq!(placed.order_items.len(), 1);
    assert_eq!(placed.order_items[0].quantity, 2);
    assert_eq!(stock_of(&state, cream).await?, 3);

    // The cream line fits but the gel line does not; nothing is written.
    let err = order_service::create_order(
        &state,
        &buyer,
        CreateOrderRequest {
            items: vec![
                OrderItemRequest {
                    product_id: cream,
                    quantity: 2,
                },
                OrderItemRequest {
                    product_id: gel,
                    quantity: 2,
                },
            ],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(stock_of(&state, cream).await?, 3);
    assert_eq!(stock_of(&state, gel).await?, 1);

    let mine = order_service::list_orders(&state, &buyer, Default::default()).await?;
    assert_eq!(mine.meta.expect("meta").total, Some(1));

    let shipped = order_service::update_order_status(
        &state,
        placed.id,
        UpdateOrderStatusRequest {
            status: "SHIPPED".into(),
        },
    )
    .await?
    .data
    .expect("order");
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let missing = order_service::update_order_status(
        &state,
        Uuid::new_v4(),
        UpdateOrderStatusRequest {
            status: "DELIVERED".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));

    // Another buyer cannot see the order; the admin can.
    let other = create_user(&state, "other@example.com", Role::User).await?;
    let hidden = order_service::get_order(&state, &other, placed.id)
        .await
        .unwrap_err();
    assert!(matches!(hidden, AppError::NotFound(_)));
    order_service::get_order(&state, &admin, placed.id).await?;

    // Ordered products are protected by the foreign key.
    let err = product_service::delete_product(&state, cream)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Reviewing twice keeps a single row.
    let (_, created) = review_service::upsert_review(
        &state,
        &buyer,
        cream,
        ReviewRequest {
            rating: 4,
            comment: Some("Très douce".into()),
        },
    )
    .await?;
    assert!(created);
    let (_, created) = review_service::upsert_review(
        &state,
        &buyer,
        cream,
        ReviewRequest {
            rating: 5,
            comment: None,
        },
    )
    .await?;
    assert!(!created);
    let summary = review_service::list_product_reviews(&state, cream)
        .await?
        .data
        .expect("reviews");
    assert_eq!(summary.total_reviews, 1);
    assert_eq!(summary.average_rating, 5.0);

    // Two buyers race for the last unit: the row lock lets exactly one through.
    let balm = create_product(&state, "Baume à lèvres", 799, 1).await?;
    let last_unit = || CreateOrderRequest {
        items: vec![OrderItemRequest {
            product_id: balm,
            quantity: 1,
        }],
    };
    let (first, second) = tokio::join!(
        order_service::create_order(&state, &buyer, last_unit()),
        order_service::create_order(&state, &other, last_unit()),
    );
    let (won, lost): (Vec<_>, Vec<_>) = [first, second].into_iter().partition(Result::is_ok);
    assert_eq!(won.len(), 1);
    assert_eq!(lost.len(), 1);
    assert!(matches!(
        lost.into_iter().next().and_then(Result::err),
        Some(AppError::BadRequest(_))
    ));
    assert_eq!(stock_of(&state, balm).await?, 0);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE reviews, order_items, orders, products, categories, users CASCADE",
    ))
    .await?;

    Ok(AppState::postgres(orm, TokenService::new("test-secret", 1)))
}

async fn create_user(state: &AppState, email: &str, role: Role) -> anyhow::Result<AuthUser> {
    let user = state
        .users
        .create(NewUser {
            email: email.to_string(),
            password_hash: "dummy".into(),
            role,
        })
        .await?;

    Ok(AuthUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
    })
}

async fn create_product(
    state: &AppState,
    name: &str,
    price: i64,
    stock: i32,
) -> anyhow::Result<Uuid> {
    let product = product_service::create_product(
        state,
        ProductRequest {
            name: name.to_string(),
            description: None,
            price,
            stock,
            image_url: None,
            category_id: None,
        },
    )
    .await?
    .data
    .expect("product");
    Ok(product.id)
}

async fn stock_of(state: &AppState, id: Uuid) -> anyhow::Result<i32> {
    let product = state
        .products
        .find_by_id(id)
        .await?
        .expect("product exists");
    Ok(product.product.stock)
}
