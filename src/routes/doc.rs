use utoipa::{
    Modify, OpenApi,
    openapi::{
        self, OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest},
        categories::{CategoryList, CategoryRequest, CategoryResponse},
        orders::{
            CreateOrderRequest, OrderItemRequest, OrderItemResponse, OrderList, OrderResponse,
            UpdateOrderStatusRequest,
        },
        products::{PatchProductRequest, ProductList, ProductRequest, ProductResponse},
        reviews::{ProductReviewsResponse, ReviewRequest, ReviewResponse, UpdateReviewRequest},
        users::{UpdateUserRequest, UserList, UserRequest, UserResponse},
    },
    models::{OrderStatus, ProductSortBy, Role, SortOrder},
    response::{ApiResponse, Meta},
    routes::{auth, categories, health, orders, products, reviews, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        description = "Catalog, orders and reviews for an online shop. Prices are integer cents."
    ),
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        users::create_user,
        users::get_user,
        users::update_user,
        users::list_users,
        users::delete_user,
        products::list_products,
        products::get_product,
        products::create_product,
        products::replace_product,
        products::patch_product,
        products::delete_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::list_all_orders,
        orders::update_order_status,
        reviews::upsert_review,
        reviews::list_product_reviews,
        reviews::get_my_review,
        reviews::update_review,
        reviews::delete_review
    ),
    components(
        schemas(
            Role,
            OrderStatus,
            SortOrder,
            ProductSortBy,
            Meta,
            LoginRequest,
            AuthResponse,
            UserRequest,
            UpdateUserRequest,
            UserResponse,
            UserList,
            CategoryRequest,
            CategoryResponse,
            CategoryList,
            ProductRequest,
            PatchProductRequest,
            ProductResponse,
            ProductList,
            CreateOrderRequest,
            OrderItemRequest,
            OrderItemResponse,
            OrderResponse,
            OrderList,
            UpdateOrderStatusRequest,
            ReviewRequest,
            UpdateReviewRequest,
            ReviewResponse,
            ProductReviewsResponse,
            ApiResponse<ProductResponse>,
            ApiResponse<ProductList>,
            ApiResponse<OrderResponse>,
            ApiResponse<OrderList>,
            ApiResponse<AuthResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and current user"),
        (name = "Users", description = "Account endpoints"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Categories", description = "Category management (admin)"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Reviews", description = "Product reviews"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
