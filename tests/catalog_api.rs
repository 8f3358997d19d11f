mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use shop_api::models::Role;
use uuid::Uuid;

#[tokio::test]
async fn second_page_of_fifteen_products() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("admin@example.com", Role::Admin).await;
    for i in 0..15 {
        app.product(&admin_token, &format!("Product {i:02}"), 1000 + i, 5)
            .await;
    }

    let (status, body) = app.get("/products?page=2&limit=10", Some(&admin_token)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["total"], 15);
    assert_eq!(body["meta"]["totalPages"], 2);
    assert_eq!(body["meta"]["hasNext"], false);
    assert_eq!(body["meta"]["hasPrev"], true);
}

#[tokio::test]
async fn product_listing_filters_and_sorts() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("admin@example.com", Role::Admin).await;
    app.product(&admin_token, "Gel douche relaxant", 1599, 80).await;
    app.product(&admin_token, "Shampooing réparateur", 1999, 60).await;
    app.product(&admin_token, "Sérum anti-âge", 4999, 30).await;

    let (status, body) = app
        .get("/products?q=SHAMPOO", Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Shampooing réparateur");

    let (_, body) = app
        .get("/products?sortBy=price&sortOrder=asc&maxPrice=2000", Some(&admin_token))
        .await;
    let prices: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price"].as_i64().unwrap())
        .collect();
    assert_eq!(prices, vec![1599, 1999]);

    let (status, _) = app
        .get("/products?minPrice=5000&maxPrice=100", Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn products_are_linked_to_categories() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("admin@example.com", Role::Admin).await;

    let (_, body) = app
        .post("/admin/categories", Some(&admin_token), json!({ "name": "Visage" }))
        .await;
    let category_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/admin/products",
            Some(&admin_token),
            json!({
                "name": "Crème hydratante visage",
                "description": "Crème quotidienne",
                "price": 2999,
                "stock": 50,
                "imageUrl": "https://example.com/images/creme.jpg",
                "categoryId": category_id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["category"]["name"], "Visage");
    let product_id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = app
        .get(&format!("/products?categoryId={category_id}"), Some(&admin_token))
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .patch(
            &format!("/admin/products/{product_id}"),
            Some(&admin_token),
            json!({ "categoryId": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["categoryId"].is_null());
    assert!(body["data"]["category"].is_null());

    let (status, _) = app
        .post(
            "/admin/products",
            Some(&admin_token),
            json!({ "name": "Orphan", "price": 100, "stock": 1, "categoryId": Uuid::new_v4() }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_writes_are_validated() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("admin@example.com", Role::Admin).await;
    let id = app.product(&admin_token, "Soin après-rasage", 2499, 40).await;

    let (status, _) = app
        .post(
            "/admin/products",
            Some(&admin_token),
            json!({ "name": "Soin après-rasage", "price": 100, "stock": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post(
            "/admin/products",
            Some(&admin_token),
            json!({ "name": "Free", "price": 0, "stock": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .patch(&format!("/admin/products/{id}"), Some(&admin_token), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .patch(
            &format!("/admin/products/{id}"),
            Some(&admin_token),
            json!({ "stock": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(
            &format!("/admin/products/{id}"),
            Some(&admin_token),
            json!({ "name": "Soin après-rasage", "price": 2699, "stock": 35 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 2699);
    assert_eq!(body["data"]["stock"], 35);
}

#[tokio::test]
async fn deleting_missing_resources_is_not_found() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("admin@example.com", Role::Admin).await;
    let missing = Uuid::new_v4();

    let (status, _) = app
        .delete(&format!("/admin/categories/{missing}"), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .delete(&format!("/admin/products/{missing}"), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = app.product(&admin_token, "Temporary", 500, 1).await;
    let (status, body) = app
        .delete(&format!("/admin/products/{id}"), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.get(&format!("/products/{id}"), Some(&admin_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_names_are_unique() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("admin@example.com", Role::Admin).await;

    let (_, body) = app
        .post("/admin/categories", Some(&admin_token), json!({ "name": "Corps" }))
        .await;
    let corps = body["data"]["id"].as_str().unwrap().to_string();
    app.post("/admin/categories", Some(&admin_token), json!({ "name": "Cheveux" }))
        .await;

    let (status, _) = app
        .post("/admin/categories", Some(&admin_token), json!({ "name": "Corps" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .put(
            &format!("/admin/categories/{corps}"),
            Some(&admin_token),
            json!({ "name": "Cheveux" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .put(
            &format!("/admin/categories/{corps}"),
            Some(&admin_token),
            json!({ "name": "Corps & bain" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Corps & bain");

    let (_, body) = app.get("/admin/categories", Some(&admin_token)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn pages_past_the_end_are_empty() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("admin@example.com", Role::Admin).await;
    app.product(&admin_token, "Crème mains", 899, 10).await;

    let (status, body) = app
        .get(
            "/products?page=9223372036854775807&limit=100",
            Some(&admin_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["meta"]["hasNext"], false);

    let (status, body) = app
        .get("/orders?page=9223372036854775807", Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("admin@example.com", Role::Admin).await;
    app.product(&admin_token, "Coffret remise 50%", 3999, 5).await;
    app.product(&admin_token, "Gel_douche", 1599, 5).await;
    app.product(&admin_token, "Lotion", 2499, 5).await;

    let (_, body) = app.get("/products?q=%25", Some(&admin_token)).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Coffret remise 50%");

    let (_, body) = app.get("/products?q=_", Some(&admin_token)).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Gel_douche");
}

#[tokio::test]
async fn malformed_paths_and_queries_use_the_error_envelope() {
    let app = TestApp::new();
    let (_, admin_token) = app.account("admin@example.com", Role::Admin).await;

    for uri in [
        "/products?page=abc",
        "/products?sortBy=popularity",
        "/products/not-a-uuid",
        "/orders?limit=ten",
        "/admin/orders?page=-x",
        "/admin/categories/not-a-uuid",
    ] {
        let (status, body) = app.get(uri, Some(&admin_token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["data"]["error"].is_string(), "{uri}: {body}");
    }
}
