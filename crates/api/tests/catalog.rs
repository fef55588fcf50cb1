//! User and product CRUD behavior.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn create_user_requires_fields() {
    let app = spawn_app().await;

    let response = app
        .post("/users/create", None, json!({ "username": "ada" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Username, email, and password are required."
    );
}

#[tokio::test]
async fn duplicate_user_conflicts() {
    let app = spawn_app().await;

    let body = json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "correct horse",
    });

    let first = app.post("/users/create", None, body.clone()).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.post("/users/create", None, body).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"], "Username or email already exists.");
}

#[tokio::test]
async fn get_unknown_user_is_404() {
    let app = spawn_app().await;

    let response = app.get("/users/999", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "User not found.");
}

#[tokio::test]
async fn update_user_is_partial() {
    let app = spawn_app().await;
    let (id, _) = app.signup("ada", "ada@example.com", "correct horse").await;

    let response = app
        .put(&format!("/users/{id}/update"), json!({ "username": "lovelace" }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "lovelace");
    assert_eq!(response.body["email"], "ada@example.com");
}

#[tokio::test]
async fn delete_user_cascades() {
    let app = spawn_app().await;
    let (user_id, _) = app.signup("ada", "ada@example.com", "correct horse").await;
    let product_id = app.create_product("Keyboard", 49.99).await;

    let order = app
        .post(
            "/orders/create",
            None,
            json!({ "user_id": user_id, "product_id": product_id, "quantity": 2 }),
        )
        .await;
    assert_eq!(order.status, StatusCode::CREATED);

    let cart = app
        .post(
            "/carts/create",
            None,
            json!({ "user_id": user_id, "product_id": product_id, "quantity": 1 }),
        )
        .await;
    assert_eq!(cart.status, StatusCode::CREATED);

    let deleted = app.delete(&format!("/users/{user_id}/delete")).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "User deleted successfully.");

    let orders = app.get("/orders", None).await;
    assert_eq!(orders.body.as_array().map(Vec::len), Some(0));

    let carts = app.get("/carts", None).await;
    assert_eq!(carts.body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn create_product_defaults() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/products/create",
            None,
            json!({ "name": "Keyboard", "price": 49.99 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["amount_in_stock"], 0);
    assert_eq!(response.body["stock_status"], "out_of_stock");
    assert_eq!(response.body["image_path"], serde_json::Value::Null);
}

#[tokio::test]
async fn create_product_requires_name_and_price() {
    let app = spawn_app().await;

    let missing = app
        .post("/products/create", None, json!({ "name": "Keyboard" }))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"], "Name and price are required.");

    // Zero price counts as missing; historical truthiness check.
    let zero = app
        .post(
            "/products/create",
            None,
            json!({ "name": "Keyboard", "price": 0 }),
        )
        .await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    assert_eq!(zero.body["error"], "Name and price are required.");
}

#[tokio::test]
async fn stock_status_tracks_quantity() {
    let app = spawn_app().await;
    let id = app.create_product("Keyboard", 49.99).await;

    let low = app
        .put(&format!("/products/{id}/update"), json!({ "amount_in_stock": 3 }))
        .await;
    assert_eq!(low.body["stock_status"], "low_stock");

    let boundary = app
        .put(&format!("/products/{id}/update"), json!({ "amount_in_stock": 5 }))
        .await;
    assert_eq!(boundary.body["stock_status"], "low_stock");

    let high = app
        .put(&format!("/products/{id}/update"), json!({ "amount_in_stock": 6 }))
        .await;
    assert_eq!(high.body["stock_status"], "in_stock");
}

#[tokio::test]
async fn get_unknown_product_is_404() {
    let app = spawn_app().await;

    let response = app.get("/products/999", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Product not found.");
}

#[tokio::test]
async fn delete_product_cascades_orders() {
    let app = spawn_app().await;
    let (user_id, _) = app.signup("ada", "ada@example.com", "correct horse").await;
    let product_id = app.create_product("Keyboard", 49.99).await;

    let order = app
        .post(
            "/orders/create",
            None,
            json!({ "user_id": user_id, "product_id": product_id, "quantity": 1 }),
        )
        .await;
    assert_eq!(order.status, StatusCode::CREATED);

    let deleted = app.delete(&format!("/products/{product_id}/delete")).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Product deleted successfully.");

    let orders = app.get("/orders", None).await;
    assert_eq!(orders.body.as_array().map(Vec::len), Some(0));
}
