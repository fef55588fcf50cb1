//! Payment route validation and product image upload.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn initialize_requires_email_and_amount() {
    let app = spawn_app().await;

    let response = app
        .post("/paystack/initialize", None, json!({ "email": "a@b.com" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Email and amount are required.");
}

#[tokio::test]
async fn initialize_rejects_non_numeric_amount() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/paystack/initialize",
            None,
            json!({ "email": "a@b.com", "amount": "a lot" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Amount must be a number.");
}

#[tokio::test]
async fn initialize_without_gateway_is_bad_gateway() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/paystack/initialize",
            None,
            json!({ "email": "a@b.com", "amount": 19.99 }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.body["error"], "Payment gateway is not configured.");
}

#[tokio::test]
async fn callback_requires_reference() {
    let app = spawn_app().await;

    let response = app.get("/paystack/callback", None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Reference is required.");
}

#[tokio::test]
async fn upload_requires_image_and_product_id() {
    let app = spawn_app().await;

    let response = app
        .upload(&[("product_id", None, b"1".as_slice())])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Image file and product_id are required.");
}

#[tokio::test]
async fn upload_rejects_empty_filename() {
    let app = spawn_app().await;
    let product_id = app.create_product("Keyboard", 49.99).await;

    let response = app
        .upload(&[
            ("image", Some(""), b"pngdata".as_slice()),
            ("product_id", None, product_id.to_string().as_bytes()),
        ])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No selected file.");
}

#[tokio::test]
async fn upload_unknown_product_is_404() {
    let app = spawn_app().await;

    let response = app
        .upload(&[
            ("image", Some("photo.png"), b"pngdata".as_slice()),
            ("product_id", None, b"999".as_slice()),
        ])
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Product not found.");
}

#[tokio::test]
async fn upload_stores_file_and_rewrites_image_path() {
    let app = spawn_app().await;
    let product_id = app.create_product("Keyboard", 49.99).await;

    let response = app
        .upload(&[
            ("image", Some("photo.png"), b"pngdata".as_slice()),
            ("product_id", None, product_id.to_string().as_bytes()),
        ])
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["message"], "Image uploaded successfully.");

    let image_path = response.body["image_path"].as_str().expect("image path");
    assert!(image_path.contains(&format!("product_{product_id}_")));
    assert!(image_path.ends_with("photo.png"));

    let stored = tokio::fs::read(image_path).await.expect("file written");
    assert_eq!(stored, b"pngdata");

    let product = app.get(&format!("/products/{product_id}"), None).await;
    assert_eq!(product.body["image_path"], image_path);

    tokio::fs::remove_dir_all(&app.upload_dir).await.ok();
}
