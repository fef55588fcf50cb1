//! Signup, login, session lifecycle, and email verification.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn signup_establishes_session() {
    let app = spawn_app().await;

    let (_, cookie) = app.signup("ada", "ada@example.com", "correct horse").await;

    let response = app.get("/check-session", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "ada@example.com");
    assert_eq!(response.body["is_verified"], false);
}

#[tokio::test]
async fn signup_requires_all_fields() {
    let app = spawn_app().await;

    let response = app
        .post("/signup", None, json!({ "username": "ada", "email": "" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Username, email, and password are required."
    );
}

#[tokio::test]
async fn signup_never_serializes_secrets() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/signup",
            None,
            json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": "correct horse",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.body.as_object().expect("object body");
    assert!(!body.contains_key("password_hash"));
    assert!(!body.contains_key("password"));
    assert!(!body.contains_key("verification_token"));
}

#[tokio::test]
async fn login_round_trip() {
    let app = spawn_app().await;
    app.signup("ada", "ada@example.com", "correct horse").await;

    let response = app
        .post(
            "/login",
            None,
            json!({ "email": "ada@example.com", "password": "correct horse" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let cookie = response.cookie.expect("session cookie");

    let profile = app.get("/profile", Some(&cookie)).await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["username"], "ada");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    app.signup("ada", "ada@example.com", "correct horse").await;

    let wrong_password = app
        .post(
            "/login",
            None,
            json!({ "email": "ada@example.com", "password": "wrong" }),
        )
        .await;
    let unknown_email = app
        .post(
            "/login",
            None,
            json!({ "email": "nobody@example.com", "password": "wrong" }),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["error"], "Invalid email or password.");
}

#[tokio::test]
async fn logout_clears_session() {
    let app = spawn_app().await;
    let (_, cookie) = app.signup("ada", "ada@example.com", "correct horse").await;

    let response = app
        .request(axum::http::Method::POST, "/logout", Some(&cookie), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Logged out successfully.");

    let after = app.get("/check-session", Some(&cookie)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_requires_session() {
    let app = spawn_app().await;

    let response = app
        .request(axum::http::Method::POST, "/logout", None, None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Authentication required.");
}

#[tokio::test]
async fn deleted_user_invalidates_session() {
    let app = spawn_app().await;
    let (id, cookie) = app.signup("ada", "ada@example.com", "correct horse").await;

    let deleted = app.delete(&format!("/users/{id}/delete")).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let response = app.get("/check-session", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_dashboard_is_gated() {
    let app = spawn_app().await;

    let anonymous = app.get("/admin/dashboard", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let (_, cookie) = app.signup("ada", "ada@example.com", "correct horse").await;
    let non_admin = app.get("/admin/dashboard", Some(&cookie)).await;
    assert_eq!(non_admin.status, StatusCode::FORBIDDEN);
    assert_eq!(non_admin.body["error"], "Admin privileges required.");

    let created = app
        .post(
            "/users/create",
            None,
            json!({
                "username": "root",
                "email": "root@example.com",
                "password": "correct horse",
                "is_admin": true,
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let login = app
        .post(
            "/login",
            None,
            json!({ "email": "root@example.com", "password": "correct horse" }),
        )
        .await;
    let admin_cookie = login.cookie.expect("session cookie");

    let dashboard = app.get("/admin/dashboard", Some(&admin_cookie)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
}

async fn stored_token(app: &common::TestApp, user_id: i64) -> Option<String> {
    sqlx::query_scalar("SELECT verification_token FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_one(&app.pool)
        .await
        .expect("user row exists")
}

#[tokio::test]
async fn verify_email_consumes_token_once() {
    let app = spawn_app().await;
    let (id, _) = app.signup("ada", "ada@example.com", "correct horse").await;

    let token = stored_token(&app, id).await.expect("token issued at signup");

    let response = app
        .post("/verify-email", None, json!({ "token": token }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["is_verified"], true);

    assert_eq!(stored_token(&app, id).await, None);

    let replay = app
        .post("/verify-email", None, json!({ "token": token }))
        .await;
    assert_eq!(replay.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        replay.body["error"],
        "Invalid or expired verification token."
    );
}

#[tokio::test]
async fn verify_email_requires_token() {
    let app = spawn_app().await;

    let response = app.post("/verify-email", None, json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Verification token is required.");
}

#[tokio::test]
async fn home_and_health() {
    let app = spawn_app().await;

    let home = app.get("/", None).await;
    assert_eq!(home.status, StatusCode::OK);
    assert_eq!(home.body["message"], "Welcome to the Tech-Hub API");

    let health = app.get("/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
}
