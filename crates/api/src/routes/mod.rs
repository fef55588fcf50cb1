//! HTTP route handlers.
//!
//! Handlers stay thin: decode the payload, call a repository or service,
//! translate the result into the JSON envelope. Error bodies are always
//! `{"error": "..."}` via `ApiError`.

pub mod admin;
pub mod auth;
pub mod carts;
pub mod orders;
pub mod payments;
pub mod products;
pub mod uploads;
pub mod users;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::state::AppState;

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .merge(auth::router())
        .merge(admin::router())
        .merge(uploads::router())
        .merge(payments::router())
        .nest("/users", users::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .nest("/carts", carts::router())
}

async fn home() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Tech-Hub API" }))
}

async fn health() -> &'static str {
    "ok"
}

/// Read a JSON value as an integer, accepting numbers and numeric strings.
///
/// Floats are truncated toward zero. This mirrors the loose coercion the
/// API has always applied to ID and quantity fields.
pub(crate) fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            #[allow(clippy::cast_possible_truncation)]
            n.as_f64().map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a JSON value as a float, accepting numbers and numeric strings.
pub(crate) fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truthiness check matching the API's historical field validation:
/// absent, null, zero, empty string, and false all count as missing.
pub(crate) fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}
