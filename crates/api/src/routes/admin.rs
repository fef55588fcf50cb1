//! Admin-only routes.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::middleware::auth::RequireAdmin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/admin/dashboard", get(dashboard))
}

async fn dashboard(RequireAdmin(user): RequireAdmin) -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to the admin dashboard, {}.", user.username),
    }))
}
