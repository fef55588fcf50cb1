//! Cart CRUD routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use tech_hub_core::{CartId, ProductId, UserId};

use crate::db::CartRepository;
use crate::error::{ApiError, Result};
use crate::models::CartLine;
use crate::routes::{as_int, is_falsy};
use crate::state::AppState;

const REQUIRED_MESSAGE: &str = "User ID, product ID, and quantity are required.";
const NOT_FOUND_MESSAGE: &str = "Cart not found.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_carts))
        .route("/create", post(create_cart))
        .route("/{id}", get(get_cart))
        .route("/{id}/update", put(update_cart))
        .route("/{id}/delete", delete(delete_cart))
}

async fn list_carts(State(state): State<AppState>) -> Result<Json<Vec<CartLine>>> {
    let lines = CartRepository::new(state.pool()).list().await?;
    Ok(Json(lines))
}

/// The presence check here is a truthiness check, so a quantity of zero is
/// reported the same way as an omitted field. Kept as a literal policy
/// choice.
async fn create_cart(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<CartLine>)> {
    if is_falsy(body.get("user_id"))
        || is_falsy(body.get("product_id"))
        || is_falsy(body.get("quantity"))
    {
        return Err(ApiError::Validation(REQUIRED_MESSAGE.to_string()));
    }

    let (Some(user_id), Some(product_id), Some(quantity)) = (
        body.get("user_id").and_then(as_int),
        body.get("product_id").and_then(as_int),
        body.get("quantity").and_then(as_int),
    ) else {
        return Err(ApiError::Validation(REQUIRED_MESSAGE.to_string()));
    };

    // No existence pre-check; a dangling user or product surfaces as a
    // foreign-key conflict from the repository.
    let line = CartRepository::new(state.pool())
        .create(UserId::new(user_id), ProductId::new(product_id), quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(line)))
}

async fn get_cart(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<CartLine>> {
    let line = CartRepository::new(state.pool())
        .get_by_id(CartId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    Ok(Json(line))
}

#[derive(Deserialize)]
struct UpdateCartRequest {
    user_id: Option<i64>,
    product_id: Option<i64>,
    quantity: Option<i64>,
}

async fn update_cart(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<CartLine>> {
    let line = CartRepository::new(state.pool())
        .update(CartId::new(id), body.user_id, body.product_id, body.quantity)
        .await
        .map_err(not_found)?;

    Ok(Json(line))
}

async fn delete_cart(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    CartRepository::new(state.pool())
        .delete(CartId::new(id))
        .await
        .map_err(not_found)?;

    Ok(Json(json!({ "message": "Cart deleted successfully." })))
}

fn not_found(err: crate::db::RepositoryError) -> ApiError {
    match err {
        crate::db::RepositoryError::NotFound => ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()),
        other => other.into(),
    }
}
