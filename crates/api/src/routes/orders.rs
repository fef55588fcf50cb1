//! Order CRUD routes.
//!
//! Placing an order records it and nothing more. Stock is not checked and
//! not decremented; reconciliation is a separate concern that has never
//! been wired in.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use tech_hub_core::{OrderId, ProductId, UserId};

use crate::db::{OrderRepository, ProductRepository, UserRepository};
use crate::error::{ApiError, Result};
use crate::models::Order;
use crate::routes::as_int;
use crate::state::AppState;

const NOT_FOUND_MESSAGE: &str = "Order not found.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/create", post(create_order))
        .route("/{id}", get(get_order))
        .route("/{id}/update", put(update_order))
        .route("/{id}/delete", delete(delete_order))
}

async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list().await?;
    Ok(Json(orders))
}

/// Validation runs in a fixed sequence: field presence, ID types, quantity
/// positivity, then user and product existence. Each failure reports only
/// its own stage.
async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Order>)> {
    let missing: Vec<&str> = ["user_id", "product_id", "quantity"]
        .into_iter()
        .filter(|field| !body.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        )));
    }

    let (Some(user_id), Some(product_id)) = (
        body.get("user_id").and_then(as_int),
        body.get("product_id").and_then(as_int),
    ) else {
        return Err(ApiError::Validation(
            "User ID and Product ID must be integers.".to_string(),
        ));
    };

    let quantity = body.get("quantity").and_then(as_int).filter(|q| *q > 0);
    let Some(quantity) = quantity else {
        return Err(ApiError::Validation(
            "Quantity must be a positive integer.".to_string(),
        ));
    };

    let user_id = UserId::new(user_id);
    let product_id = ProductId::new(product_id);

    if UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("User not found.".to_string()));
    }

    if ProductRepository::new(state.pool())
        .get_by_id(product_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Product not found.".to_string()));
    }

    let order = OrderRepository::new(state.pool())
        .create(user_id, product_id, quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .get_by_id(OrderId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    Ok(Json(order))
}

#[derive(Deserialize)]
struct UpdateOrderRequest {
    user_id: Option<i64>,
    product_id: Option<i64>,
    quantity: Option<i64>,
}

async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateOrderRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update(OrderId::new(id), body.user_id, body.product_id, body.quantity)
        .await
        .map_err(not_found)?;

    Ok(Json(order))
}

async fn delete_order(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    OrderRepository::new(state.pool())
        .delete(OrderId::new(id))
        .await
        .map_err(not_found)?;

    Ok(Json(json!({ "message": "Order deleted successfully." })))
}

fn not_found(err: crate::db::RepositoryError) -> ApiError {
    match err {
        crate::db::RepositoryError::NotFound => ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()),
        other => other.into(),
    }
}
