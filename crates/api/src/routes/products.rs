//! Product CRUD routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use tech_hub_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::models::ProductResponse;
use crate::routes::{as_float, is_falsy};
use crate::state::AppState;

const REQUIRED_MESSAGE: &str = "Name and price are required.";
const NOT_FOUND_MESSAGE: &str = "Product not found.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/create", post(create_product))
        .route("/{id}", get(get_product))
        .route("/{id}/update", put(update_product))
        .route("/{id}/delete", delete(delete_product))
}

async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}

#[derive(Deserialize)]
struct CreateProductRequest {
    name: Option<Value>,
    description: Option<String>,
    price: Option<Value>,
}

async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    // A zero price trips the same check as a missing one; longstanding
    // policy, kept as-is.
    if is_falsy(body.name.as_ref()) || is_falsy(body.price.as_ref()) {
        return Err(ApiError::Validation(REQUIRED_MESSAGE.to_string()));
    }

    let name = body
        .name
        .as_ref()
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Validation(REQUIRED_MESSAGE.to_string()))?;
    let price = body
        .price
        .as_ref()
        .and_then(as_float)
        .ok_or_else(|| ApiError::Validation(REQUIRED_MESSAGE.to_string()))?;

    let product = ProductRepository::new(state.pool())
        .create(name, body.description.as_deref(), price)
        .await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    Ok(Json(product.into()))
}

#[derive(Deserialize)]
struct UpdateProductRequest {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    amount_in_stock: Option<i64>,
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>> {
    let product = ProductRepository::new(state.pool())
        .update(
            ProductId::new(id),
            body.name.as_deref(),
            body.description.as_deref(),
            body.price,
            body.amount_in_stock,
        )
        .await
        .map_err(not_found)?;

    Ok(Json(product.into()))
}

async fn delete_product(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await
        .map_err(not_found)?;

    Ok(Json(json!({ "message": "Product deleted successfully." })))
}

fn not_found(err: crate::db::RepositoryError) -> ApiError {
    match err {
        crate::db::RepositoryError::NotFound => ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()),
        other => other.into(),
    }
}
