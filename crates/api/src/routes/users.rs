//! User CRUD routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};

use tech_hub_core::{Email, UserId};

use crate::db::UserRepository;
use crate::error::{ApiError, Result};
use crate::models::User;
use crate::services::auth::{self, AuthService};
use crate::state::AppState;

const REQUIRED_MESSAGE: &str = "Username, email, and password are required.";
const NOT_FOUND_MESSAGE: &str = "User not found.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/create", post(create_user))
        .route("/{id}", get(get_user))
        .route("/{id}/update", put(update_user))
        .route("/{id}/delete", delete(delete_user))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

#[derive(Deserialize)]
struct CreateUserRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
    #[serde(default)]
    is_admin: bool,
}

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let (Some(username), Some(email), Some(password)) = (
        body.username.filter(|s| !s.is_empty()),
        body.email.filter(|s| !s.is_empty()),
        body.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::Validation(REQUIRED_MESSAGE.to_string()));
    };

    let user = AuthService::new(state.pool())
        .create_user(&username, &email, &password, body.is_admin)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<User>> {
    let user = UserRepository::new(state.pool())
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

    Ok(Json(user))
}

#[derive(Deserialize)]
struct UpdateUserRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<User>> {
    let email = body
        .email
        .as_deref()
        .map(Email::parse)
        .transpose()
        .map_err(|e| ApiError::Validation(format!("Invalid email: {e}")))?;

    let password_hash = body
        .password
        .as_deref()
        .map(auth::hash_password)
        .transpose()?;

    let user = UserRepository::new(state.pool())
        .update(
            UserId::new(id),
            body.username.as_deref(),
            email.as_ref(),
            password_hash.as_deref(),
        )
        .await
        .map_err(not_found)?;

    Ok(Json(user))
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    UserRepository::new(state.pool())
        .delete(UserId::new(id))
        .await
        .map_err(not_found)?;

    Ok(Json(json!({ "message": "User deleted successfully." })))
}

fn not_found(err: crate::db::RepositoryError) -> ApiError {
    match err {
        crate::db::RepositoryError::NotFound => ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()),
        other => other.into(),
    }
}
