//! Payment gateway routes.
//!
//! Initialization hands the client a hosted checkout URL; the callback
//! relays the gateway's verification payload. Neither writes to the
//! payments table.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;

use tech_hub_core::Email;

use crate::error::{ApiError, Result};
use crate::services::paystack::{InitializedTransaction, PaystackClient};
use crate::state::AppState;

const GATEWAY_UNCONFIGURED: &str = "Payment gateway is not configured.";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/paystack/initialize", post(initialize))
        .route("/paystack/callback", get(callback))
}

#[derive(Deserialize)]
struct InitializeRequest {
    email: Option<String>,
    amount: Option<Value>,
}

async fn initialize(
    State(state): State<AppState>,
    Json(body): Json<InitializeRequest>,
) -> Result<Json<InitializedTransaction>> {
    let (Some(email), Some(amount)) = (body.email.filter(|s| !s.is_empty()), body.amount) else {
        return Err(ApiError::Validation(
            "Email and amount are required.".to_string(),
        ));
    };

    let Some(amount) = crate::routes::as_float(&amount) else {
        return Err(ApiError::Validation("Amount must be a number.".to_string()));
    };

    let email = Email::parse(&email)
        .map_err(|e| ApiError::Validation(format!("Invalid email: {e}")))?;

    let transaction = gateway(&state)?.initialize(&email, amount).await?;

    Ok(Json(transaction))
}

#[derive(Deserialize)]
struct CallbackQuery {
    reference: Option<String>,
}

async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<Value>> {
    let Some(reference) = query.reference.filter(|r| !r.is_empty()) else {
        return Err(ApiError::Validation("Reference is required.".to_string()));
    };

    let payload = gateway(&state)?.verify(&reference).await?;

    Ok(Json(payload))
}

fn gateway(state: &AppState) -> Result<&PaystackClient> {
    state
        .paystack()
        .ok_or_else(|| ApiError::Gateway(GATEWAY_UNCONFIGURED.to_string()))
}
