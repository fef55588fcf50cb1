//! Tech-Hub REST API.
//!
//! An e-commerce backend: user accounts with session auth and email
//! verification, a product catalog with image uploads, carts, orders, and
//! Paystack payment initiation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;

/// Assemble the application router with all middleware installed.
///
/// Uploaded product images are served statically under `/uploads`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session store can't set up its table.
pub async fn app(state: AppState) -> Result<Router, sqlx::Error> {
    let sessions = middleware::session::session_layer(state.pool()).await?;

    Ok(routes::router()
        .nest_service("/uploads", ServeDir::new(&state.config().upload_dir))
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}
