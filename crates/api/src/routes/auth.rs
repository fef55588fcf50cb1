//! Authentication routes: signup, login, logout, session inspection, and
//! email verification.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::error::{ApiError, Result};
use crate::middleware::auth::{
    AUTH_REQUIRED, OptionalAuth, RequireAuth, establish_session, terminate_session,
};
use crate::models::User;
use crate::services::AuthService;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check-session", get(check_session))
        .route("/verify-email", post(verify_email))
        .route("/profile", get(profile))
}

#[derive(Deserialize)]
struct SignupRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// Create an account, log it in, and kick off email verification.
///
/// Verification is best-effort: a mail failure is logged, never surfaced,
/// so a flaky relay can't block registration. Without SMTP configuration
/// the token is logged for manual delivery.
async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let (Some(username), Some(email), Some(password)) = (
        body.username.filter(|s| !s.is_empty()),
        body.email.filter(|s| !s.is_empty()),
        body.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "Username, email, and password are required.".to_string(),
        ));
    };

    let auth = AuthService::new(state.pool());
    let user = auth.create_user(&username, &email, &password, false).await?;

    establish_session(&session, &user).await?;

    if let Some(token) = auth.issue_verification_token(user.id).await? {
        deliver_verification_token(&state, &user, &token).await;
    }

    Ok((StatusCode::CREATED, Json(user)))
}

async fn deliver_verification_token(state: &AppState, user: &User, token: &str) {
    match state.mailer() {
        Some(mailer) => {
            if let Err(e) = mailer
                .send_verification_email(&user.email, &user.username, token)
                .await
            {
                tracing::warn!(error = %e, user_id = %user.id, "Verification email failed");
            }
        }
        None => {
            tracing::info!(user_id = %user.id, token, "No mailer configured; verification token logged");
        }
    }
}

#[derive(Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<User>> {
    let (Some(email), Some(password)) = (
        body.email.filter(|s| !s.is_empty()),
        body.password.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "Email and password are required.".to_string(),
        ));
    };

    let user = AuthService::new(state.pool()).login(&email, &password).await?;
    establish_session(&session, &user).await?;

    Ok(Json(user))
}

async fn logout(RequireAuth(_user): RequireAuth, session: Session) -> Result<Json<Value>> {
    terminate_session(&session).await?;

    Ok(Json(json!({ "message": "Logged out successfully." })))
}

async fn check_session(OptionalAuth(user): OptionalAuth) -> Result<Json<User>> {
    user.map(Json)
        .ok_or_else(|| ApiError::Unauthorized(AUTH_REQUIRED.to_string()))
}

#[derive(Deserialize)]
struct VerifyEmailRequest {
    token: Option<String>,
}

async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<Json<User>> {
    let Some(token) = body.token.filter(|t| !t.is_empty()) else {
        return Err(ApiError::Validation(
            "Verification token is required.".to_string(),
        ));
    };

    let user = AuthService::new(state.pool()).verify_email(&token).await?;

    Ok(Json(user))
}

async fn profile(RequireAuth(user): RequireAuth) -> Json<User> {
    Json(user)
}
