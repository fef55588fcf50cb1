//! Authentication extractors.
//!
//! Route guards are expressed as extractors rather than wrapper functions,
//! so a handler's signature states its access requirement. Each guard
//! resolves the session's user against the database on every request; a
//! session pointing at a deleted user is cleared and rejected.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::error::ApiError;
use crate::models::{CurrentUser, User, session_keys};
use crate::state::AppState;

/// Message for requests without a valid session.
pub const AUTH_REQUIRED: &str = "Authentication required.";

/// Message for authenticated requests lacking admin privilege.
pub const ADMIN_REQUIRED: &str = "Admin privileges required.";

/// Guard that requires a logged-in user.
pub struct RequireAuth(pub User);

/// Guard that requires a logged-in admin.
pub struct RequireAdmin(pub User);

/// Resolves the current user if a session exists, without rejecting.
pub struct OptionalAuth(pub Option<User>);

/// Record the logged-in user on the session.
///
/// The session ID is rotated so a pre-login cookie can't be fixated.
///
/// # Errors
///
/// Returns `ApiError::Session` if the session store fails.
pub async fn establish_session(session: &Session, user: &User) -> Result<(), ApiError> {
    session.cycle_id().await?;
    session
        .insert(session_keys::CURRENT_USER, CurrentUser { id: user.id })
        .await?;

    Ok(())
}

/// Destroy the session entirely.
///
/// # Errors
///
/// Returns `ApiError::Session` if the session store fails.
pub async fn terminate_session(session: &Session) -> Result<(), ApiError> {
    Ok(session.flush().await?)
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_user(parts, state).await? {
            Some(user) => Ok(Self(user)),
            None => Err(ApiError::Unauthorized(AUTH_REQUIRED.to_string())),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(ApiError::Forbidden(ADMIN_REQUIRED.to_string()));
        }

        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_user(parts, state).await?))
    }
}

/// Look up the session's user, clearing the session entry if the user row
/// is gone.
async fn resolve_user(parts: &mut Parts, state: &AppState) -> Result<Option<User>, ApiError> {
    let session = extract_session(parts)?;

    let Some(current) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await?
    else {
        return Ok(None);
    };

    let users = UserRepository::new(state.pool());
    match users.get_by_id(current.id).await? {
        Some(user) => Ok(Some(user)),
        None => {
            session
                .remove::<CurrentUser>(session_keys::CURRENT_USER)
                .await?;
            Ok(None)
        }
    }
}

/// Pull the `Session` inserted by the session layer out of the request.
fn extract_session(parts: &Parts) -> Result<Session, ApiError> {
    parts.extensions.get::<Session>().cloned().ok_or_else(|| {
        ApiError::Internal("session layer not installed".to_string())
    })
}
