//! Server-side session layer backed by `SQLite`.

use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::SameSite, cookie::time::Duration};
use tower_sessions_sqlx_store::SqliteStore;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "th_session";

/// Sessions expire after this long without a request.
const SESSION_INACTIVITY_DAYS: i64 = 7;

/// Build the session layer, creating the backing table if needed.
///
/// The cookie is `HttpOnly` and `SameSite=Lax`. It is not marked `Secure`
/// because deployments terminate TLS upstream.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session table migration fails.
pub async fn session_layer(
    pool: &SqlitePool,
) -> Result<SessionManagerLayer<SqliteStore>, sqlx::Error> {
    let store = SqliteStore::new(pool.clone());
    store.migrate().await?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_INACTIVITY_DAYS)))
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_secure(false))
}
