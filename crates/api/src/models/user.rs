//! User domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tech_hub_core::{Email, UserId};

/// A registered user (domain type).
///
/// The password hash stays in the repository layer; it is never part of
/// the domain object and never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: Email,
    /// Whether this user may access admin-only routes.
    pub is_admin: bool,
    /// Whether the email address has been verified.
    pub is_verified: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
