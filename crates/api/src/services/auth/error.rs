//! Authentication error types.

use thiserror::Error;

use tech_hub_core::EmailError;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately one variant for both,
    /// so the HTTP layer can't leak which one it was.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Username or email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password fails the strength requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No user with the given ID.
    #[error("user not found")]
    UserNotFound,

    /// Verification token unknown or already consumed.
    #[error("invalid verification token")]
    InvalidToken,

    /// Underlying repository error.
    #[error(transparent)]
    Repository(RepositoryError),

    /// Password hashing or verification failed internally.
    #[error("password hash failure")]
    PasswordHash,
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => Self::UserAlreadyExists,
            RepositoryError::NotFound => Self::UserNotFound,
            other => Self::Repository(other),
        }
    }
}
