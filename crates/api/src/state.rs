//! Shared application state.

use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::Config;
use crate::services::mailer::{Mailer, MailerError};
use crate::services::paystack::{PaystackClient, PaystackError};

/// Errors that can occur while assembling state at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Paystack(#[from] PaystackError),
    #[error(transparent)]
    Mailer(#[from] MailerError),
}

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    pool: SqlitePool,
    paystack: Option<PaystackClient>,
    mailer: Option<Mailer>,
}

impl AppState {
    /// Assemble state from configuration and a connected pool.
    ///
    /// The payment and mail clients are built only when their configuration
    /// sections are present; routes that need an absent client report a
    /// gateway error instead.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if a configured client fails to build.
    pub fn new(config: Config, pool: SqlitePool) -> Result<Self, StateError> {
        let paystack = config
            .paystack
            .as_ref()
            .map(PaystackClient::new)
            .transpose()?;
        let mailer = config.smtp.as_ref().map(Mailer::new).transpose()?;

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                pool,
                paystack,
                mailer,
            }),
        })
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Payment gateway client, if configured.
    #[must_use]
    pub fn paystack(&self) -> Option<&PaystackClient> {
        self.inner.paystack.as_ref()
    }

    /// Mail sender, if configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&Mailer> {
        self.inner.mailer.as_ref()
    }
}
