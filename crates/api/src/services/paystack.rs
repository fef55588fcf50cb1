//! Paystack payment gateway client.
//!
//! Thin HTTP client over the Paystack REST API: transaction initialization
//! and verification. Amounts cross the wire in minor units (kobo).

use reqwest::header::{self, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tech_hub_core::Email;

use crate::config::PaystackConfig;

/// Errors that can occur when talking to the gateway.
#[derive(Debug, Error)]
pub enum PaystackError {
    /// Request failed at the HTTP level.
    #[error("paystack request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with an error.
    #[error("paystack error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The secret key is not a valid header value.
    #[error("invalid paystack secret key")]
    InvalidSecretKey,
}

/// Every Paystack response wraps its payload in this envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

/// Fields returned when a transaction is initialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializedTransaction {
    /// Hosted checkout page the customer is redirected to.
    pub authorization_url: String,
    /// Access code for resuming the checkout.
    pub access_code: String,
    /// Reference used to verify the transaction later.
    pub reference: String,
}

/// Client for the Paystack REST API.
pub struct PaystackClient {
    client: reqwest::Client,
    base_url: String,
}

impl PaystackClient {
    /// Build a client with the secret key as a default bearer header.
    ///
    /// # Errors
    ///
    /// Returns `PaystackError::InvalidSecretKey` if the key can't be used
    /// as a header value.
    pub fn new(config: &PaystackConfig) -> Result<Self, PaystackError> {
        let mut headers = HeaderMap::new();

        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", config.secret_key.expose_secret()))
                .map_err(|_| PaystackError::InvalidSecretKey)?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Initialize a transaction for the given customer and amount.
    ///
    /// `amount` is in major currency units and is converted to minor units
    /// for the wire.
    ///
    /// # Errors
    ///
    /// Returns `PaystackError` if the request fails or the gateway rejects it.
    pub async fn initialize(
        &self,
        email: &Email,
        amount: f64,
    ) -> Result<InitializedTransaction, PaystackError> {
        let body = serde_json::json!({
            "email": email.as_str(),
            "amount": to_minor_units(amount),
        });

        let response = self
            .client
            .post(format!("{}/transaction/initialize", self.base_url))
            .json(&body)
            .send()
            .await?;

        unwrap_envelope(response).await
    }

    /// Look up the state of a transaction by its reference.
    ///
    /// The gateway's transaction payload is passed through as-is.
    ///
    /// # Errors
    ///
    /// Returns `PaystackError` if the request fails or the reference is
    /// unknown.
    pub async fn verify(&self, reference: &str) -> Result<serde_json::Value, PaystackError> {
        let response = self
            .client
            .get(format!("{}/transaction/verify/{reference}", self.base_url))
            .send()
            .await?;

        unwrap_envelope(response).await
    }
}

/// Check the HTTP status and unwrap the response envelope.
async fn unwrap_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, PaystackError> {
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(PaystackError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> = response.json().await?;

    if !envelope.status {
        return Err(PaystackError::Api {
            status: status.as_u16(),
            message: envelope.message,
        });
    }

    envelope.data.ok_or(PaystackError::Api {
        status: status.as_u16(),
        message: "response carried no data".to_owned(),
    })
}

/// Convert a major-unit amount to the gateway's integer minor units.
fn to_minor_units(amount: f64) -> i64 {
    #[allow(clippy::cast_possible_truncation)]
    {
        (amount * 100.0).round() as i64
    }
}
