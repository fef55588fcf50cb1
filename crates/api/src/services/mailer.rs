//! Outbound email over SMTP.
//!
//! Sends account verification mail through a STARTTLS relay. When no relay
//! is configured the application skips this service and logs tokens instead.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;
use thiserror::Error;

use tech_hub_core::Email;

use crate::config::SmtpConfig;

/// Errors that can occur when sending mail.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Relay setup or delivery failure.
    #[error("smtp transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// Invalid mailbox address.
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Message could not be assembled.
    #[error("message build error: {0}")]
    Build(#[from] lettre::error::Error),
}

/// SMTP mail sender.
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Build a mailer from SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if the relay host or from address is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.expose_secret().to_owned(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from_address.parse()?,
        })
    }

    /// Send a verification email carrying the account's token.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if the message can't be built or delivered.
    pub async fn send_verification_email(
        &self,
        to: &Email,
        username: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        let body = format!(
            "Hello {username},\n\n\
             Thanks for signing up. Use the token below to verify your email \
             address:\n\n\
             {token}\n\n\
             If you did not create this account, you can ignore this message.\n"
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to.as_str().parse()?)
            .subject("Verify your email address")
            .body(body)?;

        self.transport.send(message).await?;
        tracing::info!(to = %to, "Verification email sent");

        Ok(())
    }
}
