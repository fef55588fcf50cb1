//! Business logic services.

pub mod auth;
pub mod mailer;
pub mod paystack;

pub use auth::AuthService;
pub use mailer::Mailer;
pub use paystack::PaystackClient;
