//! Newtype wrappers and enums shared across the API.

pub mod email;
pub mod id;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{CartId, OrderId, PaymentId, ProductId, UserId};
pub use status::{PaymentStatus, StockStatus};
