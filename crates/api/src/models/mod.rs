//! Domain types for the API.
//!
//! These types represent validated domain objects separate from database
//! row types. Nothing here carries a password hash or verification token;
//! they are safe to serialize into responses as-is.

pub mod cart;
pub mod order;
pub mod payment;
pub mod product;
pub mod session;
pub mod user;

pub use cart::CartLine;
pub use order::Order;
pub use payment::Payment;
pub use product::{Product, ProductResponse};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
