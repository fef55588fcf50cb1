//! Order domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tech_hub_core::{OrderId, ProductId, UserId};

/// A placed order line (domain type).
///
/// Creating an order never adjusts the referenced product's stock; stock
/// is tracked out-of-band.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Product ordered.
    pub product_id: ProductId,
    /// Quantity ordered; always positive.
    pub quantity: i64,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}
