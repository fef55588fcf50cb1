//! Cart line domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tech_hub_core::{CartId, ProductId, UserId};

/// An unpurchased (user, product, quantity) intent (domain type).
///
/// There is no uniqueness across (user, product): adding the same product
/// twice yields two independent lines rather than a merged quantity.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    /// Unique cart line ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// Product in the cart.
    pub product_id: ProductId,
    /// Quantity; positive by policy, but see the falsy-zero note on create.
    pub quantity: i64,
    /// When the line was added.
    pub created_at: DateTime<Utc>,
}
