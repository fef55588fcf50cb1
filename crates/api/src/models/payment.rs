//! Payment domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tech_hub_core::{OrderId, PaymentId, PaymentStatus};

/// A persisted payment record linked to an order.
///
/// The gateway verification flow returns the gateway's payload directly
/// and does not write back to this entity.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    /// Unique payment ID.
    pub id: PaymentId,
    /// Order this payment is for.
    pub order_id: OrderId,
    /// Amount in the store currency's standard unit.
    pub amount: f64,
    /// Payment method label (e.g. "card").
    pub payment_method: String,
    /// Lifecycle status.
    pub status: PaymentStatus,
    /// Gateway transaction reference, once known.
    pub transaction_id: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}
