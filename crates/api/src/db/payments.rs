//! Payment repository for database operations.
//!
//! Payment records exist in the data model, but the gateway verification
//! flow intentionally does not write back to them; see DESIGN.md.

use std::str::FromStr;

use chrono::Utc;
use sqlx::SqlitePool;

use tech_hub_core::{OrderId, PaymentId, PaymentStatus};

use super::{RepositoryError, map_foreign_key_violation};
use crate::models::Payment;

/// Database row for a payment.
#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: i64,
    order_id: i64,
    amount: f64,
    payment_method: String,
    status: String,
    transaction_id: Option<String>,
    created_at: chrono::DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RepositoryError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let status = PaymentStatus::from_str(&row.status)
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: PaymentId::new(row.id),
            order_id: OrderId::new(row.order_id),
            amount: row.amount,
            payment_method: row.payment_method,
            status,
            transaction_id: row.transaction_id,
            created_at: row.created_at,
        })
    }
}

const PAYMENT_COLUMNS: &str =
    "id, order_id, amount, payment_method, status, transaction_id, created_at";

/// Repository for payment database operations.
pub struct PaymentRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PaymentRepository<'a> {
    /// Create a new payment repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a pending payment record for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order doesn't exist.
    pub async fn create(
        &self,
        order_id: OrderId,
        amount: f64,
        payment_method: &str,
    ) -> Result<Payment, RepositoryError> {
        let row: PaymentRow = sqlx::query_as(&format!(
            "INSERT INTO payments (order_id, amount, payment_method, status, created_at) \
             VALUES (?, ?, ?, 'pending', ?) RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(order_id.as_i64())
        .bind(amount)
        .bind(payment_method)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, "Order does not exist."))?;

        Payment::try_from(row)
    }

    /// Get the payments recorded for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_order(&self, order_id: OrderId) -> Result<Vec<Payment>, RepositoryError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = ? ORDER BY id"
        ))
        .bind(order_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}
