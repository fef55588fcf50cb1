//! Order repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use tech_hub_core::{OrderId, ProductId, UserId};

use super::{RepositoryError, map_foreign_key_violation};
use crate::models::Order;

/// Database row for an order.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    created_at: chrono::DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, product_id, quantity, created_at";

/// Repository for order database operations.
///
/// Creating, updating, or deleting an order never touches the referenced
/// product's `amount_in_stock`.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
                .bind(id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Order::from))
    }

    /// Create a new order.
    ///
    /// Callers are expected to have validated that the user and product
    /// exist; the foreign keys are the backstop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a dangling user or product
    /// reference, `RepositoryError::Database` otherwise.
    pub async fn create(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Order, RepositoryError> {
        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (user_id, product_id, quantity, created_at) \
             VALUES (?, ?, ?, ?) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .bind(quantity)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, "User or product does not exist."))?;

        Ok(row.into())
    }

    /// Partially update an order. Only the provided fields change.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Conflict` on a dangling reference.
    pub async fn update(
        &self,
        id: OrderId,
        user_id: Option<i64>,
        product_id: Option<i64>,
        quantity: Option<i64>,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET \
                 user_id = COALESCE(?, user_id), \
                 product_id = COALESCE(?, product_id), \
                 quantity = COALESCE(?, quantity) \
             WHERE id = ? RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, "User or product does not exist."))?;

        row.map_or(Err(RepositoryError::NotFound), |r| Ok(r.into()))
    }

    /// Delete an order and its payment records.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM payments WHERE order_id = ?")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
