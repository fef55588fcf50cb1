//! Cart repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use tech_hub_core::{CartId, ProductId, UserId};

use super::{RepositoryError, map_foreign_key_violation};
use crate::models::CartLine;

/// Database row for a cart line.
#[derive(sqlx::FromRow)]
struct CartRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    quantity: i64,
    created_at: chrono::DateTime<Utc>,
}

impl From<CartRow> for CartLine {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

const CART_COLUMNS: &str = "id, user_id, product_id, quantity, created_at";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all cart lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CartLine>, RepositoryError> {
        let rows: Vec<CartRow> =
            sqlx::query_as(&format!("SELECT {CART_COLUMNS} FROM carts ORDER BY id"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    /// Get a cart line by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CartId) -> Result<Option<CartLine>, RepositoryError> {
        let row: Option<CartRow> =
            sqlx::query_as(&format!("SELECT {CART_COLUMNS} FROM carts WHERE id = ?"))
                .bind(id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(CartLine::from))
    }

    /// Create a new cart line.
    ///
    /// There is no user/product existence pre-check here or in the caller;
    /// the foreign-key constraints do that work.
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
    ) -> Result<CartLine, RepositoryError> {
        let row: CartRow = sqlx::query_as(&format!(
            "INSERT INTO carts (user_id, product_id, quantity, created_at) \
             VALUES (?, ?, ?, ?) RETURNING {CART_COLUMNS}"
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

    /// Partially update a cart line. Only the provided fields change.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart line doesn't exist.
    /// Returns `RepositoryError::Conflict` on a dangling reference.
    pub async fn update(
        &self,
        id: CartId,
        user_id: Option<i64>,
        product_id: Option<i64>,
        quantity: Option<i64>,
    ) -> Result<CartLine, RepositoryError> {
        let row: Option<CartRow> = sqlx::query_as(&format!(
            "UPDATE carts SET \
                 user_id = COALESCE(?, user_id), \
                 product_id = COALESCE(?, product_id), \
                 quantity = COALESCE(?, quantity) \
             WHERE id = ? RETURNING {CART_COLUMNS}"
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

    /// Delete a cart line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart line doesn't exist.
    pub async fn delete(&self, id: CartId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
