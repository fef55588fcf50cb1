//! Product repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use tech_hub_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

/// Database row for a product.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    image_path: Option<String>,
    amount_in_stock: i64,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            image_path: row.image_path,
            amount_in_stock: row.amount_in_stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image_path, amount_in_stock, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
                .bind(id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Product::from))
    }

    /// Create a new product with an empty stock count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        price: f64,
    ) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products (name, description, price, amount_in_stock, created_at, updated_at) \
             VALUES (?, ?, ?, 0, ?, ?) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Partially update a product. Only the provided fields change.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        name: Option<&str>,
        description: Option<&str>,
        price: Option<f64>,
        amount_in_stock: Option<i64>,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET \
                 name = COALESCE(?, name), \
                 description = COALESCE(?, description), \
                 price = COALESCE(?, price), \
                 amount_in_stock = COALESCE(?, amount_in_stock), \
                 updated_at = ? \
             WHERE id = ? RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(amount_in_stock)
        .bind(Utc::now())
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map_or(Err(RepositoryError::NotFound), |r| Ok(r.into()))
    }

    /// Rewrite a product's stored image path after an upload.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn set_image_path(
        &self,
        id: ProductId,
        image_path: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET image_path = ?, updated_at = ? WHERE id = ?")
            .bind(image_path)
            .bind(Utc::now())
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a product and every row referencing it.
    ///
    /// Dependent rows go first, in one transaction: payments on orders for
    /// this product, then those orders, then cart lines, then the product.
    /// Orders referencing the product are lost; this mirrors the documented
    /// historical-record risk of the upstream design.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM payments WHERE order_id IN (SELECT id FROM orders WHERE product_id = ?)",
        )
        .bind(id.as_i64())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM orders WHERE product_id = ?")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM carts WHERE product_id = ?")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
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
