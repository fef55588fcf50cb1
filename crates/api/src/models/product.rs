//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tech_hub_core::{ProductId, StockStatus};

/// A catalog item (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Unit price in the store currency's standard unit.
    pub price: f64,
    /// Relative path to the uploaded product image, if any.
    pub image_path: Option<String>,
    /// On-hand quantity.
    pub amount_in_stock: i64,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Derived stock label; computed from `amount_in_stock`, never stored.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_quantity(self.amount_in_stock)
    }
}

/// Product as serialized in responses, with the derived `stock_status`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_path: Option<String>,
    pub amount_in_stock: i64,
    pub stock_status: StockStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let stock_status = product.stock_status();
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            image_path: product.image_path,
            amount_in_stock: product.amount_in_stock,
            stock_status,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
