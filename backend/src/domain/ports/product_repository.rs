//! Port for catalog persistence.

use async_trait::async_trait;

use crate::domain::{Product, ProductId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "product repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, product: &Product) -> Result<(), ProductRepositoryError>;

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Products whose id is listed; missing ids are skipped.
    async fn find_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Every product ordered by name.
    async fn list(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Products in exactly `category`, ordered by name.
    async fn list_by_category(&self, category: &str)
    -> Result<Vec<Product>, ProductRepositoryError>;

    /// Returns `false` when the product does not exist.
    async fn update(&self, product: &Product) -> Result<bool, ProductRepositoryError>;

    /// Returns `false` when the product does not exist.
    async fn delete(&self, id: &ProductId) -> Result<bool, ProductRepositoryError>;
}
