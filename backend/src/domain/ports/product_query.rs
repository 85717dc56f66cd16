//! Driving port for public catalog reads.

use async_trait::async_trait;

use crate::domain::{Error, Product, ProductId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductQuery: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, Error>;

    async fn list_by_category(&self, category: String) -> Result<Vec<Product>, Error>;

    async fn get(&self, id: &ProductId) -> Result<Product, Error>;
}
