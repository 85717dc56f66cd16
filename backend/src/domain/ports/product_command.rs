//! Driving port for catalog writes. Every operation is admin only.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Product, ProductId, ProductInput};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCommand: Send + Sync {
    async fn create(&self, caller: &Caller, input: ProductInput) -> Result<Product, Error>;

    async fn update(
        &self,
        caller: &Caller,
        id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, Error>;

    async fn delete(&self, caller: &Caller, id: &ProductId) -> Result<(), Error>;
}
