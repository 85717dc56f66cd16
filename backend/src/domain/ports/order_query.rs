//! Driving port for order reads.

use async_trait::async_trait;

use crate::domain::{Caller, Error, OrderDetails, OrderId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    async fn list_mine(&self, caller: &Caller) -> Result<Vec<OrderDetails>, Error>;

    /// Admin only.
    async fn list_all(&self, caller: &Caller) -> Result<Vec<OrderDetails>, Error>;

    async fn get(&self, caller: &Caller, id: &OrderId) -> Result<OrderDetails, Error>;
}
