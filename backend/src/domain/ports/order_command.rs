//! Driving port for order mutations.

use async_trait::async_trait;

use crate::domain::{Caller, Error, OrderDetails, OrderId, OrderInput};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Price the requested lines against the catalog and store a pending
    /// order for the caller.
    async fn create(&self, caller: &Caller, input: OrderInput) -> Result<OrderDetails, Error>;

    /// Admin only.
    async fn update_status(
        &self,
        caller: &Caller,
        id: &OrderId,
        status: String,
    ) -> Result<OrderDetails, Error>;

    /// Admin only. Changes status and/or delivery notes.
    async fn update(
        &self,
        caller: &Caller,
        id: &OrderId,
        status: Option<String>,
        delivery_notes: Option<String>,
    ) -> Result<OrderDetails, Error>;

    /// Owner or admin; only pending or cancelled orders.
    async fn delete(&self, caller: &Caller, id: &OrderId) -> Result<(), Error>;
}
