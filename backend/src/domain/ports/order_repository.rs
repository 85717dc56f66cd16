//! Port for order persistence.

use async_trait::async_trait;

use crate::domain::{Order, OrderId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Orders newest first, optionally for one owner.
    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Returns `false` when the order does not exist.
    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError>;

    /// Returns `false` when the order does not exist.
    async fn delete(&self, id: &OrderId) -> Result<bool, OrderRepositoryError>;
}
