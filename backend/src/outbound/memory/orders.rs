//! In-memory `OrderRepository`.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{Order, OrderId, UserId};

#[derive(Debug, Default)]
pub struct MemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
}

impl MemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for MemoryOrderRepository {
    async fn insert(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        self.orders.lock().await.push(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let orders = self.orders.lock().await;
        Ok(orders.iter().find(|o| &o.id == id).cloned())
    }

    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Order>, OrderRepositoryError> {
        let orders = self.orders.lock().await;
        let mut listed: Vec<Order> = orders
            .iter()
            .filter(|o| owner.is_none_or(|owner| o.user_id == owner))
            .cloned()
            .collect();
        listed.sort_by_key(|o| Reverse(o.created_at));
        Ok(listed)
    }

    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError> {
        let mut orders = self.orders.lock().await;
        let Some(stored) = orders.iter_mut().find(|o| o.id == order.id) else {
            return Ok(false);
        };
        *stored = order.clone();
        Ok(true)
    }

    async fn delete(&self, id: &OrderId) -> Result<bool, OrderRepositoryError> {
        let mut orders = self.orders.lock().await;
        let before = orders.len();
        orders.retain(|o| &o.id != id);
        Ok(orders.len() != before)
    }
}
