//! Order placement and fulfilment.
//!
//! Line prices are captured from the catalog when the order is placed and the
//! total is always computed here; clients never supply either.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use super::product_service::map_product_error;
use crate::domain::ports::{
    OrderCommand, OrderQuery, OrderRepository, OrderRepositoryError, ProductRepository,
};
use crate::domain::{
    Caller, Error, Order, OrderChanges, OrderDetails, OrderDraft, OrderId, OrderInput, OrderItem,
    OrderStatus, PaymentMethod, Product, ProductId, UserId, order_total, parse_order_status,
};

const NOT_FOUND: &str = "Order not found";
const NOT_OWNER: &str = "Not authorized to access this order";
const NOT_DELETABLE: &str = "Can only delete pending or cancelled orders";

fn map_order_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
    }
}

fn product_not_found(reference: &str) -> Error {
    Error::not_found(format!("Product not found: {reference}"))
}

/// Service implementing the order driving ports.
#[derive(Clone)]
pub struct OrderService<O, P> {
    orders: Arc<O>,
    products: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<O, P> OrderService<O, P> {
    pub fn new(orders: Arc<O>, products: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            orders,
            products,
            clock,
        }
    }
}

impl<O, P> OrderService<O, P>
where
    O: OrderRepository,
    P: ProductRepository,
{
    async fn load(&self, id: &OrderId) -> Result<Order, Error> {
        self.orders
            .find_by_id(id)
            .await
            .map_err(map_order_error)?
            .ok_or_else(|| Error::not_found(NOT_FOUND))
    }

    async fn load_accessible(&self, caller: &Caller, id: &OrderId) -> Result<Order, Error> {
        let order = self.load(id).await?;
        if !caller.can_access(&order.user_id) {
            return Err(Error::forbidden(NOT_OWNER));
        }
        Ok(order)
    }

    async fn resolve_product(&self, reference: &str) -> Result<Product, Error> {
        let Ok(id) = ProductId::new(reference) else {
            return Err(product_not_found(reference));
        };
        self.products
            .find_by_id(&id)
            .await
            .map_err(map_product_error)?
            .ok_or_else(|| product_not_found(reference))
    }

    async fn save(&self, order: &Order) -> Result<(), Error> {
        let found = self.orders.update(order).await.map_err(map_order_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }

    async fn join(&self, orders: Vec<Order>) -> Result<Vec<OrderDetails>, Error> {
        let product_ids: Vec<ProductId> = orders
            .iter()
            .flat_map(|order| order.items.iter().map(|item| item.product))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let products: HashMap<ProductId, Product> = self
            .products
            .find_many(&product_ids)
            .await
            .map_err(map_product_error)?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();
        Ok(orders
            .into_iter()
            .map(|order| OrderDetails::join(order, |id| products.get(id)))
            .collect())
    }

    async fn join_one(&self, order: Order) -> Result<OrderDetails, Error> {
        self.join(vec![order])
            .await?
            .pop()
            .ok_or_else(|| Error::internal("order join returned no rows"))
    }

    async fn list_for(&self, owner: Option<UserId>) -> Result<Vec<OrderDetails>, Error> {
        let orders = self.orders.list(owner).await.map_err(map_order_error)?;
        self.join(orders).await
    }
}

#[async_trait]
impl<O, P> OrderCommand for OrderService<O, P>
where
    O: OrderRepository,
    P: ProductRepository,
{
    async fn create(&self, caller: &Caller, input: OrderInput) -> Result<OrderDetails, Error> {
        let draft = OrderDraft::try_from_input(&input)?;

        let mut catalog: HashMap<ProductId, Product> = HashMap::new();
        let mut items = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let product = self.resolve_product(&line.product).await?;
            items.push(OrderItem::priced(&product, line.quantity));
            catalog.insert(product.id, product);
        }
        let total_amount = order_total(&items)?;

        let now = self.clock.utc();
        let order = Order {
            id: OrderId::random(),
            user_id: caller.user_id(),
            items,
            total_amount,
            shipping_address: draft.shipping_address,
            contact_info: draft.contact_info,
            payment_method: PaymentMethod::CashOnDelivery,
            delivery_notes: draft.delivery_notes,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.orders.insert(&order).await.map_err(map_order_error)?;
        info!(order_id = %order.id, total = %order.total_amount, "order placed");
        Ok(OrderDetails::join(order, |id| catalog.get(id)))
    }

    async fn update_status(
        &self,
        caller: &Caller,
        id: &OrderId,
        status: String,
    ) -> Result<OrderDetails, Error> {
        caller.require_admin()?;
        let status = parse_order_status(&status)?;
        let mut order = self.load(id).await?;
        order.status = status;
        order.updated_at = self.clock.utc();
        self.save(&order).await?;
        info!(order_id = %order.id, %status, "order status changed");
        self.join_one(order).await
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &OrderId,
        status: Option<String>,
        delivery_notes: Option<String>,
    ) -> Result<OrderDetails, Error> {
        caller.require_admin()?;
        let changes = OrderChanges::try_new(status.as_deref(), delivery_notes)?;
        let mut order = self.load(id).await?;
        changes.apply(&mut order, self.clock.utc());
        self.save(&order).await?;
        self.join_one(order).await
    }

    async fn delete(&self, caller: &Caller, id: &OrderId) -> Result<(), Error> {
        let order = self.load_accessible(caller, id).await?;
        if !order.status.is_deletable() {
            return Err(Error::invalid_request(NOT_DELETABLE));
        }
        let deleted = self.orders.delete(&order.id).await.map_err(map_order_error)?;
        if deleted {
            info!(order_id = %order.id, "order deleted");
            Ok(())
        } else {
            Err(Error::not_found(NOT_FOUND))
        }
    }
}

#[async_trait]
impl<O, P> OrderQuery for OrderService<O, P>
where
    O: OrderRepository,
    P: ProductRepository,
{
    async fn list_mine(&self, caller: &Caller) -> Result<Vec<OrderDetails>, Error> {
        self.list_for(Some(caller.user_id())).await
    }

    async fn list_all(&self, caller: &Caller) -> Result<Vec<OrderDetails>, Error> {
        caller.require_admin()?;
        self.list_for(None).await
    }

    async fn get(&self, caller: &Caller, id: &OrderId) -> Result<OrderDetails, Error> {
        let order = self.load_accessible(caller, id).await?;
        self.join_one(order).await
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
