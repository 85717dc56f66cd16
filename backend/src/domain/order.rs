//! Shop orders.
//!
//! Totals are always recomputed from catalog prices at creation time; any
//! client-supplied price or total is ignored.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Error, OrderId, Price, Product, ProductId, UserId};

/// Order lifecycle state. Serialised in PascalCase, unlike bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Only pending or cancelled orders may be deleted.
    pub const fn is_deletable(self) -> bool {
        matches!(self, Self::Pending | Self::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an order status outside the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status")]
pub struct ParseOrderStatusError;

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError),
        }
    }
}

/// Parse a client-supplied order status.
pub fn parse_order_status(raw: &str) -> Result<OrderStatus, Error> {
    raw.parse()
        .map_err(|err: ParseOrderStatusError| Error::invalid_request(err.to_string()))
}

/// Payment method. Only cash on delivery is offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }
}

/// Error returned for an unknown payment method label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method")]
pub struct ParsePaymentMethodError;

impl FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Cash on Delivery" => Ok(Self::CashOnDelivery),
            _ => Err(ParsePaymentMethodError),
        }
    }
}

/// Who to contact about delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactInfo {
    /// Build contact details; name, email and phone must all be non-blank.
    pub fn try_new(
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Self, Error> {
        fn pick(value: Option<&str>) -> Option<&str> {
            value.map(str::trim).filter(|v| !v.is_empty())
        }
        match (pick(name), pick(email), pick(phone)) {
            (Some(name), Some(email), Some(phone)) => Ok(Self {
                name: name.to_owned(),
                email: email.to_owned(),
                phone: phone.to_owned(),
            }),
            _ => Err(Error::invalid_request("Contact information is required")),
        }
    }
}

/// One line of an order, priced at order time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: ProductId,
    pub quantity: u32,
    /// Unit price captured when the order was placed.
    pub price: Price,
}

impl OrderItem {
    /// Price a line against the current catalog entry.
    pub fn priced(product: &Product, quantity: u32) -> Self {
        Self {
            product: product.id,
            quantity,
            price: product.price,
        }
    }

    pub fn line_total(&self) -> Result<Price, Error> {
        self.price
            .checked_mul(self.quantity)
            .map_err(|err| Error::invalid_request(format!("Order total too large: {err}")))
    }
}

/// Sum of every line total.
///
/// # Examples
/// ```
/// use pawcare::domain::{OrderItem, Price, ProductId, order_total};
///
/// let item = OrderItem {
///     product: ProductId::random(),
///     quantity: 2,
///     price: Price::from_cents(1_000).expect("valid price"),
/// };
/// assert_eq!(order_total(&[item]).expect("total").cents(), 2_000);
/// ```
pub fn order_total(items: &[OrderItem]) -> Result<Price, Error> {
    items.iter().try_fold(Price::ZERO, |total, item| {
        let line = item.line_total()?;
        total
            .checked_add(line)
            .map_err(|err| Error::invalid_request(format!("Order total too large: {err}")))
    })
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: Price,
    pub shipping_address: String,
    pub contact_info: ContactInfo,
    pub payment_method: PaymentMethod,
    pub delivery_notes: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line as requested by the client, before catalog lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLineInput {
    pub product: Option<String>,
    pub quantity: Option<i64>,
}

/// Raw order fields as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderInput {
    pub items: Vec<OrderLineInput>,
    pub shipping_address: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub delivery_notes: Option<String>,
}

/// A validated line: product reference plus a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    /// Product reference as supplied; resolved against the catalog later.
    pub product: String,
    pub quantity: u32,
}

/// Validated order request, ready for pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    pub shipping_address: String,
    pub contact_info: ContactInfo,
    pub delivery_notes: String,
}

impl OrderDraft {
    pub fn try_from_input(input: &OrderInput) -> Result<Self, Error> {
        let contact_info = ContactInfo::try_new(
            input.contact_name.as_deref(),
            input.contact_email.as_deref(),
            input.contact_phone.as_deref(),
        )?;
        if input.items.is_empty() {
            return Err(Error::invalid_request(
                "Order must contain at least one item",
            ));
        }
        let lines = input
            .items
            .iter()
            .map(|line| {
                let product = line
                    .product
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| Error::invalid_request("Invalid product"))?;
                let quantity = line
                    .quantity
                    .filter(|q| *q >= 1)
                    .and_then(|q| u32::try_from(q).ok())
                    .ok_or_else(|| Error::invalid_request("Invalid quantity"))?;
                Ok(OrderLine {
                    product: product.to_owned(),
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self {
            lines,
            shipping_address: input.shipping_address.clone().unwrap_or_default(),
            contact_info,
            delivery_notes: input.delivery_notes.clone().unwrap_or_default(),
        })
    }
}

/// Status and delivery-note changes. Other fields are immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderChanges {
    pub status: Option<OrderStatus>,
    pub delivery_notes: Option<String>,
}

impl OrderChanges {
    /// Blank status strings are ignored; notes overwrite whenever present.
    pub fn try_new(status: Option<&str>, delivery_notes: Option<String>) -> Result<Self, Error> {
        Ok(Self {
            status: status
                .filter(|s| !s.trim().is_empty())
                .map(parse_order_status)
                .transpose()?,
            delivery_notes,
        })
    }

    pub fn apply(self, order: &mut Order, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(notes) = self.delivery_notes {
            order.delivery_notes = notes;
        }
        order.updated_at = now;
    }
}

/// Catalog fields shown next to an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub name: String,
    pub image: String,
    pub category: String,
}

impl From<&Product> for ProductDetails {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
        }
    }
}

/// Order line joined with its product, when it still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDetails {
    #[serde(flatten)]
    pub item: OrderItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_details: Option<ProductDetails>,
}

/// Order joined with product details per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItemDetails>,
    pub total_amount: Price,
    pub shipping_address: String,
    pub contact_info: ContactInfo,
    pub payment_method: PaymentMethod,
    pub delivery_notes: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderDetails {
    /// Attach product details using `lookup` for each line.
    pub fn join<'a, F>(order: Order, lookup: F) -> Self
    where
        F: Fn(&ProductId) -> Option<&'a Product>,
    {
        let items = order
            .items
            .into_iter()
            .map(|item| OrderItemDetails {
                product_details: lookup(&item.product).map(ProductDetails::from),
                item,
            })
            .collect();
        Self {
            id: order.id,
            user_id: order.user_id,
            items,
            total_amount: order.total_amount,
            shipping_address: order.shipping_address,
            contact_info: order.contact_info,
            payment_method: order.payment_method,
            delivery_notes: order.delivery_notes,
            status: order.status,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
