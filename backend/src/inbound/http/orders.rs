//! Order handlers under `/api/orders`.
//!
//! Prices and totals sent by clients are ignored; the server prices each line
//! from the catalog.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, OrderDetails, OrderId, OrderInput, OrderLineInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::appointments::StatusRequest;
use crate::inbound::http::products::SuccessResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ID, parse_id};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    /// Product identifier.
    pub product: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfoRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub contact_info: ContactInfoRequest,
    pub delivery_notes: Option<String>,
}

impl From<CreateOrderRequest> for OrderInput {
    fn from(value: CreateOrderRequest) -> Self {
        Self {
            items: value
                .items
                .into_iter()
                .map(|line| OrderLineInput {
                    product: line.product,
                    quantity: line.quantity,
                })
                .collect(),
            shipping_address: value.shipping_address,
            contact_name: value.contact_info.name,
            contact_email: value.contact_info.email,
            contact_phone: value.contact_info.phone,
            delivery_notes: value.delivery_notes,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub delivery_notes: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct OrderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub order: OrderDetails,
}

impl OrderResponse {
    fn found(order: OrderDetails) -> Self {
        Self {
            success: true,
            message: None,
            order,
        }
    }

    fn with_message(order: OrderDetails, message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_owned()),
            order,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct OrderListResponse {
    pub success: bool,
    pub orders: Vec<OrderDetails>,
}

impl From<Vec<OrderDetails>> for OrderListResponse {
    fn from(orders: Vec<OrderDetails>) -> Self {
        Self {
            success: true,
            orders,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Product not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/orders")]
pub async fn create_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateOrderRequest>,
) -> ApiResult<HttpResponse> {
    let order = state
        .orders
        .create(session.caller(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(OrderResponse::with_message(
        order,
        "Order created successfully",
    )))
}

#[utoipa::path(
    get,
    path = "/api/orders/myorders",
    responses(
        (status = 200, description = "Caller's orders, newest first", body = OrderListResponse),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["orders"],
    operation_id = "myOrders"
)]
#[get("/orders/myorders")]
pub async fn my_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OrderListResponse>> {
    let orders = state.orders_query.list_mine(session.caller()).await?;
    Ok(web::Json(orders.into()))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Every order", body = OrderListResponse),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<OrderListResponse>> {
    let orders = state.orders_query.list_all(session.caller()).await?;
    Ok(web::Json(orders.into()))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order", body = OrderResponse),
        (status = 403, description = "Not authorized to access this order", body = Error),
        (status = 404, description = "Order not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<OrderResponse>> {
    let id: OrderId = parse_id(&path, ID)?;
    let order = state.orders_query.get(session.caller(), &id).await?;
    Ok(web::Json(OrderResponse::found(order)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(("id" = String, Path, description = "Order identifier")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 400, description = "Invalid status", body = Error),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrderStatus"
)]
#[put("/orders/{id}/status")]
pub async fn update_order_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<OrderResponse>> {
    let id: OrderId = parse_id(&path, ID)?;
    let order = state
        .orders
        .update_status(session.caller(), &id, payload.into_inner().into_status())
        .await?;
    Ok(web::Json(OrderResponse::with_message(
        order,
        "Order status updated successfully",
    )))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid status", body = Error),
        (status = 403, description = "Admin access required", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrder"
)]
#[put("/orders/{id}")]
pub async fn update_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateOrderRequest>,
) -> ApiResult<web::Json<OrderResponse>> {
    let id: OrderId = parse_id(&path, ID)?;
    let UpdateOrderRequest {
        status,
        delivery_notes,
    } = payload.into_inner();
    let order = state
        .orders
        .update(session.caller(), &id, status, delivery_notes)
        .await?;
    Ok(web::Json(OrderResponse::with_message(
        order,
        "Order updated successfully",
    )))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order deleted", body = SuccessResponse),
        (status = 400, description = "Can only delete pending or cancelled orders", body = Error),
        (status = 404, description = "Order not found", body = Error)
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/orders/{id}")]
pub async fn delete_order(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let id: OrderId = parse_id(&path, ID)?;
    state.orders.delete(session.caller(), &id).await?;
    Ok(web::Json(SuccessResponse::new("Order deleted successfully")))
}
