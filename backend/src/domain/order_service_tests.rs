//! Tests for the order service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockOrderRepository, MockProductRepository, ProductRepositoryError};
use crate::domain::{ContactInfo, ErrorCode, OrderLineInput, Price};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 4, 15, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn make_service(
    orders: MockOrderRepository,
    products: MockProductRepository,
) -> OrderService<MockOrderRepository, MockProductRepository> {
    OrderService::new(
        Arc::new(orders),
        Arc::new(products),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
    )
}

fn product(name: &str, cents: i64) -> Product {
    Product {
        id: ProductId::random(),
        name: name.to_owned(),
        price: Price::from_cents(cents).expect("valid price"),
        image: format!("/img/{name}.png"),
        category: "Food".to_owned(),
        description: String::new(),
        rating: 0.0,
        reviews: 0,
        is_new: false,
        created_at: fixture_now(),
        updated_at: fixture_now(),
    }
}

fn catalog(products: Vec<Product>) -> MockProductRepository {
    let mut repo = MockProductRepository::new();
    repo.expect_find_by_id().returning(move |id| {
        Ok(products.iter().find(|product| &product.id == id).cloned())
    });
    repo
}

fn line(product: &str, quantity: i64) -> OrderLineInput {
    OrderLineInput {
        product: Some(product.to_owned()),
        quantity: Some(quantity),
    }
}

fn order_input(items: Vec<OrderLineInput>) -> OrderInput {
    OrderInput {
        items,
        shipping_address: Some("1 Elm St".to_owned()),
        contact_name: Some("Jane".to_owned()),
        contact_email: Some("jane@example.com".to_owned()),
        contact_phone: Some("555-0100".to_owned()),
        delivery_notes: None,
    }
}

fn stored(owner: UserId, status: OrderStatus) -> Order {
    Order {
        id: OrderId::random(),
        user_id: owner,
        items: Vec::new(),
        total_amount: Price::ZERO,
        shipping_address: "1 Elm St".to_owned(),
        contact_info: ContactInfo::try_new(Some("Jane"), Some("jane@example.com"), Some("555"))
            .expect("valid contact"),
        payment_method: PaymentMethod::CashOnDelivery,
        delivery_notes: String::new(),
        status,
        created_at: fixture_now(),
        updated_at: fixture_now(),
    }
}

fn member() -> Caller {
    Caller::new(UserId::random(), false)
}

fn admin() -> Caller {
    Caller::new(UserId::random(), true)
}

#[rstest]
#[tokio::test]
async fn create_prices_lines_from_the_catalog() {
    let kibble = product("kibble", 1_000);
    let treats = product("treats", 450);
    let input = order_input(vec![
        line(&kibble.id.to_string(), 2),
        line(&treats.id.to_string(), 3),
    ]);
    let mut orders = MockOrderRepository::new();
    orders
        .expect_insert()
        .withf(|order: &Order| order.total_amount.cents() == 3_350)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(orders, catalog(vec![kibble, treats]));
    let caller = member();
    let details = service.create(&caller, input).await.expect("placed");

    assert_eq!(details.total_amount.as_decimal(), 33.5);
    assert_eq!(details.status, OrderStatus::Pending);
    assert_eq!(details.payment_method, PaymentMethod::CashOnDelivery);
    assert_eq!(details.user_id, caller.user_id());
    let names: Vec<_> = details
        .items
        .iter()
        .filter_map(|item| item.product_details.as_ref().map(|d| d.name.as_str()))
        .collect();
    assert_eq!(names, ["kibble", "treats"]);
}

#[rstest]
#[case::unknown_uuid(ProductId::random().to_string())]
#[case::not_a_uuid("abc".to_owned())]
#[tokio::test]
async fn create_rejects_unknown_products(#[case] reference: String) {
    let mut orders = MockOrderRepository::new();
    orders.expect_insert().times(0);

    let service = make_service(orders, catalog(Vec::new()));
    let err = service
        .create(&member(), order_input(vec![line(&reference, 1)]))
        .await
        .expect_err("unknown product");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), format!("Product not found: {reference}"));
}

#[rstest]
#[tokio::test]
async fn create_validates_before_touching_the_catalog() {
    let mut products = MockProductRepository::new();
    products.expect_find_by_id().times(0);

    let service = make_service(MockOrderRepository::new(), products);
    let err = service
        .create(&member(), order_input(Vec::new()))
        .await
        .expect_err("empty order");

    assert_eq!(err.message(), "Order must contain at least one item");
}

#[rstest]
#[case(OrderStatus::Pending, true)]
#[case(OrderStatus::Cancelled, true)]
#[case(OrderStatus::Processing, false)]
#[case(OrderStatus::Shipped, false)]
#[case(OrderStatus::Delivered, false)]
#[tokio::test]
async fn owners_delete_only_pending_or_cancelled(
    #[case] status: OrderStatus,
    #[case] deletable: bool,
) {
    let caller = member();
    let order = stored(caller.user_id(), status);
    let order_id = order.id;
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(order)));
    orders
        .expect_delete()
        .times(usize::from(deletable))
        .returning(|_| Ok(true));

    let service = make_service(orders, MockProductRepository::new());
    let result = service.delete(&caller, &order_id).await;

    if deletable {
        assert!(result.is_ok());
    } else {
        let err = result.expect_err("not deletable");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), "Can only delete pending or cancelled orders");
    }
}

#[rstest]
#[tokio::test]
async fn strangers_cannot_read_an_order() {
    let order = stored(UserId::random(), OrderStatus::Pending);
    let order_id = order.id;
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(order)));

    let service = make_service(orders, MockProductRepository::new());
    let err = service
        .get(&member(), &order_id)
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "Not authorized to access this order");
}

#[rstest]
#[tokio::test]
async fn status_updates_are_admin_only() {
    let mut orders = MockOrderRepository::new();
    orders.expect_find_by_id().times(0);

    let service = make_service(orders, MockProductRepository::new());
    let err = service
        .update_status(&member(), &OrderId::random(), "Shipped".to_owned())
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case("shipped")]
#[case("Lost")]
#[tokio::test]
async fn status_updates_reject_unknown_values(#[case] status: &str) {
    let service = make_service(MockOrderRepository::new(), MockProductRepository::new());
    let err = service
        .update_status(&admin(), &OrderId::random(), status.to_owned())
        .await
        .expect_err("invalid");

    assert_eq!(err.message(), "Invalid status");
}

#[rstest]
#[tokio::test]
async fn admin_update_changes_notes_and_keeps_blank_status() {
    let order = stored(UserId::random(), OrderStatus::Processing);
    let order_id = order.id;
    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(order)));
    orders
        .expect_update()
        .withf(|order: &Order| order.delivery_notes == "leave at door")
        .return_once(|_| Ok(true));
    let mut products = MockProductRepository::new();
    products.expect_find_many().return_once(|_| Ok(Vec::new()));

    let service = make_service(orders, products);
    let details = service
        .update(
            &admin(),
            &order_id,
            Some("  ".to_owned()),
            Some("leave at door".to_owned()),
        )
        .await
        .expect("updated");

    assert_eq!(details.status, OrderStatus::Processing);
    assert_eq!(details.updated_at, fixture_now());
}

#[rstest]
#[tokio::test]
async fn catalog_outage_is_service_unavailable() {
    let mut products = MockProductRepository::new();
    products
        .expect_find_by_id()
        .return_once(|_| Err(ProductRepositoryError::connection("refused")));

    let service = make_service(MockOrderRepository::new(), products);
    let err = service
        .create(
            &member(),
            order_input(vec![line(&ProductId::random().to_string(), 1)]),
        )
        .await
        .expect_err("outage");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
