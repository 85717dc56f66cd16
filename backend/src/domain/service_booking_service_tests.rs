//! Tests for the service booking service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockServiceBookingRepository, MockUserRepository};
use crate::domain::{
    Email, ErrorCode, PasswordHash, Pet, PetId, Price, ServiceType, SlotTime, User,
    parse_slot_date,
};

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
    Utc.with_ymd_and_hms(2025, 5, 20, 8, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn make_service(
    bookings: MockServiceBookingRepository,
    users: MockUserRepository,
) -> ServiceBookingService<MockServiceBookingRepository, MockUserRepository> {
    ServiceBookingService::new(
        Arc::new(bookings),
        Arc::new(users),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
    )
}

struct Household {
    owner: User,
    pet_id: PetId,
}

#[fixture]
fn household() -> Household {
    let pet_id = PetId::random();
    let owner = User {
        id: UserId::random(),
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
        email: Email::new("jane@example.com").expect("valid email"),
        password_hash: PasswordHash::new("hash"),
        phone: "555-0100".to_owned(),
        address: "1 Elm St".to_owned(),
        is_admin: false,
        pets: vec![Pet {
            id: pet_id,
            name: "Biscuit".to_owned(),
            kind: "Dog".to_owned(),
            breed: "Beagle".to_owned(),
            age: 3,
        }],
        created_at: fixture_now(),
        updated_at: fixture_now(),
    };
    Household { owner, pet_id }
}

fn input(pet: &PetId) -> BookingInput {
    BookingInput {
        pet: Some(pet.to_string()),
        service_type: Some("Pet Taxi".to_owned()),
        date: Some("2025-06-01".to_owned()),
        time: Some("10:00".to_owned()),
        address: Some("1 Elm St".to_owned()),
        notes: None,
        price: Some(25.0),
        status: None,
    }
}

fn booking(owner: UserId, pet: &PetId, service_type: ServiceType, cents: i64) -> ServiceBooking {
    ServiceBooking {
        id: BookingId::random(),
        user_id: owner,
        pet: pet.to_string(),
        service_type,
        date: parse_slot_date("2025-06-01").expect("valid date"),
        time: SlotTime::parse("10:00").expect("valid time"),
        address: "1 Elm St".to_owned(),
        notes: String::new(),
        status: BookingStatus::Pending,
        price: Price::from_cents(cents).expect("valid price"),
        created_at: fixture_now(),
        updated_at: fixture_now(),
    }
}

fn users_returning(owner: User) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(owner.clone())));
    users
}

#[rstest]
#[tokio::test]
async fn create_books_for_an_owned_pet(household: Household) {
    let caller = Caller::new(household.owner.id, false);
    let mut bookings = MockServiceBookingRepository::new();
    bookings
        .expect_insert()
        .withf(|booking: &ServiceBooking| booking.price.cents() == 2_500)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(bookings, users_returning(household.owner));
    let created = service
        .create(&caller, input(&household.pet_id))
        .await
        .expect("booked");

    assert_eq!(created.status, BookingStatus::Pending);
    assert_eq!(created.service_type, ServiceType::PetTaxi);
}

#[rstest]
#[tokio::test]
async fn create_stores_the_canonical_pet_id(household: Household) {
    let caller = Caller::new(household.owner.id, false);
    let canonical = household.pet_id.to_string();
    let expected = canonical.clone();
    let mut bookings = MockServiceBookingRepository::new();
    bookings
        .expect_insert()
        .withf(move |booking: &ServiceBooking| booking.pet == expected)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(bookings, users_returning(household.owner));
    let mut raw = input(&household.pet_id);
    raw.pet = Some(canonical.to_uppercase());
    let created = service.create(&caller, raw).await.expect("booked");

    assert_eq!(created.pet, canonical);
}

#[rstest]
#[tokio::test]
async fn update_stores_the_canonical_pet_id(household: Household) {
    let mut stored = booking(household.owner.id, &household.pet_id, ServiceType::HomeVisit, 1_000);
    stored.pet = PetId::random().to_string();
    let stored_id = stored.id;
    let canonical = household.pet_id.to_string();
    let expected = canonical.clone();
    let mut bookings = MockServiceBookingRepository::new();
    bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    bookings
        .expect_update()
        .withf(move |booking: &ServiceBooking| booking.pet == expected)
        .times(1)
        .return_once(|_| Ok(true));

    let service = make_service(bookings, users_returning(household.owner.clone()));
    let changes = BookingInput {
        pet: Some(canonical.to_uppercase()),
        ..BookingInput::default()
    };
    let owner = Caller::new(household.owner.id, false);
    let updated = service
        .update(&owner, &stored_id, changes)
        .await
        .expect("updated");

    assert_eq!(updated.pet, canonical);
}

#[rstest]
#[tokio::test]
async fn create_rejects_someone_elses_pet(household: Household) {
    let caller = Caller::new(household.owner.id, false);
    let mut bookings = MockServiceBookingRepository::new();
    bookings.expect_insert().times(0);

    let service = make_service(bookings, users_returning(household.owner));
    let err = service
        .create(&caller, input(&PetId::random()))
        .await
        .expect_err("foreign pet");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "Pet not found");
}

#[rstest]
#[tokio::test]
async fn create_requires_every_field(household: Household) {
    let caller = Caller::new(household.owner.id, false);
    let mut raw = input(&household.pet_id);
    raw.address = None;

    let service = make_service(MockServiceBookingRepository::new(), MockUserRepository::new());
    let err = service.create(&caller, raw).await.expect_err("missing");

    assert_eq!(err.message(), "All fields are required");
}

#[rstest]
#[tokio::test]
async fn update_checks_new_pet_against_the_booking_owner(household: Household) {
    let stored = booking(household.owner.id, &household.pet_id, ServiceType::HomeVisit, 1_000);
    let stored_id = stored.id;
    let mut bookings = MockServiceBookingRepository::new();
    bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    bookings.expect_update().times(0);

    let service = make_service(bookings, users_returning(household.owner));
    let changes = BookingInput {
        pet: Some(PetId::random().to_string()),
        ..BookingInput::default()
    };
    let admin = Caller::new(UserId::random(), true);
    let err = service
        .update(&admin, &stored_id, changes)
        .await
        .expect_err("unknown pet");

    assert_eq!(err.message(), "Pet not found");
}

#[rstest]
#[case("completed", true)]
#[case("cancelled", false)]
#[tokio::test]
async fn only_admins_complete_bookings(
    household: Household,
    #[case] status: &str,
    #[case] needs_admin: bool,
) {
    let stored = booking(household.owner.id, &household.pet_id, ServiceType::PetBoarding, 1_000);
    let stored_id = stored.id;
    let mut bookings = MockServiceBookingRepository::new();
    bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    bookings.expect_update().returning(|_| Ok(true));

    let service = make_service(bookings, MockUserRepository::new());
    let owner = Caller::new(household.owner.id, false);
    let result = service
        .update_status(&owner, &stored_id, status.to_owned())
        .await;

    if needs_admin {
        assert_eq!(
            result.expect_err("forbidden").code(),
            ErrorCode::Forbidden
        );
    } else {
        assert_eq!(
            result.expect("cancelled").status,
            BookingStatus::Cancelled
        );
    }
}

#[rstest]
#[tokio::test]
async fn unknown_status_is_rejected(household: Household) {
    let stored = booking(household.owner.id, &household.pet_id, ServiceType::PetTaxi, 1_000);
    let stored_id = stored.id;
    let mut bookings = MockServiceBookingRepository::new();
    bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));

    let service = make_service(bookings, MockUserRepository::new());
    let err = service
        .update_status(&Caller::new(UserId::random(), true), &stored_id, "done".to_owned())
        .await
        .expect_err("invalid");

    assert_eq!(err.message(), "Invalid status");
}

#[rstest]
#[tokio::test]
async fn strangers_cannot_see_a_booking(household: Household) {
    let stored = booking(household.owner.id, &household.pet_id, ServiceType::PetTaxi, 1_000);
    let stored_id = stored.id;
    let mut bookings = MockServiceBookingRepository::new();
    bookings
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));

    let service = make_service(bookings, MockUserRepository::new());
    let err = service
        .get(&Caller::new(UserId::random(), false), &stored_id)
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "Not authorized to access this booking");
}

#[rstest]
#[tokio::test]
async fn list_mine_attaches_pet_details(household: Household) {
    let owner_id = household.owner.id;
    let stored = booking(owner_id, &household.pet_id, ServiceType::PetTaxi, 1_000);
    let mut bookings = MockServiceBookingRepository::new();
    bookings
        .expect_list()
        .withf(move |owner: &Option<UserId>| *owner == Some(owner_id))
        .return_once(move |_| Ok(vec![stored]));
    let owner = household.owner;
    let mut users = MockUserRepository::new();
    users
        .expect_find_many()
        .return_once(move |_| Ok(vec![owner]));

    let service = make_service(bookings, users);
    let listed = service
        .list_mine(&Caller::new(owner_id, false))
        .await
        .expect("listed");

    let details = listed[0].pet_details.as_ref().expect("pet joined");
    assert_eq!(details.name, "Biscuit");
}

#[rstest]
#[tokio::test]
async fn list_all_is_admin_only() {
    let mut bookings = MockServiceBookingRepository::new();
    bookings.expect_list().times(0);

    let service = make_service(bookings, MockUserRepository::new());
    let err = service
        .list_all(&Caller::new(UserId::random(), false))
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn stats_fold_every_booking(household: Household) {
    let owner = household.owner.id;
    let pet = household.pet_id;
    let mut bookings = MockServiceBookingRepository::new();
    bookings.expect_list().return_once(move |_| {
        Ok(vec![
            booking(owner, &pet, ServiceType::PetTaxi, 1_000),
            booking(owner, &pet, ServiceType::PetTaxi, 2_000),
            booking(owner, &pet, ServiceType::HomeVisit, 3_000),
        ])
    });

    let service = make_service(bookings, MockUserRepository::new());
    let stats = service
        .stats(&Caller::new(UserId::random(), true))
        .await
        .expect("stats");

    assert_eq!(stats.overall.total_bookings, 3);
    assert_eq!(stats.overall.total_revenue.cents(), 6_000);
    assert_eq!(stats.overall.average_price.cents(), 2_000);
    assert_eq!(stats.by_service[0].service_type, ServiceType::PetTaxi);
    assert_eq!(stats.by_service[0].count, 2);
}

#[rstest]
#[tokio::test]
async fn repository_outage_is_service_unavailable() {
    let mut bookings = MockServiceBookingRepository::new();
    bookings
        .expect_list()
        .return_once(|_| Err(ServiceBookingRepositoryError::connection("refused")));

    let service = make_service(bookings, MockUserRepository::new());
    let err = service
        .stats(&Caller::new(UserId::random(), true))
        .await
        .expect_err("outage");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
