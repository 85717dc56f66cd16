//! Tests for the appointment booking service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockAppointmentRepository, MockUserRepository};
use crate::domain::{
    AppointmentService, Email, ErrorCode, PasswordHash, SlotTime, User, parse_slot_date,
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
    appointments: MockAppointmentRepository,
    users: MockUserRepository,
) -> AppointmentBookingService<MockAppointmentRepository, MockUserRepository> {
    AppointmentBookingService::new(
        Arc::new(appointments),
        Arc::new(users),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
    )
}

#[fixture]
fn input() -> AppointmentInput {
    AppointmentInput {
        pet: Some("p1".to_owned()),
        service: Some("Checkup".to_owned()),
        date: Some("2025-06-01".to_owned()),
        time: Some("10:00".to_owned()),
        notes: Some(String::new()),
        status: None,
    }
}

fn stored(owner: UserId, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: AppointmentId::random(),
        user_id: owner,
        pet: "p1".to_owned(),
        service: AppointmentService::Checkup,
        date: parse_slot_date("2025-06-01").expect("valid date"),
        time: SlotTime::parse("10:00").expect("valid time"),
        notes: String::new(),
        status,
        created_at: fixture_now(),
        updated_at: fixture_now(),
    }
}

fn owner(id: UserId) -> User {
    User {
        id,
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
        email: Email::new("jane@example.com").expect("valid email"),
        password_hash: PasswordHash::new("hash"),
        phone: "555-0100".to_owned(),
        address: String::new(),
        is_admin: false,
        pets: Vec::new(),
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
async fn create_books_a_free_slot_as_pending(input: AppointmentInput) {
    let caller = member();
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_find_conflicting()
        .withf(|slot: &Slot, exclude: &Option<AppointmentId>| {
            slot.to_string() == "2025-06-01 10:00" && exclude.is_none()
        })
        .return_once(|_, _| Ok(None));
    appointments
        .expect_insert()
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(appointments, MockUserRepository::new());
    let created = service.create(&caller, input).await.expect("booked");

    assert_eq!(created.status, AppointmentStatus::Pending);
    assert_eq!(created.user_id, caller.user_id());
    assert_eq!(created.created_at, fixture_now());
}

#[rstest]
#[tokio::test]
async fn create_rejects_a_held_slot(input: AppointmentInput) {
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_find_conflicting()
        .return_once(|_, _| Ok(Some(stored(UserId::random(), AppointmentStatus::Confirmed))));
    appointments.expect_insert().times(0);

    let service = make_service(appointments, MockUserRepository::new());
    let err = service.create(&member(), input).await.expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "This time slot is already booked");
}

#[rstest]
#[tokio::test]
async fn create_maps_lost_race_to_conflict(input: AppointmentInput) {
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_find_conflicting()
        .return_once(|_, _| Ok(None));
    appointments
        .expect_insert()
        .return_once(|_| Err(AppointmentRepositoryError::slot_taken("2025-06-01 10:00")));

    let service = make_service(appointments, MockUserRepository::new());
    let err = service.create(&member(), input).await.expect_err("conflict");

    assert_eq!(err.message(), "This time slot is already booked");
}

#[rstest]
#[tokio::test]
async fn update_rechecks_slot_excluding_itself() {
    let caller = member();
    let existing = stored(caller.user_id(), AppointmentStatus::Pending);
    let existing_id = existing.id;
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    appointments
        .expect_find_conflicting()
        .withf(move |_, exclude: &Option<AppointmentId>| *exclude == Some(existing_id))
        .times(1)
        .return_once(|_, _| Ok(None));
    appointments.expect_update().return_once(|_| Ok(true));

    let service = make_service(appointments, MockUserRepository::new());
    let changes = AppointmentInput {
        date: Some("2025-06-02".to_owned()),
        time: Some("11:00".to_owned()),
        ..AppointmentInput::default()
    };
    let updated = service
        .update(&caller, &existing_id, changes)
        .await
        .expect("moved");

    assert_eq!(updated.time.to_string(), "11:00");
}

#[rstest]
#[tokio::test]
async fn update_with_only_a_date_skips_the_slot_check() {
    let caller = member();
    let existing = stored(caller.user_id(), AppointmentStatus::Pending);
    let existing_id = existing.id;
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    appointments.expect_find_conflicting().times(0);
    appointments.expect_update().return_once(|_| Ok(true));

    let service = make_service(appointments, MockUserRepository::new());
    let changes = AppointmentInput {
        date: Some("2025-06-03".to_owned()),
        notes: Some("bring records".to_owned()),
        ..AppointmentInput::default()
    };
    let updated = service
        .update(&caller, &existing_id, changes)
        .await
        .expect("updated");

    assert_eq!(updated.notes, "bring records");
}

#[rstest]
#[case("bogus", "Invalid status")]
#[case("completed", "Invalid status")]
#[tokio::test]
async fn update_status_rejects_values_outside_the_enum(
    #[case] status: &str,
    #[case] message: &str,
) {
    let existing = stored(UserId::random(), AppointmentStatus::Pending);
    let existing_id = existing.id;
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    appointments.expect_update().times(0);

    let service = make_service(appointments, MockUserRepository::new());
    let err = service
        .update_status(&admin(), &existing_id, status.to_owned())
        .await
        .expect_err("invalid");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), message);
}

#[rstest]
#[case(AppointmentStatus::Cancelled, "confirmed")]
#[case(AppointmentStatus::Confirmed, "pending")]
#[tokio::test]
async fn admins_may_set_any_valid_status(#[case] from: AppointmentStatus, #[case] to: &str) {
    let existing = stored(UserId::random(), from);
    let existing_id = existing.id;
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    appointments.expect_update().return_once(|_| Ok(true));

    let service = make_service(appointments, MockUserRepository::new());
    let updated = service
        .update_status(&admin(), &existing_id, to.to_owned())
        .await
        .expect("status changed");

    assert_eq!(updated.status.as_str(), to);
}

#[rstest]
#[case("cancelled", true)]
#[case("confirmed", false)]
#[tokio::test]
async fn owners_may_only_cancel(#[case] status: &str, #[case] allowed: bool) {
    let caller = member();
    let existing = stored(caller.user_id(), AppointmentStatus::Pending);
    let existing_id = existing.id;
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    appointments.expect_update().returning(|_| Ok(true));

    let service = make_service(appointments, MockUserRepository::new());
    let result = service
        .update_status(&caller, &existing_id, status.to_owned())
        .await;

    if allowed {
        assert!(result.is_ok());
    } else {
        let err = result.expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}

#[rstest]
#[tokio::test]
async fn strangers_cannot_read_or_delete() {
    let existing = stored(UserId::random(), AppointmentStatus::Pending);
    let existing_id = existing.id;
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    appointments.expect_delete().times(0);

    let service = make_service(appointments, MockUserRepository::new());
    let err = service
        .delete(&member(), &existing_id)
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn missing_appointments_are_not_found() {
    let mut appointments = MockAppointmentRepository::new();
    appointments.expect_find_by_id().return_once(|_| Ok(None));

    let service = make_service(appointments, MockUserRepository::new());
    let err = service
        .get(&admin(), &AppointmentId::random())
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Appointment not found");
}

#[rstest]
#[tokio::test]
async fn members_list_only_their_own_with_owner_details() {
    let caller = member();
    let mine = stored(caller.user_id(), AppointmentStatus::Pending);
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_list()
        .withf(move |owner: &Option<UserId>| *owner == Some(caller.user_id()))
        .return_once(move |_| Ok(vec![mine]));
    let mut users = MockUserRepository::new();
    users
        .expect_find_many()
        .return_once(move |ids| Ok(ids.iter().copied().map(owner).collect()));

    let service = make_service(appointments, users);
    let listed = service.list(&caller).await.expect("listed");

    assert_eq!(listed.len(), 1);
    let summary = listed[0].user.as_ref().expect("owner joined");
    assert_eq!(summary.first_name, "Jane");
}

#[rstest]
#[tokio::test]
async fn admins_list_everything() {
    let mut appointments = MockAppointmentRepository::new();
    appointments
        .expect_list()
        .withf(|owner: &Option<UserId>| owner.is_none())
        .return_once(|_| Ok(Vec::new()));
    let mut users = MockUserRepository::new();
    users.expect_find_many().return_once(|_| Ok(Vec::new()));

    let service = make_service(appointments, users);
    let listed = service.list(&admin()).await.expect("listed");

    assert!(listed.is_empty());
}
