//! Lebenszyklus von Fahrten gegen den In-Memory-Speicher.

mod common;

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;
use uuid::Uuid;

use common::at;
use fahrtenbuch::dto::appointment_dto::CreateAppointmentRequest;
use fahrtenbuch::dto::driver_dto::CreateDriverRequest;
use fahrtenbuch::dto::trip_dto::{CreateTripRequest, UpdateTripRequest};
use fahrtenbuch::models::{AppointmentStatus, ChangeType, Driver, SortDirection, TripFilter, TripStatus};
use fahrtenbuch::repositories::{MemoryStore, TripRepository};
use fahrtenbuch::services::{AppointmentService, DriverService, ManualClock, TripLifecycle};
use fahrtenbuch::utils::errors::AppError;

struct Fixture {
    store: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
    trips: TripLifecycle,
    drivers: DriverService,
    appointments: AppointmentService,
}

fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(at(2024, 5, 10, 18, 0)));
    Fixture {
        trips: TripLifecycle::new(store.clone(), store.clone(), store.clone(), clock.clone()),
        drivers: DriverService::new(store.clone()),
        appointments: AppointmentService::new(store.clone(), store.clone(), store.clone()),
        store,
        clock,
    }
}

async fn register(f: &Fixture, name: &str, employee_number: &str) -> Driver {
    f.drivers
        .create(CreateDriverRequest {
            name: Some(name.to_string()),
            employee_number: Some(employee_number.to_string()),
        })
        .await
        .unwrap()
}

fn trip_request(driver: &Driver) -> CreateTripRequest {
    CreateTripRequest {
        driver_id: Some(driver.id),
        driver_name: Some(driver.name.clone()),
        date: Some("2024-05-10".to_string()),
        start_location: Some("München".to_string()),
        end_location: Some("Augsburg".to_string()),
        purpose: Some("Kundentermin".to_string()),
        business_partner: Some("Acme".to_string()),
        start_km: Some(json!(50000)),
        end_km: Some(json!("50080")),
        start_time: Some("08:00".to_string()),
        end_time: Some("17:00".to_string()),
        ..Default::default()
    }
}

fn completed_request(driver: &Driver) -> CreateTripRequest {
    CreateTripRequest {
        status: Some(TripStatus::Completed),
        ..trip_request(driver)
    }
}

fn purpose_patch(purpose: &str) -> UpdateTripRequest {
    UpdateTripRequest {
        purpose: Some(purpose.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_records_one_log_with_created_state() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;

    let trip = f.trips.create(trip_request(&driver)).await.unwrap();

    assert_eq!(trip.details.total_distance, Some(80));
    assert_eq!(trip.details.status, TripStatus::Active);
    assert_eq!(f.store.trip_log_count().await, 1);

    let logs = f.trips.logs(trip.id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].change_type, ChangeType::Create);
    assert_eq!(logs[0].snapshot, trip.details);
    assert_eq!(logs[0].changed_by, driver.id.to_string());
}

#[tokio::test]
async fn update_logs_the_state_before_the_change() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;
    let trip = f.trips.create(completed_request(&driver)).await.unwrap();

    f.clock.advance(Duration::days(2));
    let patch = UpdateTripRequest {
        changed_by: Some("admin@firma.de".to_string()),
        ..purpose_patch("Messe")
    };
    let updated = f.trips.update(trip.id, patch).await.unwrap();

    assert_eq!(updated.details.purpose, "Messe");
    assert_eq!(updated.created_at, trip.created_at);

    let logs = f.trips.logs(trip.id).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1].change_type, ChangeType::Update);
    assert_eq!(logs[1].changed_by, "admin@firma.de");
    assert_eq!(logs[1].snapshot.purpose, "Kundentermin");
    assert_eq!(logs[1].snapshot, trip.details);
}

#[tokio::test]
async fn delete_logs_final_state_and_logs_survive() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;
    let trip = f.trips.create(trip_request(&driver)).await.unwrap();

    f.trips.delete(trip.id, Some("admin")).await.unwrap();

    assert!(matches!(f.trips.get(trip.id).await, Err(AppError::NotFound(_))));
    let logs = f.trips.logs(trip.id).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1].change_type, ChangeType::Delete);
    assert_eq!(logs[1].snapshot, trip.details);
    assert_eq!(logs[1].trip_created_at, trip.created_at);
}

#[tokio::test]
async fn scenario_update_after_eight_days_is_forbidden() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;
    let trip = f.trips.create(completed_request(&driver)).await.unwrap();

    // Trip ends 2024-05-10 17:00
    f.clock.set(at(2024, 5, 12, 9, 0));
    f.trips.update(trip.id, purpose_patch("Messe")).await.unwrap();

    f.clock.set(at(2024, 5, 18, 17, 0));
    let result = f.trips.update(trip.id, purpose_patch("Zu spät")).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(f.store.trip_log_count().await, 2);
}

#[tokio::test]
async fn edit_window_boundary_uses_whole_days() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;
    let trip = f.trips.create(completed_request(&driver)).await.unwrap();

    // exactly 7 days after end
    f.clock.set(at(2024, 5, 17, 17, 0));
    assert!(f.trips.update(trip.id, purpose_patch("a")).await.is_ok());

    // 7 days 23:59 is still day 7
    f.clock.set(at(2024, 5, 18, 16, 59));
    assert!(f.trips.update(trip.id, purpose_patch("b")).await.is_ok());

    // day 8
    f.clock.set(at(2024, 5, 18, 17, 0));
    assert!(matches!(
        f.trips.update(trip.id, purpose_patch("c")).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        f.trips.delete(trip.id, None).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn edit_window_without_end_time_starts_at_midnight() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;
    let request = CreateTripRequest {
        end_time: None,
        ..completed_request(&driver)
    };
    let trip = f.trips.create(request).await.unwrap();

    f.clock.set(at(2024, 5, 17, 23, 59));
    assert!(f.trips.update(trip.id, purpose_patch("a")).await.is_ok());

    f.clock.set(at(2024, 5, 18, 0, 0));
    assert!(matches!(
        f.trips.update(trip.id, purpose_patch("b")).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn locked_trip_is_forbidden_regardless_of_patch() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;
    let trip = f.trips.create(completed_request(&driver)).await.unwrap();
    f.clock.set(at(2024, 6, 30, 12, 0));

    let invalid = UpdateTripRequest {
        start_km: Some(json!("kein Wert")),
        purpose: Some("".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        f.trips.update(trip.id, invalid).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        f.trips.update(trip.id, UpdateTripRequest::default()).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn active_trips_stay_editable() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;
    let trip = f.trips.create(trip_request(&driver)).await.unwrap();

    f.clock.set(at(2025, 1, 1, 12, 0));
    let done = UpdateTripRequest {
        status: Some(TripStatus::Completed),
        ..Default::default()
    };
    let updated = f.trips.update(trip.id, done).await.unwrap();
    assert_eq!(updated.details.status, TripStatus::Completed);

    // jetzt abgeschlossen und lange vorbei
    assert!(matches!(
        f.trips.delete(trip.id, None).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn scenario_empty_detour_reason_is_rejected() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;

    let request = CreateTripRequest {
        detour: true,
        detour_reason: Some("".to_string()),
        ..trip_request(&driver)
    };
    assert!(matches!(
        f.trips.create(request).await,
        Err(AppError::Validation(_))
    ));

    let whitespace = CreateTripRequest {
        detour: true,
        detour_reason: Some("   ".to_string()),
        ..trip_request(&driver)
    };
    assert!(matches!(
        f.trips.create(whitespace).await,
        Err(AppError::Validation(_))
    ));

    let missing = CreateTripRequest {
        detour: true,
        ..trip_request(&driver)
    };
    assert!(matches!(
        f.trips.create(missing).await,
        Err(AppError::Validation(_))
    ));

    assert_eq!(f.store.trip_log_count().await, 0);
}

#[tokio::test]
async fn missing_required_fields_are_rejected() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;

    let request = CreateTripRequest {
        business_partner: None,
        ..trip_request(&driver)
    };
    assert!(matches!(
        f.trips.create(request).await,
        Err(AppError::Validation(_))
    ));

    let blank_purpose = CreateTripRequest {
        purpose: Some("  ".to_string()),
        ..trip_request(&driver)
    };
    assert!(matches!(
        f.trips.create(blank_purpose).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn odometer_must_increase() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;

    let request = CreateTripRequest {
        end_km: Some(json!(49999)),
        ..trip_request(&driver)
    };
    assert!(matches!(
        f.trips.create(request).await,
        Err(AppError::Validation(_))
    ));

    let garbage = CreateTripRequest {
        end_km: Some(json!("viel")),
        ..trip_request(&driver)
    };
    assert!(matches!(
        f.trips.create(garbage).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn update_and_delete_of_unknown_trip_are_not_found() {
    let f = fixture();
    let id = Uuid::new_v4();

    assert!(matches!(
        f.trips.update(id, purpose_patch("x")).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(f.trips.delete(id, None).await, Err(AppError::NotFound(_))));
    assert!(matches!(f.trips.logs(id).await, Err(AppError::NotFound(_))));
    assert_eq!(f.store.trip_log_count().await, 0);
}

#[tokio::test]
async fn list_is_filtered_ordered_and_repeatable() {
    let f = fixture();
    let max = register(&f, "Max Mustermann", "E1").await;
    let erika = register(&f, "Erika Muster", "E2").await;

    for (driver, date) in [
        (&max, "2024-05-01"),
        (&max, "2024-05-03"),
        (&erika, "2024-05-02"),
        (&max, "2024-05-02"),
    ] {
        let request = CreateTripRequest {
            date: Some(date.to_string()),
            ..trip_request(driver)
        };
        f.trips.create(request).await.unwrap();
    }

    let filter = TripFilter {
        driver_id: Some(max.id),
        ..TripFilter::default()
    };
    let first = f.trips.list(&filter).await.unwrap();
    let second = f.trips.list(&filter).await.unwrap();
    assert_eq!(first, second);

    let dates: Vec<String> = first.iter().map(|t| t.details.date.to_string()).collect();
    assert_eq!(dates, ["2024-05-03", "2024-05-02", "2024-05-01"]);

    let ascending = TripFilter {
        direction: SortDirection::Ascending,
        from: Some(chrono::NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()),
        ..TripFilter::default()
    };
    let trips = f.trips.list(&ascending).await.unwrap();
    assert_eq!(trips.len(), 3);
    assert!(trips.windows(2).all(|w| w[0].details.date <= w[1].details.date));
}

#[tokio::test]
async fn scenario_duplicate_employee_number_conflicts() {
    let f = fixture();
    register(&f, "Max Mustermann", "E1").await;

    let result = f
        .drivers
        .create(CreateDriverRequest {
            name: Some("Moritz Mustermann".to_string()),
            employee_number: Some(" E1 ".to_string()),
        })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(f.drivers.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn appointment_flow_feeds_scheduled_trips() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;

    let appointment = f
        .appointments
        .create(CreateAppointmentRequest {
            driver_id: Some(driver.id),
            date: Some("2024-05-20".to_string()),
            time: Some("09:30".to_string()),
            start_location: Some("München".to_string()),
            end_location: Some("Ulm".to_string()),
            purpose: Some("Wartung".to_string()),
            assigned_by: Some("admin".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.driver_name, "Max Mustermann");

    // pending appointments cannot back a trip
    let early = CreateTripRequest {
        appointment_id: Some(appointment.id),
        ..trip_request(&driver)
    };
    assert!(matches!(
        f.trips.create(early).await,
        Err(AppError::Validation(_))
    ));

    f.appointments
        .respond(appointment.id, AppointmentStatus::Accepted)
        .await
        .unwrap();
    assert!(matches!(
        f.appointments
            .respond(appointment.id, AppointmentStatus::Declined)
            .await,
        Err(AppError::Conflict(_))
    ));

    let scheduled = f.appointments.scheduled(driver.id).await.unwrap();
    assert_eq!(scheduled.len(), 1);

    let request = CreateTripRequest {
        appointment_id: Some(appointment.id),
        ..trip_request(&driver)
    };
    f.trips.create(request).await.unwrap();

    assert!(f.appointments.scheduled(driver.id).await.unwrap().is_empty());
    assert_eq!(
        f.store.referenced_appointment_ids(driver.id).await.unwrap(),
        vec![appointment.id]
    );
}

#[tokio::test]
async fn detour_reason_without_flag_is_kept() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;

    let request = CreateTripRequest {
        detour_reason: Some("Baustelle A8".to_string()),
        ..trip_request(&driver)
    };
    let trip = f.trips.create(request).await.unwrap();

    assert_eq!(trip.details.detour_reason.as_deref(), Some("Baustelle A8"));
    let logs = f.trips.logs(trip.id).await.unwrap();
    assert_eq!(logs[0].snapshot.detour_reason.as_deref(), Some("Baustelle A8"));
}

#[tokio::test]
async fn empty_detour_reason_without_flag_is_rejected() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;

    for reason in ["", "   "] {
        let request = CreateTripRequest {
            detour_reason: Some(reason.to_string()),
            ..trip_request(&driver)
        };
        assert!(matches!(
            f.trips.create(request).await,
            Err(AppError::Validation(_))
        ));
    }

    let trip = f.trips.create(trip_request(&driver)).await.unwrap();
    let patch = UpdateTripRequest {
        detour: Some(false),
        detour_reason: Some("".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        f.trips.update(trip.id, patch).await,
        Err(AppError::Validation(_))
    ));
    assert_eq!(f.store.trip_log_count().await, 1);
}

#[tokio::test]
async fn unknown_driver_is_rejected() {
    let f = fixture();
    let ghost = Driver::new("Niemand".to_string(), "X0".to_string());

    assert!(matches!(
        f.trips.create(trip_request(&ghost)).await,
        Err(AppError::Validation(_))
    ));
    assert_eq!(f.store.trip_log_count().await, 0);
}

#[tokio::test]
async fn concurrent_answers_accept_only_one() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;
    let appointment = f
        .appointments
        .create(CreateAppointmentRequest {
            driver_id: Some(driver.id),
            date: Some("2024-05-20".to_string()),
            time: Some("09:30".to_string()),
            start_location: Some("München".to_string()),
            end_location: Some("Ulm".to_string()),
            purpose: Some("Wartung".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let (accept, decline) = tokio::join!(
        f.appointments.respond(appointment.id, AppointmentStatus::Accepted),
        f.appointments.respond(appointment.id, AppointmentStatus::Declined),
    );
    let conflicts = [&accept, &decline]
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert_eq!(conflicts, 1);
    assert_eq!(accept.is_ok() as usize + decline.is_ok() as usize, 1);

    let winner = if accept.is_ok() {
        AppointmentStatus::Accepted
    } else {
        AppointmentStatus::Declined
    };
    let stored = f.appointments.list(Some(driver.id)).await.unwrap();
    assert_eq!(stored[0].status, winner);
}

#[tokio::test]
async fn completed_trip_end_cannot_be_postponed() {
    let f = fixture();
    let driver = register(&f, "Max Mustermann", "E1").await;
    let trip = f.trips.create(completed_request(&driver)).await.unwrap();

    f.clock.set(at(2024, 5, 16, 12, 0));
    let later = UpdateTripRequest {
        date: Some("2024-05-16".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        f.trips.update(trip.id, later).await,
        Err(AppError::Validation(_))
    ));

    // das Fenster läuft weiter vom ursprünglichen Ende
    f.clock.set(at(2024, 5, 18, 17, 0));
    assert!(matches!(
        f.trips.update(trip.id, purpose_patch("x")).await,
        Err(AppError::Forbidden(_))
    ));
}
