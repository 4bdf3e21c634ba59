//! Booking a shoot drives the client pipeline.
//!
//! A fresh lead is booked twice. The first booking advances it to `Booked`,
//! the second leaves it there. A booking for a client that no longer exists
//! is still stored and shows up as dangling.

use chrono::{Duration, TimeZone, Utc};
use sd_schemas::{AppointmentKind, ClientStatus, NewAppointment, NewClient};
use sd_store::Store;
use uuid::Uuid;

fn draft_client(name: &str, email: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        email: email.to_string(),
        phone: String::new(),
        notes: None,
    }
}

fn draft_appt(client_id: Uuid, title: &str, days_ahead: i64) -> NewAppointment {
    NewAppointment {
        client_id,
        title: title.to_string(),
        date: Utc.with_ymd_and_hms(2023, 11, 20, 15, 0, 0).unwrap() + Duration::days(days_ahead),
        location: "Studio".to_string(),
        kind: AppointmentKind::PortraitSession,
    }
}

#[test]
fn lead_is_booked_once_then_stays() {
    let now = Utc.with_ymd_and_hms(2023, 11, 20, 12, 0, 0).unwrap();
    let mut store = Store::new();
    let c = store.create_client(draft_client("Ana", "ana@example.com"), now);
    assert_eq!(c.status, ClientStatus::Lead);
    assert_eq!(c.created_at, now);

    let first = store.book_appointment(draft_appt(c.id, "Newborn session", 1));
    assert_eq!(first.status_change(), Some((ClientStatus::Lead, ClientStatus::Booked)));
    assert!(!first.appointment.completed);
    assert_eq!(store.client(c.id).unwrap().status, ClientStatus::Booked);

    let second = store.book_appointment(draft_appt(c.id, "Album review", 7));
    assert_eq!(second.status_change(), None);
    assert!(second.transition.is_some());
    assert_eq!(store.client(c.id).unwrap().status, ClientStatus::Booked);
    assert_eq!(store.appointments_for_client(c.id).len(), 2);
}

#[test]
fn completed_client_is_not_demoted_by_booking() {
    let now = Utc.with_ymd_and_hms(2023, 11, 20, 12, 0, 0).unwrap();
    let mut store = Store::new();
    let mut c = store.create_client(draft_client("Bia", "bia@example.com"), now);
    c.status = ClientStatus::Completed;
    assert!(store.update_client(c.clone()));

    let out = store.book_appointment(draft_appt(c.id, "Anniversary shoot", 3));
    assert_eq!(out.status_change(), None);
    assert_eq!(store.client(c.id).unwrap().status, ClientStatus::Completed);
}

#[test]
fn unknown_client_booking_is_stored_and_dangling() {
    let mut store = Store::new();
    let ghost = Uuid::new_v4();
    let out = store.book_appointment(draft_appt(ghost, "Walk-in", 0));
    assert!(out.transition.is_none());
    assert_eq!(store.appointments().len(), 1);
    assert_eq!(store.dangling_appointments().len(), 1);
}

#[test]
fn removing_a_client_leaves_its_appointments() {
    let now = Utc.with_ymd_and_hms(2023, 11, 20, 12, 0, 0).unwrap();
    let mut store = Store::new();
    let c = store.create_client(draft_client("Caio", "caio@example.com"), now);
    store.book_appointment(draft_appt(c.id, "Headshots", 2));
    assert!(store.dangling_appointments().is_empty());

    assert!(store.remove_client(c.id));
    assert!(store.client(c.id).is_none());
    assert_eq!(store.appointments().len(), 1);
    let dangling = store.dangling_appointments();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].client_id, c.id);

    // Second remove matches nothing.
    assert!(!store.remove_client(c.id));
}
