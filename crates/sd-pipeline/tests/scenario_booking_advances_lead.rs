//! Booking scenarios against full client records.
//!
//! A booked appointment advances a `Lead` client to `Booked`; a second
//! booking leaves it there. Clients already past the guard are never moved.

use chrono::{TimeZone, Utc};
use sd_pipeline::{apply_booking, Transition};
use sd_schemas::{Client, ClientStatus};
use uuid::Uuid;

fn client(status: ClientStatus) -> Client {
    Client {
        id: Uuid::new_v4(),
        name: "Carlos Andrade".to_string(),
        email: "carlos.a@example.com".to_string(),
        phone: "(21) 98888-5678".to_string(),
        status,
        notes: None,
        created_at: Utc.with_ymd_and_hms(2023, 11, 2, 0, 0, 0).unwrap(),
    }
}

#[test]
fn lead_client_is_booked_then_stays_booked() {
    let mut c = client(ClientStatus::Lead);

    let first = apply_booking(&mut c);
    assert_eq!(
        first,
        Transition::Advanced {
            from: ClientStatus::Lead,
            to: ClientStatus::Booked
        }
    );
    assert_eq!(c.status, ClientStatus::Booked);

    let second = apply_booking(&mut c);
    assert!(!second.is_advanced());
    assert_eq!(c.status, ClientStatus::Booked);
}

#[test]
fn completed_client_is_not_reopened_by_a_booking() {
    let mut c = client(ClientStatus::Completed);
    let before = c.clone();

    let t = apply_booking(&mut c);

    assert_eq!(t.status(), ClientStatus::Completed);
    assert_eq!(c, before);
}

#[test]
fn booking_touches_only_the_status_field() {
    let mut c = client(ClientStatus::Contacted);
    c.notes = Some("prefers WhatsApp in the afternoon".to_string());
    let before = c.clone();

    apply_booking(&mut c);

    assert_eq!(c.id, before.id);
    assert_eq!(c.created_at, before.created_at);
    assert_eq!(c.notes, before.notes);
    assert_eq!(c.status, ClientStatus::Booked);
}
