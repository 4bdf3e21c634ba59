//! Demo data loaded at session start.
//!
//! Records are inserted as-is: seeded appointments do not run the booking
//! transition, so each client keeps the stage listed here.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sd_finance::Cents;
use sd_schemas::{
    Appointment, AppointmentKind, Client, ClientStatus, Transaction, TransactionKind,
};
use uuid::Uuid;

use crate::store::Store;

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

fn client(
    name: &str,
    email: &str,
    phone: &str,
    status: ClientStatus,
    notes: Option<&str>,
    created: DateTime<Utc>,
) -> Client {
    Client {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        status,
        notes: notes.map(str::to_string),
        created_at: created,
    }
}

fn transaction(
    description: &str,
    units: i64,
    date: DateTime<Utc>,
    kind: TransactionKind,
    category: &str,
) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        description: description.to_string(),
        amount_cents: Cents::units(units).raw(),
        date,
        kind,
        category: category.to_string(),
    }
}

fn appointment(
    client_id: Uuid,
    title: &str,
    date: DateTime<Utc>,
    location: &str,
    kind: AppointmentKind,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        client_id,
        title: title.to_string(),
        date,
        location: location.to_string(),
        kind,
        completed: false,
    }
}

impl Store {
    /// Store pre-populated with four clients, five transactions and three
    /// appointments. The first appointment is dated `now`.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let juliana = client(
            "Juliana Paes",
            "ju.paes@example.com",
            "(11) 99999-1234",
            ClientStatus::Booked,
            Some("Prefers WhatsApp contact in the afternoon."),
            utc(2023, 10, 15, 0, 0),
        );
        let carlos = client(
            "Carlos Andrade",
            "carlos.a@example.com",
            "(21) 98888-5678",
            ClientStatus::Lead,
            None,
            utc(2023, 11, 2, 0, 0),
        );
        let mariana = client(
            "Mariana Ximenes",
            "mari.x@example.com",
            "(11) 97777-4321",
            ClientStatus::Completed,
            Some("VIP client. Sent positive feedback about the album."),
            utc(2023, 9, 10, 0, 0),
        );
        let roberto = client(
            "Roberto Firmino",
            "boby@example.com",
            "(41) 99999-9999",
            ClientStatus::Contacted,
            None,
            utc(2023, 11, 5, 0, 0),
        );

        use AppointmentKind::{Corporate, PortraitSession, Wedding};
        use TransactionKind::{Expense, Income};

        let transactions = vec![
            transaction(
                "Juliana wedding shoot",
                3500,
                utc(2023, 10, 20, 0, 0),
                Income,
                "Services",
            ),
            transaction("85mm lens", 4200, utc(2023, 10, 25, 0, 0), Expense, "Equipment"),
            transaction(
                "Maternity shoot deposit",
                500,
                utc(2023, 11, 1, 0, 0),
                Income,
                "Services",
            ),
            transaction(
                "Editing software subscription",
                120,
                utc(2023, 11, 5, 0, 0),
                Expense,
                "Software",
            ),
            transaction(
                "Mariana printed album",
                800,
                utc(2023, 11, 10, 0, 0),
                Income,
                "Products",
            ),
        ];

        let appointments = vec![
            appointment(
                juliana.id,
                "Juliana & Pedro wedding",
                now,
                "Sítio São Jorge",
                Wedding,
            ),
            appointment(
                mariana.id,
                "Album delivery",
                utc(2023, 11, 15, 14, 0),
                "Studio",
                PortraitSession,
            ),
            appointment(
                roberto.id,
                "Pre-event meeting",
                utc(2023, 11, 18, 10, 0),
                "Video call",
                Corporate,
            ),
        ];

        Store::from_parts(vec![juliana, carlos, mariana, roberto], appointments, transactions)
    }
}
