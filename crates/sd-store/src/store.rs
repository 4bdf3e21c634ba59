//! In-memory entity store.
//!
//! # Contract
//! - One explicit `Store` instance per session, owned by the UI layer
//!   (daemon state or CLI). Never global.
//! - All mutations are synchronous and total. An update or remove whose id
//!   matches nothing is a silent no-op; the `bool` return only says whether
//!   something matched.
//! - Input validation (non-empty name, title, ...) is the caller's job.
//! - `client_id` on an appointment is lookup-only. Removing a client does
//!   not cascade; its appointments stay and become dangling
//!   (see [`Store::dangling_appointments`]).

use chrono::{DateTime, Utc};
use sd_finance::{summarize, Cents};
use sd_pipeline::{apply_booking, Transition};
use sd_schemas::{
    Appointment, Client, ClientId, ClientStatus, NewAppointment, NewClient, NewTransaction,
    Transaction,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened when an appointment was booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOutcome {
    pub appointment: Appointment,
    /// `None` when the referenced client does not exist.
    pub transition: Option<Transition>,
}

impl BookingOutcome {
    /// `(from, to)` when the client's pipeline status moved.
    pub fn status_change(&self) -> Option<(ClientStatus, ClientStatus)> {
        match self.transition {
            Some(Transition::Advanced { from, to }) => Some((from, to)),
            _ => None,
        }
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Sum of all income transactions.
    pub total_revenue: Cents,
    pub client_count: usize,
    /// Appointments dated at or after `now`.
    pub upcoming_shoots: usize,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Store {
    clients: Vec<Client>,
    appointments: Vec<Appointment>,
    transactions: Vec<Transaction>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing collections, as-is. No booking side
    /// effects are applied.
    pub fn from_parts(
        clients: Vec<Client>,
        appointments: Vec<Appointment>,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            clients,
            appointments,
            transactions,
        }
    }

    // -----------------------------------------------------------------------
    // Clients
    // -----------------------------------------------------------------------

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Append a fully formed client.
    pub fn add_client(&mut self, client: Client) {
        debug!(client_id = %client.id, "store/add_client");
        self.clients.push(client);
    }

    /// Register a new client as a `Lead`, stamping `id` and `created_at`.
    pub fn create_client(&mut self, draft: NewClient, now: DateTime<Utc>) -> Client {
        let client = Client {
            id: Uuid::new_v4(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            status: ClientStatus::Lead,
            notes: draft.notes,
            created_at: now,
        };
        self.add_client(client.clone());
        client
    }

    /// Replace the client with the same id.
    ///
    /// Any status is accepted (manual pipeline edits are unrestricted).
    /// `created_at` is kept from the stored record.
    pub fn update_client(&mut self, updated: Client) -> bool {
        match self.clients.iter_mut().find(|c| c.id == updated.id) {
            Some(slot) => {
                let created_at = slot.created_at;
                *slot = Client {
                    created_at,
                    ..updated
                };
                debug!(client_id = %slot.id, status = %slot.status, "store/update_client");
                true
            }
            None => {
                debug!(client_id = %updated.id, "store/update_client: no match");
                false
            }
        }
    }

    /// Remove a client. Appointments referencing it are left in place.
    pub fn remove_client(&mut self, id: ClientId) -> bool {
        let before = self.clients.len();
        self.clients.retain(|c| c.id != id);
        let removed = self.clients.len() != before;
        debug!(client_id = %id, removed, "store/remove_client");
        removed
    }

    /// Case-insensitive substring search over name and email, AND-ed with an
    /// optional exact status filter. An empty term matches everyone.
    pub fn search_clients(&self, term: &str, status: Option<ClientStatus>) -> Vec<&Client> {
        let needle = term.trim().to_lowercase();
        self.clients
            .iter()
            .filter(|c| {
                needle.is_empty()
                    || c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
            })
            .filter(|c| status.map_or(true, |s| c.status == s))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Appointments
    // -----------------------------------------------------------------------

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn appointments_for_client(&self, id: ClientId) -> Vec<&Appointment> {
        self.appointments.iter().filter(|a| a.client_id == id).collect()
    }

    /// Appointments whose client no longer exists.
    ///
    /// Removing a client does not cascade, so these are expected after a
    /// delete. They remain visible on the calendar.
    pub fn dangling_appointments(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| self.client(a.client_id).is_none())
            .collect()
    }

    /// Append an appointment and apply the booking transition to its client.
    pub fn add_appointment(&mut self, appointment: Appointment) -> BookingOutcome {
        let transition = self
            .clients
            .iter_mut()
            .find(|c| c.id == appointment.client_id)
            .map(apply_booking);

        match transition {
            Some(Transition::Advanced { from, to }) => {
                info!(
                    client_id = %appointment.client_id,
                    %from,
                    %to,
                    "pipeline advanced on booking"
                );
            }
            None => {
                debug!(client_id = %appointment.client_id, "booking references unknown client");
            }
            Some(Transition::Unchanged { .. }) => {}
        }

        debug!(appointment_id = %appointment.id, "store/add_appointment");
        self.appointments.push(appointment.clone());
        BookingOutcome {
            appointment,
            transition,
        }
    }

    /// Create an appointment from a draft (new id, `completed = false`) and
    /// book it.
    pub fn book_appointment(&mut self, draft: NewAppointment) -> BookingOutcome {
        self.add_appointment(Appointment {
            id: Uuid::new_v4(),
            client_id: draft.client_id,
            title: draft.title,
            date: draft.date,
            location: draft.location,
            kind: draft.kind,
            completed: false,
        })
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        debug!(
            transaction_id = %transaction.id,
            kind = transaction.kind.as_str(),
            "store/add_transaction"
        );
        self.transactions.push(transaction);
    }

    pub fn record_transaction(&mut self, draft: NewTransaction) -> Transaction {
        let t = Transaction {
            id: Uuid::new_v4(),
            description: draft.description,
            amount_cents: draft.amount_cents,
            date: draft.date,
            kind: draft.kind,
            category: draft.category,
        };
        self.add_transaction(t.clone());
        t
    }

    // -----------------------------------------------------------------------
    // Dashboard
    // -----------------------------------------------------------------------

    pub fn dashboard(&self, now: DateTime<Utc>) -> DashboardStats {
        DashboardStats {
            total_revenue: summarize(&self.transactions).total_income,
            client_count: self.clients.len(),
            upcoming_shoots: self.appointments.iter().filter(|a| a.date >= now).count(),
        }
    }
}
