//! sd-pipeline
//!
//! Client sales-pipeline state machine.
//!
//! # Invariants
//!
//! - **Manual edits are unrestricted**: a caller may set any
//!   [`ClientStatus`] through a store update. No transition table is enforced
//!   for operator edits.
//! - **Booking is the only automatic transition**: creating an appointment
//!   for a client in `Lead` or `Contacted` moves it to `Booked`.
//! - **Booking is idempotent**: the guard is `status ∈ {Lead, Contacted}`, so
//!   applying it to `Booked` or `Completed` changes nothing.
//! - Nothing moves a client to `Completed` automatically.
//!
//! Pure deterministic logic. No IO, no clock.

use sd_schemas::{Client, ClientStatus};

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Result of applying a pipeline event to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The status moved forward.
    Advanced { from: ClientStatus, to: ClientStatus },
    /// The guard did not match; status is unchanged.
    Unchanged { status: ClientStatus },
}

impl Transition {
    /// Status after the transition.
    pub fn status(&self) -> ClientStatus {
        match self {
            Transition::Advanced { to, .. } => *to,
            Transition::Unchanged { status } => *status,
        }
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, Transition::Advanced { .. })
    }
}

// ---------------------------------------------------------------------------
// Booking transition
// ---------------------------------------------------------------------------

/// `true` if booking an appointment moves a client in `status` to `Booked`.
pub fn is_bookable(status: ClientStatus) -> bool {
    matches!(status, ClientStatus::Lead | ClientStatus::Contacted)
}

/// Guarded transition for "an appointment was created for this client".
///
/// | From        | Result                          |
/// |-------------|---------------------------------|
/// | `Lead`      | `Advanced { Lead -> Booked }`   |
/// | `Contacted` | `Advanced { Contacted -> Booked }` |
/// | `Booked`    | `Unchanged`                     |
/// | `Completed` | `Unchanged`                     |
pub fn on_appointment_booked(status: ClientStatus) -> Transition {
    if is_bookable(status) {
        Transition::Advanced {
            from: status,
            to: ClientStatus::Booked,
        }
    } else {
        Transition::Unchanged { status }
    }
}

/// Apply the booking transition to a client record in place.
pub fn apply_booking(client: &mut Client) -> Transition {
    let t = on_appointment_booked(client.status);
    client.status = t.status();
    t
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
