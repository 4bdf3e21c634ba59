//! sd-store
//!
//! Explicit in-memory store for clients, appointments and transactions, plus
//! the demo fixtures a session starts from.
//!
//! Single-threaded and single-session. Callers that share it across tasks
//! wrap it in a lock; the store itself has no interior mutability.

mod fixtures;
mod store;

pub use store::{BookingOutcome, DashboardStats, Store};
