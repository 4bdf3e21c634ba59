//! Request and response types for sd-daemon HTTP endpoints.
//!
//! `Serialize + Deserialize` so Axum can encode them and tests can decode
//! them. No business logic lives here.

use chrono::{DateTime, NaiveDate, Utc};
use sd_calendar::Direction;
use sd_schemas::{Appointment, ClientStatus, ConceptResult, TransactionKind};
use sd_store::DashboardStats;
use serde::{Deserialize, Serialize};

// Create bodies are the store drafts as-is.
pub use sd_schemas::{NewAppointment as CreateAppointmentRequest, NewClient as CreateClientRequest};

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
    pub ai_configured: bool,
    pub config_hash: Option<String>,
}

/// Body of every 4xx/5xx this daemon produces itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    /// Next shoots within the configured window, capped by the configured
    /// limit.
    pub upcoming: Vec<Appointment>,
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientQuery {
    pub q: Option<String>,
    pub status: Option<String>,
}

/// Full replacement of a client's editable fields. `id` comes from the path
/// and `created_at` from the stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: ClientStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub appointment: Appointment,
    /// Present when the booking moved the client forward in the pipeline.
    pub status_change: Option<StatusChange>,
    /// `false` when `client_id` matched no client.
    pub client_found: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: ClientStatus,
    pub to: ClientStatus,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub kind: Option<String>,
}

/// `amount` is a positive decimal string with at most two fractional digits,
/// e.g. `"1250.50"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub description: String,
    pub amount: String,
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
    /// Defaults to the time of the request.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarQuery {
    /// Reference date, `YYYY-MM-DD`. Defaults to today in the configured zone.
    pub date: Option<NaiveDate>,
    /// Step the reference one period before rendering.
    pub nav: Option<Direction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptResponse {
    pub ai_configured: bool,
    /// `None` when the assistant is not configured or returned nothing.
    pub concept: Option<ConceptResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailResponse {
    pub email: String,
}

