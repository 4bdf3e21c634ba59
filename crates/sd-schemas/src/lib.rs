//! sd-schemas
//!
//! Shared data model for the studio CRM: clients, appointments, transactions
//! and the creative-concept payload returned by the AI assistant.
//!
//! Plain data only. No validation, no IO, no clock. Money crosses crate
//! boundaries as raw integer cents; `sd-finance` owns the typed wrapper.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ClientId = Uuid;
pub type AppointmentId = Uuid;
pub type TransactionId = Uuid;

// ---------------------------------------------------------------------------
// ClientStatus
// ---------------------------------------------------------------------------

/// Sales-pipeline stage of a client.
///
/// Declaration order is the funnel order, so `Lead < Contacted < Booked <
/// Completed` under the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Lead,
    Contacted,
    Booked,
    Completed,
}

impl ClientStatus {
    /// Every stage, in funnel order.
    pub const ALL: [ClientStatus; 4] = [
        ClientStatus::Lead,
        ClientStatus::Contacted,
        ClientStatus::Booked,
        ClientStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Lead => "lead",
            ClientStatus::Contacted => "contacted",
            ClientStatus::Booked => "booked",
            ClientStatus::Completed => "completed",
        }
    }

    /// Human-facing label.
    pub fn label(&self) -> &'static str {
        match self {
            ClientStatus::Lead => "Lead",
            ClientStatus::Contacted => "Contacted",
            ClientStatus::Booked => "Booked",
            ClientStatus::Completed => "Completed",
        }
    }

    /// Case-insensitive parse of the stage name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lead" => Some(ClientStatus::Lead),
            "contacted" => Some(ClientStatus::Contacted),
            "booked" => Some(ClientStatus::Booked),
            "completed" => Some(ClientStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: ClientStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields a caller supplies when registering a new client. The store assigns
/// `id`, `status` and `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Appointment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentKind {
    PortraitSession,
    Wedding,
    Event,
    Corporate,
}

impl AppointmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentKind::PortraitSession => "Portrait session",
            AppointmentKind::Wedding => "Wedding",
            AppointmentKind::Event => "Event",
            AppointmentKind::Corporate => "Corporate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    /// Non-owning reference. May dangle after the client is removed.
    pub client_id: ClientId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub kind: AppointmentKind,
    /// Reserved. Nothing in the workspace sets this after creation.
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub client_id: ClientId,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    pub kind: AppointmentKind,
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    /// Positive amount in cents (1/100 of the currency unit).
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub description: String,
    pub amount_cents: i64,
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: String,
}

// ---------------------------------------------------------------------------
// AI payloads
// ---------------------------------------------------------------------------

/// Photoshoot concept produced by the creative assistant.
///
/// Field names on the wire are camelCase because the model is constrained to
/// that schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptResult {
    pub title: String,
    pub mood: String,
    pub lighting: String,
    /// 3-4 outfit ideas.
    pub outfit_suggestions: Vec<String>,
    /// 3-4 posing prompts.
    pub pose_ideas: Vec<String>,
}
