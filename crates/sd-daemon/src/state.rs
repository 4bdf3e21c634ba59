//! Shared runtime state for sd-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The store is the one
//! explicit session instance; it lives behind a tokio `RwLock` and is never
//! held across an assistant call.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sd_ai::Assistant;
use sd_calendar::Calendar;
use sd_config::{AppConfig, CalendarSettings};
use sd_store::Store;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// BusMsg: SSE event bus payload
// ---------------------------------------------------------------------------

/// Messages broadcast over the internal event bus and surfaced as SSE events.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusMsg {
    Heartbeat {
        ts_millis: i64,
    },
    /// Something in the store was created, updated or removed.
    StoreChanged {
        entity: String,
        action: String,
        id: Uuid,
    },
    LogLine {
        level: String,
        msg: String,
    },
}

impl BusMsg {
    pub fn store_changed(entity: &str, action: &str, id: Uuid) -> Self {
        BusMsg::StoreChanged {
            entity: entity.to_string(),
            action: action.to_string(),
            id,
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            BusMsg::Heartbeat { .. } => "heartbeat",
            BusMsg::StoreChanged { .. } => "store_changed",
            BusMsg::LogLine { .. } => "log",
        }
    }
}

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    /// Broadcast bus for SSE.
    pub bus: broadcast::Sender<BusMsg>,
    pub build: BuildInfo,
    pub store: Arc<RwLock<Store>>,
    pub calendar: Calendar,
    pub calendar_settings: CalendarSettings,
    pub assistant: Assistant,
    /// Hash of the loaded config, `None` when running on defaults.
    pub config_hash: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Fixture-seeded store, default config, no assistant credential.
    pub fn new() -> Self {
        Self::from_parts(
            Store::seeded(Utc::now()),
            &AppConfig::default(),
            Assistant::unconfigured(),
            None,
        )
    }

    pub fn from_parts(
        store: Store,
        config: &AppConfig,
        assistant: Assistant,
        config_hash: Option<String>,
    ) -> Self {
        let (bus, _rx) = broadcast::channel::<BusMsg>(1024);

        Self {
            bus,
            build: BuildInfo {
                service: "sd-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            store: Arc::new(RwLock::new(store)),
            calendar: Calendar::new(config.calendar.timezone),
            calendar_settings: config.calendar.clone(),
            assistant,
            config_hash,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Fire-and-forget publish. No subscribers is not an error.
    pub fn publish(&self, msg: BusMsg) {
        let _ = self.bus.send(msg);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawn a background task that emits a heartbeat SSE every `interval`.
pub fn spawn_heartbeat(bus: broadcast::Sender<BusMsg>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let ts = Utc::now().timestamp_millis();
            let _ = bus.send(BusMsg::Heartbeat { ts_millis: ts });
        }
    });
}
