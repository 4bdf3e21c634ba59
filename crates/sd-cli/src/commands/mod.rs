//! Command handlers for the shootdesk CLI.
//!
//! Shared session setup lives here; each view has its own submodule.

pub mod assistant;
pub mod calendar;
pub mod finance;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sd_ai::{Assistant, GeminiSettings};
use sd_calendar::Calendar;
use sd_config::{load_layered_yaml, report_unused_keys, resolve_secrets, AppConfig};
use sd_store::Store;
use tracing::warn;

/// Everything one invocation works against: config, the fixture store, the
/// calendar bound to the configured zone, and the assistant.
pub struct Session {
    pub config: AppConfig,
    pub store: Store,
    pub calendar: Calendar,
    pub assistant: Assistant,
    pub now: DateTime<Utc>,
}

impl Session {
    pub fn load(config_paths: &[String], store: Store, now: DateTime<Utc>) -> Result<Self> {
        let config = load_config(config_paths)?;
        let secrets = resolve_secrets(&config);
        let assistant = Assistant::gemini(
            secrets.ai_api_key,
            GeminiSettings {
                base_url: config.ai.base_url.clone(),
                model: config.ai.model.clone(),
                language: config.ai.language.clone(),
            },
        );

        Ok(Self {
            calendar: Calendar::new(config.calendar.timezone),
            config,
            store,
            assistant,
            now,
        })
    }
}

fn load_config(paths: &[String]) -> Result<AppConfig> {
    if paths.is_empty() {
        return Ok(AppConfig::default());
    }
    let refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = load_layered_yaml(&refs).context("load --config layers")?;

    let report = report_unused_keys(&loaded.config_json);
    if !report.is_clean() {
        warn!(unused = ?report.unused_leaf_pointers, "config has keys nothing reads");
    }
    loaded.app_config()
}

/// Pretty JSON to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("serialize output")?
    );
    Ok(())
}
