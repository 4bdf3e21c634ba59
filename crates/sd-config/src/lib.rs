//! sd-config
//!
//! Layered YAML configuration for the studio daemon and CLI.
//!
//! - Documents are merged in order (later overrides earlier) into one JSON
//!   value, then canonicalised and hashed (SHA-256, hex).
//! - Config stores env var NAMES only. A leaf string that looks like a real
//!   credential aborts the load with `CONFIG_SECRET_DETECTED`.
//! - [`AppConfig`] is the typed view the binaries consume. Every key has a
//!   default, so an empty document is a valid config.
//! - [`report_unused_keys`] lists leaves the typed view never reads.

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;

pub mod secrets;

pub use secrets::{resolve_secrets, ResolvedSecrets};

/// Prefixes that mark a string as a literal credential.
const SECRET_PREFIXES: &[&str] = &[
    "AIza",       // Google API key
    "sk-",        // OpenAI style
    "sk_live",    // Stripe live
    "sk_test",    // Stripe test
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
    "xoxb-",      // Slack bot token
];

pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
pub const DEFAULT_UPCOMING_DAYS: i64 = 7;
pub const DEFAULT_UPCOMING_LIMIT: usize = 3;
pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_AI_LANGUAGE: &str = "Portuguese";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Pointers read by [`AppConfig::from_json`]. Anything else is unused.
pub const CONSUMED_POINTERS: &[&str] = &[
    "/calendar/timezone",
    "/calendar/upcoming_days",
    "/calendar/upcoming_limit",
    "/ai/base_url",
    "/ai/model",
    "/ai/language",
    "/ai/api_key_env",
];

// ---------------------------------------------------------------------------
// Layered load + hash
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Typed view over the merged document.
    pub fn app_config(&self) -> Result<AppConfig> {
        AppConfig::from_json(&self.config_json)
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        // An empty document parses as null; treat it as "no overrides".
        if v_yaml.is_null() {
            continue;
        }
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

/// Serialise with object keys sorted at every level, so key order in the
/// source YAML does not affect the hash.
fn canonicalize_json(v: &Value) -> Result<String> {
    serde_json::to_string(&sorted(v)).context("canonical json serialize failed")
}

fn sorted(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for k in keys {
                if let Some(child) = map.get(k) {
                    out.insert(k.clone(), sorted(child));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        if let Some(s) = v.pointer(&ptr).and_then(Value::as_str) {
            if looks_like_secret(s) {
                bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
            }
        }
    }
    Ok(())
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, k.replace('~', "~0").replace('/', "~1"));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_pointers(vv, &format!("{prefix}/{i}"), out);
            }
        }
        _ => {
            if prefix.is_empty() {
                out.push("/".to_string());
            } else {
                out.push(prefix.to_string());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Unused keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    /// Sorted leaf pointers not covered by [`CONSUMED_POINTERS`].
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// "/a/b" covers "/a/b" and "/a/b/c" but not "/a/bc".
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    leaf == prefix
        || (leaf.starts_with(prefix) && leaf.as_bytes().get(prefix.len()) == Some(&b'/'))
}

/// Leaves of `config_json` that nothing reads. Typos such as
/// `calendar.timezon` show up here instead of being silently ignored.
pub fn report_unused_keys(config_json: &Value) -> UnusedKeyReport {
    let mut leaves = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unused: Vec<String> = leaves
        .into_iter()
        .filter(|lp| lp != "/")
        .filter(|lp| !CONSUMED_POINTERS.iter().any(|cp| is_prefix_pointer(cp, lp)))
        .collect();
    unused.sort();
    unused.dedup();

    UnusedKeyReport {
        unused_leaf_pointers: unused,
    }
}

// ---------------------------------------------------------------------------
// Typed view
// ---------------------------------------------------------------------------

/// Calendar settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSettings {
    /// Zone in which "local calendar date" is computed.
    pub timezone: Tz,
    /// Width of the upcoming window, in whole days.
    pub upcoming_days: i64,
    /// Cap on the dashboard's upcoming list.
    pub upcoming_limit: usize,
}

/// Generative API settings. `api_key_env` is the NAME of the env var holding
/// the key, never the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSettings {
    pub base_url: String,
    pub model: String,
    /// Language the email drafts are written in.
    pub language: String,
    pub api_key_env: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub calendar: CalendarSettings,
    pub ai: AiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            calendar: CalendarSettings {
                timezone: chrono_tz::America::Sao_Paulo,
                upcoming_days: DEFAULT_UPCOMING_DAYS,
                upcoming_limit: DEFAULT_UPCOMING_LIMIT,
            },
            ai: AiSettings {
                base_url: DEFAULT_AI_BASE_URL.to_string(),
                model: DEFAULT_AI_MODEL.to_string(),
                language: DEFAULT_AI_LANGUAGE.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            },
        }
    }
}

fn read_str(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn read_u64(config: &Value, pointer: &str) -> Result<Option<u64>> {
    match config.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .with_context(|| format!("CONFIG_INVALID {pointer}: expected a non-negative integer")),
    }
}

impl AppConfig {
    /// Read the typed view, falling back to defaults for absent keys.
    pub fn from_json(config: &Value) -> Result<Self> {
        let d = Self::default();

        let timezone = match read_str(config, "/calendar/timezone") {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("CONFIG_INVALID /calendar/timezone '{name}': {e}"))?,
            None => d.calendar.timezone,
        };

        let upcoming_days = match read_u64(config, "/calendar/upcoming_days")? {
            Some(n) => i64::try_from(n).context("CONFIG_INVALID /calendar/upcoming_days")?,
            None => d.calendar.upcoming_days,
        };
        let upcoming_limit = match read_u64(config, "/calendar/upcoming_limit")? {
            Some(n) => usize::try_from(n).context("CONFIG_INVALID /calendar/upcoming_limit")?,
            None => d.calendar.upcoming_limit,
        };

        Ok(Self {
            calendar: CalendarSettings {
                timezone,
                upcoming_days,
                upcoming_limit,
            },
            ai: AiSettings {
                base_url: read_str(config, "/ai/base_url").unwrap_or(d.ai.base_url),
                model: read_str(config, "/ai/model").unwrap_or(d.ai.model),
                language: read_str(config, "/ai/language").unwrap_or(d.ai.language),
                api_key_env: read_str(config, "/ai/api_key_env").unwrap_or(d.ai.api_key_env),
            },
        })
    }
}
