//! Runtime secret resolution.
//!
//! # Contract
//! - Config stores the env var NAME (`ai.api_key_env`), never the key.
//! - Binaries call [`resolve_secrets`] once at startup and hand the result to
//!   constructors. No other crate reads `std::env` for credentials.
//! - `Debug` on [`ResolvedSecrets`] redacts values.
//! - A missing key is not an error here: the assistant falls back to its
//!   "not configured" behaviour instead.

use crate::AppConfig;

#[derive(Clone)]
pub struct ResolvedSecrets {
    /// Env var the key was looked up under.
    pub ai_api_key_var: String,
    /// `None` if the named env var was absent or blank.
    pub ai_api_key: Option<String>,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("ai_api_key_var", &self.ai_api_key_var)
            .field("ai_api_key", &self.ai_api_key.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl ResolvedSecrets {
    pub fn has_ai_key(&self) -> bool {
        self.ai_api_key.is_some()
    }
}

fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Look up every secret named by `config` in the process environment.
pub fn resolve_secrets(config: &AppConfig) -> ResolvedSecrets {
    let var = config.ai.api_key_env.clone();
    ResolvedSecrets {
        ai_api_key: resolve_env(&var),
        ai_api_key_var: var,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_the_key() {
        let s = ResolvedSecrets {
            ai_api_key_var: "SD_TEST_KEY".to_string(),
            ai_api_key: Some("super-secret-value".to_string()),
        };
        let dbg = format!("{s:?}");
        assert!(dbg.contains("<REDACTED>"));
        assert!(dbg.contains("SD_TEST_KEY"));
        assert!(!dbg.contains("super-secret-value"));
    }
}
