//! Environment-driven configuration

use crate::catalog::CatalogOrder;
use crate::session::ThinkingDelay;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SOURCE: &str = "schemes.json";
const DEFAULT_TYPING_MIN_MS: u64 = 800;
const DEFAULT_TYPING_MAX_MS: u64 = 1300;
const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;
const DEFAULT_SESSION_SWEEP_SECS: u64 = 60;

/// Settings for the chat service
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub port: u16,
    /// File path or http(s) URL of the scheme knowledge base
    pub schemes_source: String,
    pub typing_min: Duration,
    pub typing_max: Duration,
    pub catalog_order: CatalogOrder,
    /// Sessions untouched for this long are closed
    pub session_idle: Duration,
    /// How often idle sessions are swept
    pub session_sweep: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            schemes_source: DEFAULT_SOURCE.to_string(),
            typing_min: Duration::from_millis(DEFAULT_TYPING_MIN_MS),
            typing_max: Duration::from_millis(DEFAULT_TYPING_MAX_MS),
            catalog_order: CatalogOrder::Source,
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            session_sweep: Duration::from_secs(DEFAULT_SESSION_SWEEP_SECS),
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unparseable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };
        let millis = |key: &str, default: u64| Duration::from_millis(number(key, default));
        // Zero falls back to the default
        let secs = |key: &str, default: u64| match number(key, default) {
            0 => Duration::from_secs(default),
            n => Duration::from_secs(n),
        };

        Self {
            port: lookup("SEVA_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            schemes_source: lookup("SEVA_SCHEMES_SOURCE")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.schemes_source),
            typing_min: millis("SEVA_TYPING_MIN_MS", DEFAULT_TYPING_MIN_MS),
            typing_max: millis("SEVA_TYPING_MAX_MS", DEFAULT_TYPING_MAX_MS),
            catalog_order: lookup("SEVA_CATALOG_ORDER")
                .and_then(|v| CatalogOrder::parse(&v))
                .unwrap_or(defaults.catalog_order),
            session_idle: secs("SEVA_SESSION_IDLE_SECS", DEFAULT_SESSION_IDLE_SECS),
            session_sweep: secs("SEVA_SESSION_SWEEP_SECS", DEFAULT_SESSION_SWEEP_SECS),
        }
    }

    pub fn thinking_delay(&self) -> ThinkingDelay {
        ThinkingDelay::between(self.typing_min, self.typing_max)
    }
}
