//! Structured logging via `tracing`.
//!
//! Filters come from `RUST_LOG` when set, otherwise from a `TracingConfig`
//! (serializable so a host can pass it through the bridge or a config file).
//! Initialization is idempotent: the first call wins.

use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_thread_ids: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                // Retarget chatter is per-frame; keep it out of the default output
                ("plaza_core::engine".to_string(), LogLevel::Info),
                ("plaza_core::agent".to_string(), LogLevel::Info),
                ("plaza_core::bridge".to_string(), LogLevel::Warn),
            ],
            show_targets: true,
            show_thread_ids: false,
        }
    }
}

impl TracingConfig {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Install a global fmt subscriber. Later calls and foreign subscribers
/// (e.g. Bevy's LogPlugin) are left alone.
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let show_targets = config.show_targets;
    let show_thread_ids = config.show_thread_ids;
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(show_targets)
            .with_thread_ids(show_thread_ids)
            .compact()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_string() {
        let filter = TracingConfig::default().to_env_filter_string();
        assert!(filter.starts_with("info"));
        assert!(filter.contains("plaza_core::bridge=warn"));
        assert!(filter.contains("plaza_core::engine=info"));
    }

    #[test]
    fn test_custom_filter() {
        let config = TracingConfig {
            default_level: LogLevel::Warn,
            module_filters: vec![("plaza_core::agent".into(), LogLevel::Trace)],
            ..Default::default()
        };
        assert_eq!(config.to_env_filter_string(), "warn,plaza_core::agent=trace");
    }

    #[test]
    fn test_config_from_json() {
        let config = TracingConfig::from_json(r#"{"default_level": "debug"}"#).unwrap();
        assert_eq!(config.default_level, LogLevel::Debug);
        assert!(config.show_targets);
        assert!(TracingConfig::from_json("nope").is_none());
    }

    #[test]
    fn test_init_tracing_idempotent() {
        init_tracing_default();
        init_tracing_default();
        init_tracing(&TracingConfig::default());
        tracing::info!(target: "plaza_core", "logging initialized twice without panicking");
    }
}
