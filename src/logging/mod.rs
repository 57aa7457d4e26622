//! Structured logging via `tracing`.
//!
//! - Level-based filtering per module (`RUST_LOG` overrides the config)
//! - Spans for timing a fight or a batch of ticks
//! - Idempotent initialization, so tests and hosts may call it freely

use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

    /// Parse a level name, case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_thread_ids: bool,
    pub show_targets: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("boss_core::boss".to_string(), LogLevel::Debug),
                ("boss_core::combat".to_string(), LogLevel::Debug),
                ("boss_core::plugin".to_string(), LogLevel::Info),
            ],
            show_thread_ids: false,
            show_targets: true,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    /// Verbose preset for debugging a single fight
    pub fn verbose() -> Self {
        Self {
            default_level: LogLevel::Debug,
            module_filters: vec![("boss_core::boss".to_string(), LogLevel::Trace)],
            ..Default::default()
        }
    }

    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Install the global subscriber. First call wins.
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let config = config.clone();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(config.show_targets)
            .with_thread_ids(config.show_thread_ids)
            .with_file(config.show_file_line)
            .with_line_number(config.show_file_line)
            .compact();

        // A host (e.g. Bevy's LogPlugin) may already own the global subscriber
        let _ = subscriber.try_init();
    });
}

/// Guard that keeps a named span entered until dropped
pub struct TimingSpan {
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(name: &str) -> Self {
        let span = tracing::info_span!("operation", name = name);
        Self {
            _span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn test_env_filter_string() {
        let filter = TracingConfig::default().to_env_filter_string();
        assert!(filter.starts_with("info"));
        assert!(filter.contains("boss_core::boss=debug"));
        assert!(filter.contains("boss_core::combat=debug"));
    }

    #[test]
    fn test_verbose_preset() {
        let filter = TracingConfig::verbose().to_env_filter_string();
        assert!(filter.starts_with("debug"));
        assert!(filter.contains("boss_core::boss=trace"));
    }

    #[test]
    fn test_tracing_config_json_roundtrip() {
        let config = TracingConfig::default();
        let restored = TracingConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(restored.default_level, config.default_level);
        assert_eq!(restored.module_filters, config.module_filters);
        assert!(TracingConfig::from_json("not json").is_none());
    }

    #[test]
    fn test_init_tracing_idempotent() {
        init_tracing_default();
        init_tracing_default();
        init_tracing(&TracingConfig::verbose());
    }

    #[test]
    fn test_timing_span() {
        init_tracing_default();
        let _span = TimingSpan::new("fight");
        tracing::info!("inside span");
    }
}
