//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub feedback: FeedbackConfig,

    #[serde(default)]
    pub flash_messages: FlashMessagesConfig,

    /// Route name to URI, handed to components as `routes`.
    #[serde(default)]
    pub routes: HashMap<String, String>,

    /// Free-form table handed to components as `configuration`.
    #[serde(default)]
    pub frontend: HashMap<String, serde_json::Value>,
}

impl Config {
    /// The whole configuration as JSON, for manifest settings lookups.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn routes_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.routes
                .iter()
                .map(|(name, uri)| (name.clone(), serde_json::Value::String(uri.clone())))
                .collect(),
        )
    }

    pub fn frontend_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.frontend
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files. Console only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default log directory, `~/.edithost/logs`.
/// Registry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Let later manifests replace entries of leaf registries.
    #[serde(default)]
    pub allow_overwrite: bool,
}

/// Server feedback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// Let a later registration replace the handler for a feedback type.
    #[serde(default = "default_true")]
    pub allow_overwrite: bool,

    /// Log unknown feedback types at warn level instead of debug.
    #[serde(default = "default_true")]
    pub warn_unknown: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            allow_overwrite: true,
            warn_unknown: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Flash message configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashMessagesConfig {
    /// Auto-dismiss timeout for success messages. Other severities stay.
    #[serde(default = "default_success_timeout")]
    pub success_timeout_ms: u64,
}

impl Default for FlashMessagesConfig {
    fn default() -> Self {
        Self {
            success_timeout_ms: default_success_timeout(),
        }
    }
}

fn default_success_timeout() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
        assert!(!config.registry.allow_overwrite);
        assert!(config.feedback.allow_overwrite);
        assert!(config.feedback.warn_unknown);
        assert_eq!(config.flash_messages.success_timeout_ms, 5000);
    }

    #[test]
    fn test_to_json_exposes_sections() {
        let config = Config::default();
        let value = config.to_json();
        assert_eq!(value["flash_messages"]["success_timeout_ms"], json!(5000));
        assert_eq!(value["feedback"]["warn_unknown"], json!(true));
        assert!(value["logging"].get("file").is_none());
    }

    #[test]
    fn test_routes_and_frontend_json() {
        let mut config = Config::default();
        config
            .routes
            .insert("ui.service.change".to_string(), "/neos/ui-services/change".to_string());
        config.frontend.insert("autoFocus".to_string(), json!(true));

        assert_eq!(
            config.routes_json(),
            json!({"ui.service.change": "/neos/ui-services/change"})
        );
        assert_eq!(config.frontend_json(), json!({"autoFocus": true}));
    }
}
