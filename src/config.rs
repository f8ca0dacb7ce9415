//! Process configuration
//!
//! Every setting has a default; environment variables override them.
//!
//! | Variable                      | Setting                              |
//! |-------------------------------|--------------------------------------|
//! | `TREKKER_DIAGNOSTICS_ROOT`    | diagnostics root directory           |
//! | `TREKKER_SCREENSHOT_DELAY`    | screenshot delay, e.g. `800ms`       |
//! | `TREKKER_DIAGNOSTICS_ENABLED` | `true` / `false`                     |
//! | `TREKKER_LOG_FORMAT`          | `json` / `pretty`                    |
//! | `TREKKER_METRICS_NAMESPACE`   | Prometheus metric prefix             |
//! | `TREKKER_OBSERVATIONS_PATH`   | JSON Lines observation file          |

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;
use trekker_actions::DiagnosticsConfig;
use trekker_observability::{LogFormat, ObservabilityConfig};

pub const ENV_DIAGNOSTICS_ROOT: &str = "TREKKER_DIAGNOSTICS_ROOT";
pub const ENV_SCREENSHOT_DELAY: &str = "TREKKER_SCREENSHOT_DELAY";
pub const ENV_DIAGNOSTICS_ENABLED: &str = "TREKKER_DIAGNOSTICS_ENABLED";
pub const ENV_LOG_FORMAT: &str = "TREKKER_LOG_FORMAT";
pub const ENV_METRICS_NAMESPACE: &str = "TREKKER_METRICS_NAMESPACE";
pub const ENV_OBSERVATIONS_PATH: &str = "TREKKER_OBSERVATIONS_PATH";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        variable: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(variable: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::InvalidValue {
            variable,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Configuration of a Trekker process
#[derive(Debug, Clone, Default)]
pub struct TrekkerConfig {
    pub diagnostics: DiagnosticsConfig,
    pub observability: ObservabilityConfig,
}

impl TrekkerConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(root) = var(ENV_DIAGNOSTICS_ROOT) {
            config.diagnostics.root = PathBuf::from(root);
        }
        if let Some(delay) = var(ENV_SCREENSHOT_DELAY) {
            config.diagnostics.screenshot_delay = humantime::parse_duration(delay.trim())
                .map_err(|e| ConfigError::invalid(ENV_SCREENSHOT_DELAY, &delay, e))?;
        }
        if let Some(enabled) = var(ENV_DIAGNOSTICS_ENABLED) {
            config.diagnostics.enabled = parse_flag(&enabled).ok_or_else(|| {
                ConfigError::invalid(ENV_DIAGNOSTICS_ENABLED, &enabled, "expected true or false")
            })?;
        }
        if let Some(format) = var(ENV_LOG_FORMAT) {
            config.observability.log_format = format
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid(ENV_LOG_FORMAT, &format, e))?;
        }
        if let Some(namespace) = var(ENV_METRICS_NAMESPACE) {
            if !namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(ConfigError::invalid(
                    ENV_METRICS_NAMESPACE,
                    &namespace,
                    "only ASCII letters, digits and '_' are allowed",
                ));
            }
            config.observability.namespace = namespace;
        }
        if let Some(path) = var(ENV_OBSERVATIONS_PATH) {
            config.observability.observations_path = Some(PathBuf::from(path));
        }

        debug!(
            diagnostics_root = %config.diagnostics.root.display(),
            diagnostics_enabled = config.diagnostics.enabled,
            screenshot_delay_ms = config.diagnostics.screenshot_delay.as_millis() as u64,
            namespace = %config.observability.namespace,
            "Loaded configuration"
        );
        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
