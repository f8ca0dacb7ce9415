//! Structured logging setup

use crate::{LogFormat, ObservabilityConfig, ObservabilityError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured filter, which defaults to `info`.
/// Calling this again once a subscriber is installed keeps the existing one
/// and succeeds.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), ObservabilityError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter.as_deref().unwrap_or("info")))
        .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };
    if let Err(e) = installed {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
        return Ok(());
    }

    tracing::info!(
        namespace = %config.namespace,
        format = ?config.log_format,
        "Initialized structured tracing"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_keeps_the_installed_subscriber() {
        let config = ObservabilityConfig::default();
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config.with_log_format(LogFormat::Pretty)).is_ok());
    }

    #[test]
    fn observability_can_be_initialised_per_virtual_user() {
        let first = crate::Observability::init(&ObservabilityConfig::default());
        let second =
            crate::Observability::init(&ObservabilityConfig::default().with_virtual_user("vu-2"));
        assert!(first.is_ok());
        assert!(second.is_ok());
    }
}
