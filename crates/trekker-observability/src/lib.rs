//! Trekker Observability
//!
//! Observation records, the [`ActionMeter`] that emits them, Prometheus
//! action metrics and structured logging setup for Trekker journeys.

pub mod meter;
pub mod metrics;
pub mod observation;
pub mod sink;

#[cfg(feature = "tracing")]
pub mod trace;

use std::path::PathBuf;
use std::sync::Arc;

pub use meter::{ActionMeter, MeteredError};
pub use metrics::{ActionMetrics, MetricsError};
pub use observation::{Observation, ObservationBuilder, ObservationValue};
pub use sink::{
    EmittedObservation, FanOutObservationSink, JsonLinesObservationSink, MemoryObservationSink,
    ObservationSink, TracingObservationSink,
};

/// Latency buckets for action and capture histograms
/// Covers interactive page loads from 50ms up to a minute
pub const LATENCY_BUCKETS: &[f64] = &[
    0.05, // 50ms
    0.1,  // 100ms
    0.25, // 250ms
    0.5,  // 500ms
    0.8,  // 800ms
    1.0,  // 1s
    2.0,  // 2s
    5.0,  // 5s
    10.0, // 10s
    30.0, // 30s
    60.0, // 60s
];

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl std::str::FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(ObservabilityError::Config(format!(
                "unknown log format '{}' (expected json or pretty)",
                other
            ))),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Install the tracing subscriber on init
    pub tracing_enabled: bool,
    pub log_format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
    /// Metrics namespace prefix
    pub namespace: String,
    /// Append observations as JSON Lines to this file
    pub observations_path: Option<PathBuf>,
    /// Virtual user label written next to each persisted observation
    pub virtual_user: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            tracing_enabled: true,
            log_format: LogFormat::default(),
            log_filter: None,
            namespace: "trekker".to_string(),
            observations_path: None,
            virtual_user: None,
        }
    }
}

impl ObservabilityConfig {
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_observations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.observations_path = Some(path.into());
        self
    }

    pub fn with_virtual_user(mut self, virtual_user: impl Into<String>) -> Self {
        self.virtual_user = Some(virtual_user.into());
        self
    }

    pub fn without_tracing(mut self) -> Self {
        self.tracing_enabled = false;
        self
    }
}

/// Initialised observability stack: metrics plus the observation sink chain
#[derive(Clone)]
pub struct Observability {
    metrics: Arc<ActionMetrics>,
    sink: Arc<dyn ObservationSink>,
}

impl Observability {
    /// Build metrics and sinks, installing tracing when enabled
    ///
    /// Observations always go to the tracing sink; a JSON Lines file is
    /// added when `observations_path` is set.
    pub fn init(config: &ObservabilityConfig) -> Result<Self, ObservabilityError> {
        #[cfg(feature = "tracing")]
        if config.tracing_enabled {
            trace::init_tracing(config)?;
        }

        let metrics = Arc::new(ActionMetrics::new(&config.namespace)?);

        let mut sink = FanOutObservationSink::new().with_sink(Arc::new(TracingObservationSink));
        if let Some(path) = &config.observations_path {
            let mut jsonl = JsonLinesObservationSink::open(path).map_err(|e| {
                ObservabilityError::Config(format!(
                    "cannot open observations file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            if let Some(vu) = &config.virtual_user {
                jsonl = jsonl.with_virtual_user(vu.clone());
            }
            sink = sink.with_sink(Arc::new(jsonl));
        }

        Ok(Self {
            metrics,
            sink: Arc::new(sink),
        })
    }

    pub fn metrics(&self) -> &Arc<ActionMetrics> {
        &self.metrics
    }

    pub fn sink(&self) -> &Arc<dyn ObservationSink> {
        &self.sink
    }

    /// Meter wired to this stack's sink and metrics
    pub fn meter(&self) -> ActionMeter {
        ActionMeter::new(Arc::clone(&self.sink)).with_metrics(Arc::clone(&self.metrics))
    }
}

/// Observability framework errors
#[derive(thiserror::Error, Debug)]
pub enum ObservabilityError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] metrics::MetricsError),
}
