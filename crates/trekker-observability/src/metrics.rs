//! Action Metrics Collection
//!
//! Prometheus counters and histograms for action executions and diagnostic
//! captures. Each [`ActionMetrics`] owns its registry, so several journeys
//! (or tests) in one process never collide on registration.

use crate::LATENCY_BUCKETS;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::time::Duration;
use thiserror::Error;

/// Outcome label values; cardinality: 2
pub const RESULT_OK: &str = "ok";
pub const RESULT_ERROR: &str = "error";

/// Diagnostic capture outcome label values; cardinality: 2
pub const CAPTURE_SAVED: &str = "saved";
pub const CAPTURE_FAILED: &str = "failed";

#[derive(Debug, Clone)]
pub struct ActionMetrics {
    registry: Registry,
    action_exec_total: CounterVec,                     // cardinality: actions x 2
    action_duration_seconds: HistogramVec,             // cardinality: actions
    action_errors_total: CounterVec,                   // cardinality: actions x ≤4
    diagnostic_captures_total: CounterVec,             // cardinality: 2
    diagnostic_capture_duration_seconds: HistogramVec, // cardinality: 1
}

impl ActionMetrics {
    /// Create metrics registered under `namespace`
    pub fn new(namespace: &str) -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let action_exec_total = CounterVec::new(
            Opts::new(
                format!("{}_action_exec_total", namespace),
                "Total number of action executions by action and result",
            ),
            &["action", "result"],
        )?;

        let action_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                format!("{}_action_duration_seconds", namespace),
                "Measured duration of successful actions in seconds",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["action"],
        )?;

        let action_errors_total = CounterVec::new(
            Opts::new(
                format!("{}_action_errors_total", namespace),
                "Total number of failed actions by action and error kind",
            ),
            &["action", "kind"],
        )?;

        let diagnostic_captures_total = CounterVec::new(
            Opts::new(
                format!("{}_diagnostic_captures_total", namespace),
                "Total number of background diagnostic captures by result",
            ),
            &["result"],
        )?;

        let diagnostic_capture_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                format!("{}_diagnostic_capture_duration_seconds", namespace),
                "Duration of background diagnostic captures in seconds",
            )
            .buckets(LATENCY_BUCKETS.to_vec()),
            &["kind"],
        )?;

        registry.register(Box::new(action_exec_total.clone()))?;
        registry.register(Box::new(action_duration_seconds.clone()))?;
        registry.register(Box::new(action_errors_total.clone()))?;
        registry.register(Box::new(diagnostic_captures_total.clone()))?;
        registry.register(Box::new(diagnostic_capture_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            action_exec_total,
            action_duration_seconds,
            action_errors_total,
            diagnostic_captures_total,
            diagnostic_capture_duration_seconds,
        })
    }

    pub fn record_success(&self, action: &str, duration: Duration) {
        self.action_exec_total
            .with_label_values(&[action, RESULT_OK])
            .inc();
        self.action_duration_seconds
            .with_label_values(&[action])
            .observe(duration.as_secs_f64());
    }

    pub fn record_failure(&self, action: &str, kind: &str) {
        self.action_exec_total
            .with_label_values(&[action, RESULT_ERROR])
            .inc();
        self.action_errors_total
            .with_label_values(&[action, kind])
            .inc();
    }

    pub fn record_capture(&self, saved: bool, duration: Duration) {
        let result = if saved { CAPTURE_SAVED } else { CAPTURE_FAILED };
        self.diagnostic_captures_total
            .with_label_values(&[result])
            .inc();
        self.diagnostic_capture_duration_seconds
            .with_label_values(&["screenshot"])
            .observe(duration.as_secs_f64());
    }

    pub fn executions(&self, action: &str, result: &str) -> u64 {
        self.action_exec_total
            .with_label_values(&[action, result])
            .get() as u64
    }

    pub fn captures(&self, result: &str) -> u64 {
        self.diagnostic_captures_total
            .with_label_values(&[result])
            .get() as u64
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus text exposition of every metric
    pub fn render(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }
}

/// Metrics system errors
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Metrics encoding failed: {0}")]
    Encoding(String),
}
