//! Action metering
//!
//! The meter does not time actions itself beyond a total for metrics: the
//! measured future computes its own sub-durations and hands them back in its
//! result, and the observation extractor turns that result into fields.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};
use trekker_core::ActionKey;

use crate::metrics::ActionMetrics;
use crate::observation::Observation;
use crate::sink::ObservationSink;

/// Error kinds the meter can label failures with
pub trait MeteredError: std::fmt::Display {
    fn kind(&self) -> &'static str;
}

impl MeteredError for trekker_core::ActionError {
    fn kind(&self) -> &'static str {
        trekker_core::ActionError::kind(self)
    }
}

/// Emits exactly one observation per successful measured execution
#[derive(Clone)]
pub struct ActionMeter {
    sink: Arc<dyn ObservationSink>,
    metrics: Option<Arc<ActionMetrics>>,
}

impl ActionMeter {
    pub fn new(sink: Arc<dyn ObservationSink>) -> Self {
        Self {
            sink,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<ActionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn metrics(&self) -> Option<&Arc<ActionMetrics>> {
        self.metrics.as_ref()
    }

    /// Run `action` and, if it succeeds, emit `observation(&result)` under `key`
    ///
    /// Failures are returned untouched and nothing is emitted for them.
    pub async fn measure<R, E, F, O>(
        &self,
        key: &ActionKey,
        action: F,
        observation: O,
    ) -> Result<R, E>
    where
        F: Future<Output = Result<R, E>>,
        O: FnOnce(&R) -> Observation,
        E: MeteredError,
    {
        let started = Instant::now();
        match action.await {
            Ok(result) => {
                let elapsed = started.elapsed();
                let record = observation(&result);
                self.sink.emit(key, &record);
                if let Some(metrics) = &self.metrics {
                    metrics.record_success(key.as_str(), elapsed);
                }
                debug!(action = %key, elapsed_ms = elapsed.as_millis() as u64, "Action measured");
                Ok(result)
            }
            Err(error) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_failure(key.as_str(), error.kind());
                }
                warn!(action = %key, kind = error.kind(), error = %error, "Action failed");
                Err(error)
            }
        }
    }
}
