//! Observation sinks
//!
//! Sinks accept observations fire-and-forget: `emit` has no result, and a
//! sink that fails to persist a record logs the failure instead of
//! reporting it back to the action.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info};
use trekker_core::ActionKey;

use crate::observation::Observation;

/// Destination for observations
pub trait ObservationSink: Send + Sync {
    fn emit(&self, key: &ActionKey, observation: &Observation);
}

/// Observation together with the key it was emitted under
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedObservation {
    pub key: ActionKey,
    pub observation: Observation,
}

/// Collects observations in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryObservationSink {
    emitted: Arc<Mutex<Vec<EmittedObservation>>>,
}

impl MemoryObservationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> Vec<EmittedObservation> {
        self.emitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Observations emitted under `key`, in emission order
    pub fn for_key(&self, key: &ActionKey) -> Vec<Observation> {
        self.emitted()
            .into_iter()
            .filter(|e| &e.key == key)
            .map(|e| e.observation)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.emitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObservationSink for MemoryObservationSink {
    fn emit(&self, key: &ActionKey, observation: &Observation) {
        self.emitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EmittedObservation {
                key: key.clone(),
                observation: observation.clone(),
            });
    }
}

/// Writes every observation as a structured `info` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservationSink;

impl ObservationSink for TracingObservationSink {
    fn emit(&self, key: &ActionKey, observation: &Observation) {
        match serde_json::to_string(observation) {
            Ok(json) => info!(action = %key, observation = %json, "Action observed"),
            Err(e) => error!(action = %key, error = %e, "Failed to serialize observation"),
        }
    }
}

/// One line of a JSON Lines observation log
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonLine<'a> {
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    virtual_user: Option<&'a str>,
    recorded_at: String,
    observation: &'a Observation,
}

/// Appends one JSON object per observation to a file
pub struct JsonLinesObservationSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    virtual_user: Option<String>,
}

impl JsonLinesObservationSink {
    /// Open (or create) `path` for appending
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
            virtual_user: None,
        })
    }

    /// Tag every line with the virtual user running the journey
    pub fn with_virtual_user(mut self, virtual_user: impl Into<String>) -> Self {
        self.virtual_user = Some(virtual_user.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(
        &self,
        key: &ActionKey,
        observation: &Observation,
        at: DateTime<Utc>,
    ) -> std::io::Result<()> {
        let line = JsonLine {
            label: key.as_str(),
            virtual_user: self.virtual_user.as_deref(),
            recorded_at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            observation,
        };
        let json = serde_json::to_string(&line)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{json}")?;
        writer.flush()
    }
}

impl ObservationSink for JsonLinesObservationSink {
    fn emit(&self, key: &ActionKey, observation: &Observation) {
        if let Err(e) = self.write_line(key, observation, Utc::now()) {
            error!(
                action = %key,
                path = %self.path.display(),
                error = %e,
                "Failed to append observation"
            );
        }
    }
}

/// Forwards every observation to each inner sink in order
#[derive(Clone, Default)]
pub struct FanOutObservationSink {
    sinks: Vec<Arc<dyn ObservationSink>>,
}

impl FanOutObservationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn ObservationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ObservationSink for FanOutObservationSink {
    fn emit(&self, key: &ActionKey, observation: &Observation) {
        for sink in &self.sinks {
            sink.emit(key, observation);
        }
    }
}
