//! # Trekker
//!
//! Trekker simulates user journeys against an interactive issue tracker for
//! load testing. Each journey step is an [`Action`] that times itself at two
//! boundaries, emits one [`Observation`] per successful execution and takes a
//! best-effort background screenshot for post-hoc debugging.
//!
//! ## Core Components
//!
//! - **[Action]**: one simulated user step with a single `run`
//! - **Memories**: shared slots through which steps hand issue keys, issues
//!   and JQL queries to one another ([`IssueKeyMemory`], [`IssueMemory`],
//!   [`JqlMemory`])
//! - **[ActionMeter]**: emits observations and records Prometheus metrics
//! - **[AppDriver]**: boundary to whatever drives the application under test
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trekker::{
//!     Action, AdaptiveIssueKeyMemory, AdaptiveIssueMemory, AdaptiveJqlMemory, AppDriver,
//!     Observability, SearchJqlAction, TrekkerConfig, ViewIssueAction,
//! };
//!
//! # async fn journey(driver: Arc<dyn AppDriver>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = TrekkerConfig::from_env()?;
//! let observability = Observability::init(&config.observability)?;
//!
//! let keys = Arc::new(AdaptiveIssueKeyMemory::new());
//! let issues = Arc::new(AdaptiveIssueMemory::new());
//! let jqls = Arc::new(AdaptiveJqlMemory::new().with_queries(["project = ABC"]));
//!
//! let steps: Vec<Box<dyn Action>> = vec![
//!     Box::new(SearchJqlAction::new(
//!         driver.clone(),
//!         observability.meter(),
//!         jqls.clone(),
//!         keys.clone(),
//!     )),
//!     Box::new(
//!         ViewIssueAction::new(driver, observability.meter(), keys, issues, jqls)
//!             .with_diagnostics(config.diagnostics.clone()),
//!     ),
//! ];
//! for step in &steps {
//!     step.run().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;

pub use config::{ConfigError, TrekkerConfig};

// Re-export core types
pub use trekker_core::{
    Action, ActionError, ActionKey, ActionResult, AdaptiveIssueKeyMemory, AdaptiveIssueMemory,
    AdaptiveJqlMemory, DriverError, DriverResult, EnvironmentError, ExecutionId, Issue, IssueKey,
    IssueKeyMemory, IssueMemory, IssueView, JqlMemory, LastIssueKeyMemory, SEARCH_WITH_JQL,
    VIEW_ISSUE,
};

// Re-export actions and the driver boundary
pub use trekker_actions::{
    AppDriver, CaptureHandle, DiagnosticDirectory, DiagnosticsConfig, IssuePage,
    SearchJqlAction, SearchReport, SearchResultsPage, ViewIssueAction, ViewIssueReport,
};

// Re-export observability
pub use trekker_observability::{
    ActionMeter, ActionMetrics, LogFormat, Observability, ObservabilityConfig, Observation,
    ObservationSink,
};
