//! # Trekker Actions
//!
//! Concrete journey steps and the pieces they are built from: the
//! [`AppDriver`] boundary to the application under test, diagnostic
//! directories and the delayed background [`ScreenshotCapture`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trekker_actions::{AppDriver, DiagnosticsConfig, ViewIssueAction};
//! use trekker_core::{
//!     Action, AdaptiveIssueKeyMemory, AdaptiveIssueMemory, AdaptiveJqlMemory,
//! };
//! use trekker_observability::{ActionMeter, TracingObservationSink};
//!
//! # async fn journey(driver: Arc<dyn AppDriver>) -> trekker_core::ActionResult<()> {
//! let view = ViewIssueAction::new(
//!     driver,
//!     ActionMeter::new(Arc::new(TracingObservationSink)),
//!     Arc::new(AdaptiveIssueKeyMemory::new()),
//!     Arc::new(AdaptiveIssueMemory::new()),
//!     Arc::new(AdaptiveJqlMemory::new()),
//! )
//! .with_diagnostics(DiagnosticsConfig::default());
//!
//! view.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod diagnostics;
pub mod driver;
pub mod search_jql;
pub mod view_issue;

pub use diagnostics::{
    CaptureHandle, DiagnosticDirectory, DiagnosticError, DiagnosticsConfig, ScreenshotCapture,
    ensure_directory,
};
pub use driver::{AppDriver, IssuePage, SearchResultsPage};
pub use search_jql::{SearchJqlAction, SearchReport};
pub use view_issue::{ViewIssueAction, ViewIssueReport};
