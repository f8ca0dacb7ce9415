//! View Issue action
//!
//! Opens a remembered issue, times navigation and summary readiness, takes a
//! delayed background screenshot and hands the viewed issue to later steps.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;
use trekker_core::{
    Action, ActionKey, ActionResult, ExecutionId, Issue, IssueKey, IssueKeyMemory, IssueMemory,
    JqlMemory, VIEW_ISSUE,
};
use trekker_observability::{ActionMeter, Observation};

use crate::diagnostics::{
    CaptureHandle, DiagnosticDirectory, DiagnosticsConfig, ScreenshotCapture,
};
use crate::driver::AppDriver;

/// Outcome of one non-skipped View Issue execution
#[derive(Debug)]
pub struct ViewIssueReport {
    pub issue: Issue,
    /// Time until the driver finished navigating
    pub navigation_duration: Duration,
    /// Time until the issue summary was visible
    pub action_duration: Duration,
    /// `None` when diagnostics are disabled
    pub diagnostics: Option<DiagnosticDirectory>,
    /// Background screenshot; dropping it leaves the capture running
    pub capture: Option<CaptureHandle>,
}

impl ViewIssueReport {
    fn observation(&self) -> Observation {
        let mut builder = Observation::builder()
            .add("issueKey", self.issue.key.as_str())
            .add("issueId", self.issue.id)
            .add("navigationDuration", self.navigation_duration)
            .add("actionDuration", self.action_duration);
        if let Some(directory) = &self.diagnostics {
            builder = builder.add("diagnosticsLocation", directory.path().display().to_string());
        }
        builder.build()
    }
}

pub struct ViewIssueAction {
    driver: Arc<dyn AppDriver>,
    meter: ActionMeter,
    issue_keys: Arc<dyn IssueKeyMemory>,
    issues: Arc<dyn IssueMemory>,
    jqls: Arc<dyn JqlMemory>,
    diagnostics: DiagnosticsConfig,
}

impl ViewIssueAction {
    pub fn new(
        driver: Arc<dyn AppDriver>,
        meter: ActionMeter,
        issue_keys: Arc<dyn IssueKeyMemory>,
        issues: Arc<dyn IssueMemory>,
        jqls: Arc<dyn JqlMemory>,
    ) -> Self {
        Self {
            driver,
            meter,
            issue_keys,
            issues,
            jqls,
            diagnostics: DiagnosticsConfig::default(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// View one remembered issue; `Ok(None)` when no issue key is known yet
    ///
    /// The diagnostic directory is prepared before timing starts and any
    /// failure to do so aborts the execution. Memories are only written after
    /// the observation was emitted.
    pub async fn execute(&self) -> ActionResult<Option<ViewIssueReport>> {
        let Some(key) = self.issue_keys.recall() else {
            debug!("Skipping {} action - no issue key to view", VIEW_ISSUE);
            return Ok(None);
        };

        let directory = if self.diagnostics.enabled {
            Some(DiagnosticDirectory::allocate(
                &self.diagnostics,
                ExecutionId::generate(),
                &key,
            )?)
        } else {
            None
        };

        let report = self
            .meter
            .measure(
                &VIEW_ISSUE,
                self.view(&key, directory),
                ViewIssueReport::observation,
            )
            .await?;

        self.issues.remember(vec![report.issue.clone()]);
        self.jqls.observe(&report.issue);
        Ok(Some(report))
    }

    async fn view(
        &self,
        key: &IssueKey,
        directory: Option<DiagnosticDirectory>,
    ) -> ActionResult<ViewIssueReport> {
        let started = Instant::now();
        let page = self.driver.go_to_issue(key).await?;
        let navigation_duration = started.elapsed();
        debug!(
            issue_key = %key,
            navigation_ms = navigation_duration.as_millis() as u64,
            "Navigation duration"
        );

        let capture = directory.as_ref().map(|directory| {
            ScreenshotCapture::new(
                Arc::clone(&self.driver),
                directory,
                &self.diagnostics.screenshot_file_name,
            )
            .with_metrics(self.meter.metrics().cloned())
            .schedule(started + self.diagnostics.screenshot_delay)
        });

        page.wait_for_summary().await?;
        let action_duration = started.elapsed();
        debug!(
            issue_key = %key,
            action_ms = action_duration.as_millis() as u64,
            "Action duration"
        );

        Ok(ViewIssueReport {
            issue: page.to_issue(),
            navigation_duration,
            action_duration,
            diagnostics: directory,
            capture,
        })
    }
}

#[async_trait]
impl Action for ViewIssueAction {
    fn key(&self) -> &ActionKey {
        &VIEW_ISSUE
    }

    async fn run(&self) -> ActionResult<()> {
        self.execute().await.map(drop)
    }
}
