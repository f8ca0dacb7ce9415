//! Background diagnostics
//!
//! Best-effort artifacts captured while an action runs. Directory setup is
//! part of the main flow and fails the action; everything after the capture
//! task is spawned is isolated from it and only ever logged.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error};
use trekker_core::{DriverError, EnvironmentError, ExecutionId, IssueKey};
use trekker_observability::ActionMetrics;

use crate::driver::AppDriver;

/// Where and when diagnostics are captured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Relative or absolute root for all diagnostic output
    pub root: PathBuf,
    /// Delay from action start until the screenshot is taken
    pub screenshot_delay: Duration,
    pub screenshot_file_name: String,
    /// When false no directories are created and nothing is captured
    pub enabled: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("diagnostics"),
            screenshot_delay: Duration::from_millis(800),
            screenshot_file_name: "screenshot.png".to_string(),
            enabled: true,
        }
    }
}

impl DiagnosticsConfig {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_screenshot_delay(mut self, delay: Duration) -> Self {
        self.screenshot_delay = delay;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Make sure `path` is a directory, creating it and its parents if absent
///
/// Succeeds when the directory already exists, including when another
/// virtual user creates it concurrently. Fails when something that is not a
/// directory occupies the path.
pub fn ensure_directory(path: &Path) -> Result<PathBuf, EnvironmentError> {
    if path.is_dir() {
        return Ok(path.to_path_buf());
    }
    if path.exists() {
        return Err(EnvironmentError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    match std::fs::create_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => {}
        Err(source) => {
            if path.exists() && !path.is_dir() {
                return Err(EnvironmentError::NotADirectory {
                    path: path.to_path_buf(),
                });
            }
            return Err(EnvironmentError::DirectoryCreation {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    if !path.is_dir() {
        return Err(EnvironmentError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}

/// Per-execution, per-subject output directory: `<root>/<execution>/<subject>/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticDirectory {
    execution_id: ExecutionId,
    path: PathBuf,
}

impl DiagnosticDirectory {
    /// Compute and create the directory for one execution
    pub fn allocate(
        config: &DiagnosticsConfig,
        execution_id: ExecutionId,
        subject: &IssueKey,
    ) -> Result<Self, EnvironmentError> {
        let path = config
            .root
            .join(execution_id.to_string())
            .join(subject.as_str());
        let path = ensure_directory(&path)?;
        Ok(Self { execution_id, path })
    }

    pub fn execution_id(&self) -> ExecutionId {
        self.execution_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Failure inside the capture task; never leaves it
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("screenshot failed to migrate from {} to {}: {source}", from.display(), to.display())]
    Persist {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Detached capture task
///
/// Dropping the handle leaves the task running; awaiting it is only useful
/// to callers that want the artifact, such as tests.
#[derive(Debug)]
pub struct CaptureHandle {
    task: JoinHandle<Option<PathBuf>>,
}

impl CaptureHandle {
    /// Wait for the capture; `Some(path)` if the artifact was saved
    pub async fn wait(self) -> Option<PathBuf> {
        self.task.await.ok().flatten()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Delayed, failure-isolated screenshot of the application
pub struct ScreenshotCapture {
    driver: Arc<dyn AppDriver>,
    target: PathBuf,
    metrics: Option<Arc<ActionMetrics>>,
}

impl ScreenshotCapture {
    pub fn new(
        driver: Arc<dyn AppDriver>,
        directory: &DiagnosticDirectory,
        file_name: &str,
    ) -> Self {
        Self {
            driver,
            target: directory.path().join(file_name),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Option<Arc<ActionMetrics>>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Spawn the capture to run at `deadline`
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(self, deadline: Instant) -> CaptureHandle {
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            debug!(target_path = %self.target.display(), "Taking a screenshot");
            let started = Instant::now();
            let outcome = self.capture().await;
            let elapsed = started.elapsed();
            if let Some(metrics) = &self.metrics {
                metrics.record_capture(outcome.is_ok(), elapsed);
            }
            debug!(elapsed_ms = elapsed.as_millis() as u64, "Screenshot duration");
            match outcome {
                Ok(path) => {
                    debug!(path = %path.display(), "Screenshot saved");
                    Some(path)
                }
                Err(e) => {
                    error!(error = %e, "Failed taking a screenshot");
                    None
                }
            }
        });
        CaptureHandle { task }
    }

    async fn capture(&self) -> Result<PathBuf, DiagnosticError> {
        let temporary = self.driver.capture_screenshot().await?;
        move_into_place(&temporary, &self.target).await?;
        Ok(self.target.clone())
    }
}

async fn move_into_place(from: &Path, to: &Path) -> Result<(), DiagnosticError> {
    let Err(rename_error) = tokio::fs::rename(from, to).await else {
        return Ok(());
    };
    // rename cannot cross filesystems
    debug!(error = %rename_error, "Rename failed, copying screenshot instead");
    copy_into_place(from, to).await
}

/// Copy `from` to `to`, then remove `from`. A leftover source is only logged.
async fn copy_into_place(from: &Path, to: &Path) -> Result<(), DiagnosticError> {
    tokio::fs::copy(from, to)
        .await
        .map_err(|source| DiagnosticError::Persist {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })?;
    if let Err(e) = tokio::fs::remove_file(from).await {
        debug!(error = %e, path = %from.display(), "Could not remove temporary screenshot");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;
    use trekker_core::DriverResult;
    use trekker_observability::metrics::{CAPTURE_FAILED, CAPTURE_SAVED};

    use crate::driver::{IssuePage, SearchResultsPage};

    /// Driver that only knows how to take screenshots
    struct Camera {
        scratch: PathBuf,
        fail: bool,
    }

    #[async_trait]
    impl AppDriver for Camera {
        async fn go_to_issue(&self, key: &IssueKey) -> DriverResult<Box<dyn IssuePage>> {
            Err(DriverError::issue_navigation(key, "not supported"))
        }

        async fn search_issues(&self, _jql: &str) -> DriverResult<Box<dyn SearchResultsPage>> {
            Err(DriverError::Navigation {
                target: "search".to_string(),
                reason: "not supported".to_string(),
            })
        }

        async fn capture_screenshot(&self) -> DriverResult<PathBuf> {
            if self.fail {
                return Err(DriverError::Capture("display unavailable".to_string()));
            }
            let path = self.scratch.join("shot.tmp");
            std::fs::write(&path, b"png")?;
            Ok(path)
        }
    }

    #[test]
    fn ensure_directory_is_idempotent() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("a").join("b");
        assert_eq!(ensure_directory(&path).unwrap(), path);
        assert_eq!(ensure_directory(&path).unwrap(), path);
        assert!(path.is_dir());
    }

    #[test]
    fn ensure_directory_rejects_regular_file() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("occupied");
        std::fs::write(&path, b"not a dir").unwrap();

        for _ in 0..2 {
            let error = ensure_directory(&path).unwrap_err();
            assert!(matches!(error, EnvironmentError::NotADirectory { .. }));
        }
    }

    #[test]
    fn ensure_directory_fails_below_a_file() {
        let root = TempDir::new().unwrap();
        let file = root.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        let error = ensure_directory(&file.join("child")).unwrap_err();
        assert!(matches!(error, EnvironmentError::DirectoryCreation { .. }));
    }

    #[test]
    fn allocate_namespaces_by_execution_and_subject() {
        let root = TempDir::new().unwrap();
        let config = DiagnosticsConfig::default().with_root(root.path());
        let key = IssueKey::parse("ABC-1").unwrap();

        let allocate = || DiagnosticDirectory::allocate(&config, ExecutionId::generate(), &key);
        let first = allocate().unwrap();
        let second = allocate().unwrap();

        assert_ne!(first.path(), second.path());
        assert!(first.path().ends_with("ABC-1"));
        let execution_dir = first.path().parent().unwrap();
        assert_eq!(
            execution_dir.file_name().unwrap().to_string_lossy(),
            first.execution_id().to_string()
        );
    }

    #[tokio::test]
    async fn capture_moves_screenshot_into_directory() {
        let root = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let config = DiagnosticsConfig::default().with_root(root.path());
        let directory = DiagnosticDirectory::allocate(
            &config,
            ExecutionId::generate(),
            &IssueKey::parse("ABC-1").unwrap(),
        )
        .unwrap();
        let metrics = Arc::new(ActionMetrics::new("capture_ok").unwrap());
        let driver = Arc::new(Camera {
            scratch: scratch.path().to_path_buf(),
            fail: false,
        });

        let handle = ScreenshotCapture::new(driver, &directory, "screenshot.png")
            .with_metrics(Some(Arc::clone(&metrics)))
            .schedule(Instant::now() + Duration::from_millis(5));

        let saved = handle.wait().await.expect("screenshot saved");
        assert_eq!(saved, directory.path().join("screenshot.png"));
        assert_eq!(std::fs::read(&saved).unwrap(), b"png");
        assert!(!scratch.path().join("shot.tmp").exists());
        assert_eq!(metrics.captures(CAPTURE_SAVED), 1);
    }

    #[tokio::test]
    async fn capture_failure_is_swallowed_and_counted() {
        let root = TempDir::new().unwrap();
        let config = DiagnosticsConfig::default().with_root(root.path());
        let directory = DiagnosticDirectory::allocate(
            &config,
            ExecutionId::generate(),
            &IssueKey::parse("ABC-1").unwrap(),
        )
        .unwrap();
        let metrics = Arc::new(ActionMetrics::new("capture_fail").unwrap());
        let driver = Arc::new(Camera {
            scratch: root.path().to_path_buf(),
            fail: true,
        });

        let handle = ScreenshotCapture::new(driver, &directory, "screenshot.png")
            .with_metrics(Some(Arc::clone(&metrics)))
            .schedule(Instant::now());

        assert_eq!(handle.wait().await, None);
        assert!(!directory.path().join("screenshot.png").exists());
        assert_eq!(metrics.captures(CAPTURE_FAILED), 1);
    }

    #[tokio::test]
    async fn missing_temporary_file_is_a_persist_error() {
        let from = Path::new("/nonexistent/shot.tmp");
        let to = Path::new("/nonexistent/x");

        let error = move_into_place(from, to).await.unwrap_err();
        assert!(matches!(error, DiagnosticError::Persist { .. }));
        assert!(error.to_string().contains("failed to migrate"));

        let error = copy_into_place(from, to).await.unwrap_err();
        assert!(matches!(error, DiagnosticError::Persist { .. }));
    }

    #[tokio::test]
    async fn copy_fallback_writes_target_and_removes_source() {
        let scratch = TempDir::new().unwrap();
        let diagnostics = TempDir::new().unwrap();
        let from = scratch.path().join("shot.tmp");
        let to = diagnostics.path().join("screenshot.png");
        std::fs::write(&from, b"png bytes").unwrap();

        copy_into_place(&from, &to).await.unwrap();

        assert_eq!(std::fs::read(&to).unwrap(), b"png bytes");
        assert!(!from.exists());
    }
}
