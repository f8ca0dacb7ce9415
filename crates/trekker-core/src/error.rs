//! Error Types
//!
//! Failures an action can report to whoever runs it. Skipping an action
//! because a memory is empty is not an error and has no variant here, and
//! diagnostic capture failures never leave the capture task, so they live
//! next to it in `trekker-actions`.

use std::path::PathBuf;

use thiserror::Error;

use crate::identifiers::IssueKey;

/// Errors raised by the application driver during the main flow.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Navigation to a page failed.
    #[error("Navigation to {target} failed: {reason}")]
    Navigation { target: String, reason: String },

    /// The page never reached its readiness condition.
    #[error("Waiting for {condition} failed: {reason}")]
    Readiness { condition: String, reason: String },

    /// A visual artifact could not be captured.
    #[error("Screenshot capture failed: {0}")]
    Capture(String),

    /// Underlying I/O failure inside the driver.
    #[error("Driver I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriverError {
    /// Navigation failure for an issue page
    pub fn issue_navigation(key: &IssueKey, reason: impl Into<String>) -> Self {
        DriverError::Navigation {
            target: format!("issue {}", key),
            reason: reason.into(),
        }
    }

    /// Readiness failure for a named condition
    pub fn readiness(condition: impl Into<String>, reason: impl Into<String>) -> Self {
        DriverError::Readiness {
            condition: condition.into(),
            reason: reason.into(),
        }
    }
}

/// The execution environment cannot host diagnostics.
///
/// Fatal to the action: it is raised before measurement starts.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("{} already exists and is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to ensure that {} is a directory: {source}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort an action and reach the journey runner.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),
}

impl ActionError {
    /// Short, stable label suitable for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::Driver(DriverError::Navigation { .. }) => "navigation",
            ActionError::Driver(DriverError::Readiness { .. }) => "readiness",
            ActionError::Driver(_) => "driver",
            ActionError::Environment(_) => "environment",
        }
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
pub type DriverResult<T> = Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_errors_convert_into_action_errors() {
        let key = IssueKey::parse("ABC-1").unwrap();
        let error: ActionError = DriverError::issue_navigation(&key, "HTTP 500").into();
        assert_eq!(error.kind(), "navigation");
        assert!(error.to_string().contains("issue ABC-1"));
        assert!(error.to_string().contains("HTTP 500"));
    }

    #[test]
    fn environment_errors_name_the_path() {
        let error: ActionError = EnvironmentError::NotADirectory {
            path: PathBuf::from("diagnostics/x"),
        }
        .into();
        assert_eq!(error.kind(), "environment");
        assert!(error.to_string().contains("diagnostics/x"));
        assert!(error.to_string().contains("not a directory"));
    }
}
