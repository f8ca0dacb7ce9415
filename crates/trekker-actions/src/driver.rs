//! Application driver boundary
//!
//! The driver performs the real navigation and UI waits against the
//! application under test. Trekker only depends on these traits; how pages
//! are loaded or how readiness is detected belongs to the implementation,
//! including any timeout policy.

use std::path::PathBuf;

use async_trait::async_trait;
use trekker_core::{DriverResult, IssueKey, IssueView};

/// Handle to the application under test
#[async_trait]
pub trait AppDriver: Send + Sync {
    /// Navigate to an issue and return its page once navigation finished
    async fn go_to_issue(&self, key: &IssueKey) -> DriverResult<Box<dyn IssuePage>>;

    /// Run a JQL search and return the results page
    async fn search_issues(&self, jql: &str) -> DriverResult<Box<dyn SearchResultsPage>>;

    /// Capture the current screen into a temporary file owned by the caller
    async fn capture_screenshot(&self) -> DriverResult<PathBuf>;
}

/// A loaded issue page
#[async_trait]
pub trait IssuePage: IssueView {
    /// Block until the issue summary is visible
    async fn wait_for_summary(&self) -> DriverResult<()>;
}

/// A loaded search results page
#[async_trait]
pub trait SearchResultsPage: Send + Sync {
    /// Block until results are rendered
    async fn wait_for_results(&self) -> DriverResult<()>;

    fn issue_keys(&self) -> Vec<IssueKey>;
}
