//! # Mock Driver for Testing
//!
//! A scripted [`AppDriver`] with predictable pages, injectable failures and
//! a record of every call, so journeys can be tested without a browser.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use trekker_actions::{AppDriver, IssuePage, SearchResultsPage};
use trekker_core::{DriverError, DriverResult, Issue, IssueKey, IssueView};

/// Bytes written into every mock screenshot
pub const SCREENSHOT_BYTES: &[u8] = b"\x89PNG mock screenshot";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct CallLog {
    navigations: Vec<IssueKey>,
    searches: Vec<String>,
    captures: usize,
}

/// A driver that serves configured issues and search results
#[derive(Debug, Clone, Default)]
pub struct MockDriver {
    issues: HashMap<IssueKey, Issue>,
    searches: HashMap<String, Vec<IssueKey>>,
    navigation_failure: Option<String>,
    readiness_failure: Option<String>,
    capture_failure: Option<String>,
    navigation_delay: Duration,
    summary_delay: Duration,
    calls: Arc<Mutex<CallLog>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `issue` when its key is navigated to
    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.insert(issue.key.clone(), issue);
        self
    }

    /// Return `keys` for the exact query `jql`
    pub fn with_search(mut self, jql: impl Into<String>, keys: Vec<IssueKey>) -> Self {
        self.searches.insert(jql.into(), keys);
        self
    }

    /// Fail every navigation with `reason`
    pub fn with_navigation_failure(mut self, reason: impl Into<String>) -> Self {
        self.navigation_failure = Some(reason.into());
        self
    }

    /// Fail every readiness wait with `reason`
    pub fn with_readiness_failure(mut self, reason: impl Into<String>) -> Self {
        self.readiness_failure = Some(reason.into());
        self
    }

    /// Fail every screenshot with `reason`
    pub fn with_capture_failure(mut self, reason: impl Into<String>) -> Self {
        self.capture_failure = Some(reason.into());
        self
    }

    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    /// Time the summary takes to appear after navigation
    pub fn with_summary_delay(mut self, delay: Duration) -> Self {
        self.summary_delay = delay;
        self
    }

    /// Keys navigated to, in call order
    pub fn navigations(&self) -> Vec<IssueKey> {
        lock(&self.calls).navigations.clone()
    }

    /// Queries searched, in call order
    pub fn searches(&self) -> Vec<String> {
        lock(&self.calls).searches.clone()
    }

    pub fn capture_count(&self) -> usize {
        lock(&self.calls).captures
    }

    /// Total number of driver interactions of any kind
    pub fn call_count(&self) -> usize {
        let calls = lock(&self.calls);
        calls.navigations.len() + calls.searches.len() + calls.captures
    }

    pub fn reset(&self) {
        *lock(&self.calls) = CallLog::default();
    }
}

#[async_trait]
impl AppDriver for MockDriver {
    async fn go_to_issue(&self, key: &IssueKey) -> DriverResult<Box<dyn IssuePage>> {
        lock(&self.calls).navigations.push(key.clone());
        if !self.navigation_delay.is_zero() {
            tokio::time::sleep(self.navigation_delay).await;
        }
        if let Some(reason) = &self.navigation_failure {
            return Err(DriverError::issue_navigation(key, reason.clone()));
        }
        let issue = self
            .issues
            .get(key)
            .cloned()
            .ok_or_else(|| DriverError::issue_navigation(key, "issue does not exist"))?;
        Ok(Box::new(MockIssuePage {
            issue,
            summary_delay: self.summary_delay,
            readiness_failure: self.readiness_failure.clone(),
        }))
    }

    async fn search_issues(&self, jql: &str) -> DriverResult<Box<dyn SearchResultsPage>> {
        lock(&self.calls).searches.push(jql.to_string());
        if let Some(reason) = &self.navigation_failure {
            return Err(DriverError::Navigation {
                target: format!("search '{}'", jql),
                reason: reason.clone(),
            });
        }
        Ok(Box::new(MockSearchResultsPage {
            keys: self.searches.get(jql).cloned().unwrap_or_default(),
            readiness_failure: self.readiness_failure.clone(),
        }))
    }

    async fn capture_screenshot(&self) -> DriverResult<PathBuf> {
        lock(&self.calls).captures += 1;
        if let Some(reason) = &self.capture_failure {
            return Err(DriverError::Capture(reason.clone()));
        }
        let mut file = tempfile::Builder::new()
            .prefix("trekker-screenshot-")
            .suffix(".png")
            .tempfile()?;
        file.write_all(SCREENSHOT_BYTES)?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        Ok(path)
    }
}

/// Issue page served by [`MockDriver`]
#[derive(Debug, Clone)]
pub struct MockIssuePage {
    issue: Issue,
    summary_delay: Duration,
    readiness_failure: Option<String>,
}

impl IssueView for MockIssuePage {
    fn issue_key(&self) -> &IssueKey {
        &self.issue.key
    }

    fn issue_id(&self) -> u64 {
        self.issue.id
    }

    fn is_editable(&self) -> bool {
        self.issue.editable
    }

    fn issue_type(&self) -> String {
        self.issue.issue_type.clone()
    }
}

#[async_trait]
impl IssuePage for MockIssuePage {
    async fn wait_for_summary(&self) -> DriverResult<()> {
        if !self.summary_delay.is_zero() {
            tokio::time::sleep(self.summary_delay).await;
        }
        match &self.readiness_failure {
            Some(reason) => Err(DriverError::readiness("issue summary visible", reason.clone())),
            None => Ok(()),
        }
    }
}

/// Search results page served by [`MockDriver`]
#[derive(Debug, Clone)]
pub struct MockSearchResultsPage {
    keys: Vec<IssueKey>,
    readiness_failure: Option<String>,
}

#[async_trait]
impl SearchResultsPage for MockSearchResultsPage {
    async fn wait_for_results(&self) -> DriverResult<()> {
        match &self.readiness_failure {
            Some(reason) => Err(DriverError::readiness("search results visible", reason.clone())),
            None => Ok(()),
        }
    }

    fn issue_keys(&self) -> Vec<IssueKey> {
        self.keys.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bug(key: &str) -> Issue {
        Issue {
            key: IssueKey::parse(key).unwrap(),
            editable: true,
            id: 10042,
            issue_type: "Bug".to_string(),
        }
    }

    #[tokio::test]
    async fn serves_configured_issue_and_records_call() {
        let driver = MockDriver::new().with_issue(bug("ABC-1"));
        let key = IssueKey::parse("ABC-1").unwrap();

        let page = driver.go_to_issue(&key).await.unwrap();
        page.wait_for_summary().await.unwrap();

        assert_eq!(page.to_issue(), bug("ABC-1"));
        assert_eq!(driver.navigations(), vec![key]);
        assert_eq!(driver.call_count(), 1);
    }

    #[test]
    fn unknown_issue_is_a_navigation_error() {
        let driver = MockDriver::new();
        let result = tokio_test::block_on(driver.go_to_issue(&IssueKey::parse("NOPE-9").unwrap()));
        assert!(matches!(result, Err(DriverError::Navigation { .. })));
    }

    #[tokio::test]
    async fn screenshot_is_a_real_temporary_file() {
        let driver = MockDriver::new();
        let path = driver.capture_screenshot().await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), SCREENSHOT_BYTES);
        std::fs::remove_file(path).unwrap();
        assert_eq!(driver.capture_count(), 1);
    }

    #[tokio::test]
    async fn clones_share_the_call_log() {
        let driver = MockDriver::new().with_capture_failure("no display");
        let clone = driver.clone();
        assert!(clone.capture_screenshot().await.is_err());
        assert_eq!(driver.capture_count(), 1);

        driver.reset();
        assert_eq!(clone.call_count(), 0);
    }
}
