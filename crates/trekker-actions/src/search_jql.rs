//! Search with JQL action
//!
//! Runs a remembered query and feeds the found issue keys back to the
//! issue key memory, where View Issue picks them up.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;
use trekker_core::{
    Action, ActionKey, ActionResult, IssueKey, IssueKeyMemory, JqlMemory, SEARCH_WITH_JQL,
};
use trekker_observability::{ActionMeter, Observation};

use crate::driver::AppDriver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub jql: String,
    pub issue_keys: Vec<IssueKey>,
    pub action_duration: Duration,
}

pub struct SearchJqlAction {
    driver: Arc<dyn AppDriver>,
    meter: ActionMeter,
    jqls: Arc<dyn JqlMemory>,
    issue_keys: Arc<dyn IssueKeyMemory>,
}

impl SearchJqlAction {
    pub fn new(
        driver: Arc<dyn AppDriver>,
        meter: ActionMeter,
        jqls: Arc<dyn JqlMemory>,
        issue_keys: Arc<dyn IssueKeyMemory>,
    ) -> Self {
        Self {
            driver,
            meter,
            jqls,
            issue_keys,
        }
    }

    /// Run one remembered query; `Ok(None)` when no query is known yet
    pub async fn execute(&self) -> ActionResult<Option<SearchReport>> {
        let Some(jql) = self.jqls.recall() else {
            debug!("Skipping {} action - no JQL to search with", SEARCH_WITH_JQL);
            return Ok(None);
        };

        let report = self
            .meter
            .measure(&SEARCH_WITH_JQL, self.search(jql), |report| {
                Observation::builder()
                    .add("jql", report.jql.as_str())
                    .add("issues", report.issue_keys.len())
                    .add("actionDuration", report.action_duration)
                    .build()
            })
            .await?;

        if !report.issue_keys.is_empty() {
            self.issue_keys.remember(report.issue_keys.clone());
        }
        Ok(Some(report))
    }

    async fn search(&self, jql: String) -> ActionResult<SearchReport> {
        let started = Instant::now();
        let page = self.driver.search_issues(&jql).await?;
        page.wait_for_results().await?;
        Ok(SearchReport {
            issue_keys: page.issue_keys(),
            action_duration: started.elapsed(),
            jql,
        })
    }
}

#[async_trait]
impl Action for SearchJqlAction {
    fn key(&self) -> &ActionKey {
        &SEARCH_WITH_JQL
    }

    async fn run(&self) -> ActionResult<()> {
        self.execute().await.map(drop)
    }
}
