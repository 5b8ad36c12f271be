//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use donorlink::domain::criteria::FilterCriteria;
use donorlink::domain::page::PageResult;
use donorlink::dto::lists::ListQuery;
use donorlink::source::ListSource;
use donorlink::source::errors::{SourceError, SourceResult};

/// How the source answers queries for `page`, or whose `status` filter matches `status`.
#[derive(Clone)]
pub struct Script {
    pub status: Option<String>,
    pub page: Option<usize>,
    pub delay: Duration,
    pub outcome: Result<usize, SourceError>,
}

impl Script {
    pub fn ok(status: Option<&str>, delay_ms: u64, total: usize) -> Self {
        Self {
            status: status.map(str::to_string),
            page: None,
            delay: Duration::from_millis(delay_ms),
            outcome: Ok(total),
        }
    }

    /// Restricts the script to queries for `page`, taking precedence over filters.
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn failing(delay_ms: u64, err: SourceError) -> Self {
        Self {
            status: None,
            page: None,
            delay: Duration::from_millis(delay_ms),
            outcome: Err(err),
        }
    }
}

/// List source that answers by script after a virtual delay and records
/// every query it receives.
pub struct ScriptedSource {
    scripts: Vec<Script>,
    calls: Mutex<Vec<ListQuery>>,
}

impl ScriptedSource {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answers every query immediately with one item per page.
    pub fn instant() -> Self {
        Self::new(vec![Script::ok(None, 0, 1)])
    }

    pub fn calls(&self) -> Vec<ListQuery> {
        self.calls.lock().unwrap().clone()
    }

    fn script_for(&self, query: &ListQuery) -> Script {
        let status = query.criteria.get("status");
        self.scripts
            .iter()
            .find(|script| script.page == Some(query.page))
            .or_else(|| {
                self.scripts
                    .iter()
                    .find(|script| script.page.is_none() && script.status.as_deref() == status)
            })
            .or_else(|| {
                self.scripts
                    .iter()
                    .find(|script| script.page.is_none() && script.status.is_none())
            })
            .cloned()
            .expect("no script for query")
    }
}

#[async_trait]
impl ListSource<String> for ScriptedSource {
    async fn fetch_page(&self, query: &ListQuery) -> SourceResult<PageResult<String>> {
        self.calls.lock().unwrap().push(query.clone());
        let script = self.script_for(query);
        tokio::time::sleep(script.delay).await;
        let total = script.outcome?;
        let items = (0..total.min(query.limit))
            .map(|i| format!("item-{}-{i}", query.page))
            .collect();
        Ok(PageResult::new(
            items,
            query.page,
            total.div_ceil(query.limit),
            total,
        ))
    }
}

pub fn status_criteria() -> FilterCriteria {
    FilterCriteria::with_keys(["status"])
}
