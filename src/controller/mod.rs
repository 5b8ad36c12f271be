//! Debounced, sequence-ordered list synchronization.
//!
//! [`FilteredListController`] is a plain synchronous state machine: callers
//! feed it criteria edits, page changes, elapsed time and fetch outcomes, and
//! it answers with the [`QueryRequest`]s to dispatch. It never performs I/O.
//! [`driver::ListHandle`] runs one controller inside a tokio task and wires
//! it to a [`crate::source::ListSource`].
//!
//! The displayed [`PageResult`] always belongs to the highest sequence
//! dispatched so far; responses for older sequences are dropped on arrival.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;

use crate::domain::criteria::{CriteriaError, FilterCriteria, QueryRequest};
use crate::domain::page::PageResult;
use crate::source::errors::SourceError;

pub mod driver;

pub use driver::ListHandle;

/// Quiet period after the last criteria edit before a fetch goes out.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ListState {
    /// Nothing pending.
    Idle,
    /// Criteria changed; waiting for input to settle.
    Debouncing,
    /// The latest request is in flight.
    Fetching,
    /// The latest request has been answered (successfully or not).
    Settled,
}

/// The fetch for `sequence` failed; shown to the user, never retried.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("fetching page {page} failed: {source}")]
pub struct QueryFetchError {
    pub sequence: u64,
    pub page: usize,
    #[source]
    pub source: SourceError,
}

/// What happened to a response handed to [`FilteredListController::apply_response`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    Applied,
    Failed,
    /// Superseded by a newer dispatch.
    Stale,
    /// The controller was disposed.
    Ignored,
}

/// Render-ready copy of the controller state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListSnapshot<T> {
    pub result: PageResult<T>,
    pub state: ListState,
    pub criteria: FilterCriteria,
    pub page: usize,
}

pub type FailureHook = Box<dyn Fn(&QueryFetchError) + Send + 'static>;

pub struct FilteredListController<T> {
    criteria: FilterCriteria,
    page: usize,
    state: ListState,
    debounce: Duration,
    deadline: Option<Instant>,
    /// Highest sequence dispatched, zero before the first dispatch.
    last_sequence: u64,
    in_flight_page: usize,
    result: PageResult<T>,
    failure_hooks: Vec<FailureHook>,
    disposed: bool,
}

impl<T: Clone> FilteredListController<T> {
    /// Fresh controller on page 1 with every filter in `criteria` as given.
    pub fn new(criteria: FilterCriteria, debounce: Duration) -> Self {
        Self {
            criteria,
            page: 1,
            state: ListState::Idle,
            debounce,
            deadline: None,
            last_sequence: 0,
            in_flight_page: 1,
            result: PageResult::default(),
            failure_hooks: Vec::new(),
            disposed: false,
        }
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn result(&self) -> &PageResult<T> {
        &self.result
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// When the pending debounce fires, if one is armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Records a filter edit and (re)arms the quiet-period timer.
    ///
    /// Setting a filter to the value it already holds is not an edit.
    pub fn set_criterion(
        &mut self,
        key: &str,
        value: impl Into<String>,
        now: Instant,
    ) -> Result<(), CriteriaError> {
        if self.disposed {
            return Ok(());
        }
        if self.criteria.set(key, value)? {
            self.state = ListState::Debouncing;
            self.deadline = Some(now + self.debounce);
        }
        Ok(())
    }

    /// Dispatches the debounced query once the quiet period has passed.
    ///
    /// The request always targets page 1 since the filters changed.
    pub fn poll_deadline(&mut self, now: Instant) -> Option<QueryRequest> {
        match self.deadline {
            Some(deadline) if !self.disposed && now >= deadline => {
                self.deadline = None;
                self.page = 1;
                Some(self.dispatch())
            }
            _ => None,
        }
    }

    /// Dispatches `page` immediately with the current filters.
    ///
    /// Any armed debounce is consumed, the request already carries the
    /// latest filters.
    pub fn set_page(&mut self, page: usize) -> Option<QueryRequest> {
        if self.disposed {
            return None;
        }
        self.deadline = None;
        self.page = page.max(1);
        Some(self.dispatch())
    }

    /// Folds a fetch outcome for `sequence` into the controller.
    ///
    /// Only the highest dispatched sequence may change what is displayed.
    /// A failure keeps the previous page and notifies every failure hook once.
    pub fn apply_response(
        &mut self,
        sequence: u64,
        outcome: Result<PageResult<T>, SourceError>,
    ) -> ResponseOutcome {
        if self.disposed {
            return ResponseOutcome::Ignored;
        }
        if sequence != self.last_sequence {
            log::debug!(
                "Discarding stale response #{sequence}, latest is #{}",
                self.last_sequence
            );
            return ResponseOutcome::Stale;
        }

        let applied = match outcome {
            Ok(result) => {
                self.result = result;
                ResponseOutcome::Applied
            }
            Err(source) => {
                let error = QueryFetchError {
                    sequence,
                    page: self.in_flight_page,
                    source,
                };
                log::error!("List fetch #{sequence} failed: {error}");
                for hook in &self.failure_hooks {
                    hook(&error);
                }
                ResponseOutcome::Failed
            }
        };

        // A newer edit may already be waiting for its quiet period.
        if self.state == ListState::Fetching {
            self.state = ListState::Settled;
        }
        applied
    }

    /// Registers a callback invoked for every failed latest fetch.
    pub fn on_failure<F>(&mut self, hook: F)
    where
        F: Fn(&QueryFetchError) + Send + 'static,
    {
        self.failure_hooks.push(Box::new(hook));
    }

    pub(crate) fn push_failure_hook(&mut self, hook: FailureHook) {
        self.failure_hooks.push(hook);
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        ListSnapshot {
            result: self.result.clone(),
            state: self.state,
            criteria: self.criteria.clone(),
            page: self.page,
        }
    }

    /// Stops the controller; later responses and edits are no-ops.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.deadline = None;
        self.failure_hooks.clear();
    }

    fn dispatch(&mut self) -> QueryRequest {
        self.last_sequence += 1;
        self.state = ListState::Fetching;
        self.in_flight_page = self.page;
        QueryRequest {
            criteria: self.criteria.clone(),
            page: self.page,
            sequence: self.last_sequence,
        }
    }
}
