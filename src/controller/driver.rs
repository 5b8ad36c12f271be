//! Async driver running one [`FilteredListController`] per list.
//!
//! The controller lives inside a single tokio task. Edits and page changes
//! reach it over a command channel, fetches run as child tasks and report
//! back through a `JoinSet`, and every material change is published on a
//! `watch` channel. Controller logic therefore never runs concurrently with
//! itself.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep_until};

use crate::controller::{
    FailureHook, FilteredListController, ListSnapshot, QueryFetchError, ResponseOutcome,
};
use crate::domain::criteria::{CriteriaError, FilterCriteria, QueryRequest};
use crate::domain::page::PageResult;
use crate::dto::lists::ListQuery;
use crate::source::ListSource;
use crate::source::errors::SourceResult;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControllerError {
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
    #[error("list controller has been disposed")]
    Disposed,
}

enum Command {
    SetCriterion { key: String, value: String },
    SetPage(usize),
    OnFailure(FailureHook),
    Dispose,
}

type Fetched<T> = (u64, SourceResult<PageResult<T>>);

/// Owner-side handle of a running list controller.
///
/// Dropping the handle disposes the controller: in-flight fetches are
/// aborted and their results never reach the snapshot.
pub struct ListHandle<T> {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<ListSnapshot<T>>,
    keys: Vec<String>,
}

impl<T> ListHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Starts a controller over `source`. Must be called inside a tokio runtime.
    pub fn spawn<S>(
        criteria: FilterCriteria,
        source: Arc<S>,
        limit: usize,
        debounce: Duration,
    ) -> Self
    where
        S: ListSource<T> + ?Sized + 'static,
    {
        let keys = criteria.keys().map(str::to_string).collect();
        let controller = FilteredListController::new(criteria, debounce);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        tokio::spawn(run(controller, source, limit, command_rx, snapshot_tx));

        Self {
            commands: command_tx,
            snapshots: snapshot_rx,
            keys,
        }
    }

    /// Edits one filter; the fetch follows once input has been quiet.
    pub fn set_criterion(&self, key: &str, value: impl Into<String>) -> Result<(), ControllerError> {
        if !self.keys.iter().any(|k| k == key) {
            return Err(CriteriaError::UnknownKey(key.to_string()).into());
        }
        self.send(Command::SetCriterion {
            key: key.to_string(),
            value: value.into(),
        })
    }

    /// Jumps to `page` right away, keeping the current filters.
    pub fn set_page(&self, page: usize) -> Result<(), ControllerError> {
        self.send(Command::SetPage(page))
    }

    pub fn on_failure<F>(&self, hook: F) -> Result<(), ControllerError>
    where
        F: Fn(&QueryFetchError) + Send + 'static,
    {
        self.send(Command::OnFailure(Box::new(hook)))
    }

    /// Latest published state.
    pub fn get_snapshot(&self) -> ListSnapshot<T> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<T>> {
        self.snapshots.clone()
    }

    pub fn dispose(&self) {
        // The task may already be gone, in which case there is nothing to stop.
        let _ = self.commands.send(Command::Dispose);
    }

    fn send(&self, command: Command) -> Result<(), ControllerError> {
        self.commands
            .send(command)
            .map_err(|_| ControllerError::Disposed)
    }
}

impl<T> Drop for ListHandle<T> {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Dispose);
    }
}

async fn run<T, S>(
    mut controller: FilteredListController<T>,
    source: Arc<S>,
    limit: usize,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<ListSnapshot<T>>,
) where
    T: Clone + Send + Sync + 'static,
    S: ListSource<T> + ?Sized + 'static,
{
    let mut in_flight: JoinSet<Fetched<T>> = JoinSet::new();

    loop {
        let deadline = controller.deadline();
        let publish = tokio::select! {
            command = commands.recv() => match command {
                Some(Command::SetCriterion { key, value }) => {
                    match controller.set_criterion(&key, value, Instant::now()) {
                        Ok(()) => true,
                        Err(err) => {
                            log::warn!("Ignoring filter edit: {err}");
                            false
                        }
                    }
                }
                Some(Command::SetPage(page)) => match controller.set_page(page) {
                    Some(request) => {
                        dispatch(&mut in_flight, &source, request, limit);
                        true
                    }
                    None => false,
                },
                Some(Command::OnFailure(hook)) => {
                    controller.push_failure_hook(hook);
                    false
                }
                Some(Command::Dispose) | None => break,
            },
            () = wait_until(deadline) => match controller.poll_deadline(Instant::now()) {
                Some(request) => {
                    dispatch(&mut in_flight, &source, request, limit);
                    true
                }
                None => false,
            },
            Some(joined) = in_flight.join_next() => match joined {
                Ok((sequence, outcome)) => matches!(
                    controller.apply_response(sequence, outcome),
                    ResponseOutcome::Applied | ResponseOutcome::Failed
                ),
                Err(err) => {
                    log::error!("List fetch task failed: {err}");
                    false
                }
            },
        };

        if publish {
            snapshots.send_replace(controller.snapshot());
        }
    }

    controller.dispose();
    in_flight.abort_all();
    log::debug!("List controller disposed");
}

fn dispatch<T, S>(
    in_flight: &mut JoinSet<Fetched<T>>,
    source: &Arc<S>,
    request: QueryRequest,
    limit: usize,
) where
    T: Send + 'static,
    S: ListSource<T> + ?Sized + 'static,
{
    let source = Arc::clone(source);
    let query = ListQuery::from_request(&request, limit);
    let sequence = request.sequence;
    log::debug!("Dispatching list query #{sequence} for page {}", query.page);
    in_flight.spawn(async move {
        let outcome = source.fetch_page(&query).await;
        (sequence, outcome)
    });
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}
