use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use donorlink::controller::driver::ControllerError;
use donorlink::controller::{ListHandle, ListState};
use donorlink::source::errors::SourceError;
use tokio::time::sleep;

mod common;

use common::{Script, ScriptedSource, status_criteria};

const DEBOUNCE: Duration = Duration::from_millis(500);

fn spawn(source: &Arc<ScriptedSource>) -> ListHandle<String> {
    ListHandle::spawn(status_criteria(), Arc::clone(source), 10, DEBOUNCE)
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_fetch_once() {
    let source = Arc::new(ScriptedSource::instant());
    let handle = spawn(&source);

    for value in ["p", "pe", "pen", "pending"] {
        handle.set_criterion("status", value).unwrap();
        sleep(ms(100)).await;
    }
    assert!(source.calls().is_empty());

    sleep(ms(1_000)).await;

    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].page, 1);
    assert_eq!(calls[0].criteria.get("status"), Some("pending"));
    assert_eq!(handle.get_snapshot().state, ListState::Settled);
}

#[tokio::test(start_paused = true)]
async fn test_no_fetch_before_quiet_period() {
    let source = Arc::new(ScriptedSource::instant());
    let handle = spawn(&source);

    handle.set_criterion("status", "done").unwrap();
    sleep(ms(499)).await;
    assert!(source.calls().is_empty());
    assert_eq!(handle.get_snapshot().state, ListState::Debouncing);

    sleep(ms(10)).await;
    assert_eq!(source.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_page_change_dispatches_immediately() {
    let source = Arc::new(ScriptedSource::instant());
    let handle = spawn(&source);

    handle.set_page(3).unwrap();
    sleep(ms(1)).await;

    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].page, 3);
    let snapshot = handle.get_snapshot();
    assert_eq!(snapshot.page, 3);
    assert_eq!(snapshot.result.current_page, 3);
}

#[tokio::test(start_paused = true)]
async fn test_page_change_consumes_pending_edit() {
    let source = Arc::new(ScriptedSource::instant());
    let handle = spawn(&source);

    handle.set_criterion("status", "pending").unwrap();
    sleep(ms(100)).await;
    handle.set_page(2).unwrap();
    sleep(ms(1_000)).await;

    let calls = source.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].page, 2);
    assert_eq!(calls[0].criteria.get("status"), Some("pending"));
}

#[tokio::test(start_paused = true)]
async fn test_filter_edit_resets_page() {
    let source = Arc::new(ScriptedSource::instant());
    let handle = spawn(&source);

    handle.set_page(4).unwrap();
    sleep(ms(1)).await;
    handle.set_criterion("status", "done").unwrap();
    sleep(ms(600)).await;

    let calls = source.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].page, 1);
    assert_eq!(handle.get_snapshot().page, 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    let source = Arc::new(ScriptedSource::new(vec![
        Script::ok(Some("pending"), 900, 5),
        Script::ok(Some("inprogress"), 100, 2),
    ]));
    let handle = spawn(&source);

    handle.set_criterion("status", "pending").unwrap();
    sleep(ms(600)).await;
    handle.set_criterion("status", "inprogress").unwrap();
    sleep(ms(2_000)).await;

    assert_eq!(source.calls().len(), 2);
    let snapshot = handle.get_snapshot();
    assert_eq!(snapshot.result.total_count, 2);
    assert_eq!(snapshot.state, ListState::Settled);
    assert_eq!(snapshot.criteria.get("status"), Some("inprogress"));
}

#[tokio::test(start_paused = true)]
async fn test_failure_notifies_once_and_keeps_result() {
    let source = Arc::new(ScriptedSource::new(vec![Script::failing(
        50,
        SourceError::ConnectionError("offline".to_string()),
    )]));
    let handle = spawn(&source);
    let failures = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&failures);
    handle
        .on_failure(move |err| {
            assert_eq!(err.page, 1);
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    handle.set_page(1).unwrap();
    sleep(ms(100)).await;

    assert_eq!(failures.load(Ordering::SeqCst), 1);
    let snapshot = handle.get_snapshot();
    assert!(snapshot.result.is_empty());
    assert_eq!(snapshot.result.total_count, 0);
    assert_eq!(snapshot.state, ListState::Settled);
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_previously_loaded_page() {
    let source = Arc::new(ScriptedSource::new(vec![
        Script::ok(None, 10, 25),
        Script::failing(10, SourceError::NotFound).on_page(2),
    ]));
    let handle = spawn(&source);
    let failures = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&failures);
    handle
        .on_failure(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

    handle.set_page(1).unwrap();
    sleep(ms(50)).await;
    let loaded = handle.get_snapshot().result;
    assert_eq!(loaded.items.len(), 10);

    handle.set_page(2).unwrap();
    sleep(ms(50)).await;

    assert_eq!(failures.load(Ordering::SeqCst), 1);
    let snapshot = handle.get_snapshot();
    assert_eq!(snapshot.state, ListState::Settled);
    assert_eq!(snapshot.page, 2);
    assert_eq!(snapshot.result, loaded);
    assert_eq!(snapshot.result.total_count, 25);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_key_is_rejected() {
    let source = Arc::new(ScriptedSource::instant());
    let handle = spawn(&source);

    let result = handle.set_criterion("bloodGroup", "A+");

    assert!(matches!(result, Err(ControllerError::Criteria(_))));
}

#[tokio::test(start_paused = true)]
async fn test_dispose_ignores_late_response() {
    let source = Arc::new(ScriptedSource::new(vec![Script::ok(None, 500, 3)]));
    let handle = spawn(&source);
    let mut updates = handle.subscribe();

    handle.set_page(1).unwrap();
    sleep(ms(10)).await;
    handle.dispose();
    sleep(ms(1_000)).await;

    let snapshot = handle.get_snapshot();
    assert!(snapshot.result.is_empty());
    assert_ne!(snapshot.state, ListState::Settled);
    assert_eq!(handle.set_page(2), Err(ControllerError::Disposed));
    let _ = updates.borrow_and_update();
    assert!(updates.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_settled_page() {
    let source = Arc::new(ScriptedSource::new(vec![Script::ok(None, 20, 25)]));
    let handle = spawn(&source);
    let mut updates = handle.subscribe();

    handle.set_page(2).unwrap();

    let settled = loop {
        updates.changed().await.unwrap();
        let snapshot = updates.borrow_and_update().clone();
        if snapshot.state == ListState::Settled {
            break snapshot;
        }
    };
    assert_eq!(settled.result.current_page, 2);
    assert_eq!(settled.result.total_pages, 3);
    assert_eq!(settled.result.items.len(), 10);
}
