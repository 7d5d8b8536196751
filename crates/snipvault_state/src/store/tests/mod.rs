//! Store tests driven through test channels; no worker thread runs.

use super::*;
use crate::backend::{BackendHandle, CoreCmd, CoreErrorSource, CoreEvent};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use snipvault_core::models::{Category, Snippet, Tag};
use snipvault_core::view::FetchPlan;
use std::time::Duration;

mod fetch_and_search;
mod taxonomy;

const TEST_DEBOUNCE: Duration = Duration::from_millis(300);

struct TestHarness {
    store: Store,
    cmd_rx: Receiver<CoreCmd>,
    _evt_tx: Sender<CoreEvent>,
}

fn make_store() -> TestHarness {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();
    TestHarness {
        store: Store::new(
            BackendHandle::from_test_channels(cmd_tx, evt_rx),
            TEST_DEBOUNCE,
        ),
        cmd_rx,
        _evt_tx: evt_tx,
    }
}

fn recv_cmd(rx: &Receiver<CoreCmd>) -> CoreCmd {
    rx.recv_timeout(Duration::from_millis(200))
        .expect("expected backend command")
}

fn assert_no_cmd(rx: &Receiver<CoreCmd>) {
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

/// Issue a fetch and answer it with `items`.
fn load_snippets(harness: &mut TestHarness, items: Vec<Snippet>) {
    harness.store.fetch_snippets();
    let ticket = match recv_cmd(&harness.cmd_rx) {
        CoreCmd::FetchSnippets { ticket, .. } => ticket,
        other => panic!("unexpected command: {:?}", other),
    };
    harness.store.apply_event(CoreEvent::SnippetsLoaded {
        plan: FetchPlan::All,
        ticket,
        items,
    });
}

fn load_categories(harness: &mut TestHarness, items: Vec<Category>) {
    harness
        .store
        .apply_event(CoreEvent::CategoriesLoaded { items });
}

fn load_tags(harness: &mut TestHarness, items: Vec<Tag>) {
    harness.store.apply_event(CoreEvent::TagsLoaded { items });
}

/// Consume the fetch a view change issues and return its plan.
fn take_fetch_plan(harness: &TestHarness) -> FetchPlan {
    match recv_cmd(&harness.cmd_rx) {
        CoreCmd::FetchSnippets { plan, .. } => plan,
        other => panic!("unexpected command: {:?}", other),
    }
}

fn visible_ids(store: &Store) -> Vec<&str> {
    store
        .visible_snippets()
        .into_iter()
        .map(|snippet| snippet.id.as_str())
        .collect()
}

fn error_event(source: CoreErrorSource, message: &str) -> CoreEvent {
    CoreEvent::Error {
        source,
        message: message.to_string(),
    }
}
