//! Background worker thread for API access.

use crate::backend::{CoreCmd, CoreErrorSource, CoreEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};
use snipvault_client::{ApiError, SnippetApi};
use snipvault_core::config::{env_flag_enabled, PERF_LOG_ENV};
use std::thread;
use std::time::Instant;
use tracing::{debug, error, info};

mod snippet;
mod taxonomy;

/// Handle for sending commands to, and receiving events from, the backend worker.
pub struct BackendHandle {
    pub cmd_tx: Sender<CoreCmd>,
    pub evt_rx: Receiver<CoreEvent>,
}

impl BackendHandle {
    /// Wrap caller-owned channels; tests drive the store without a worker.
    pub fn from_test_channels(cmd_tx: Sender<CoreCmd>, evt_rx: Receiver<CoreEvent>) -> Self {
        Self { cmd_tx, evt_rx }
    }
}

pub(super) struct WorkerState {
    pub(super) api: Box<dyn SnippetApi>,
    pub(super) evt_tx: Sender<CoreEvent>,
    perf_log: bool,
}

impl WorkerState {
    pub(super) fn send(&self, event: CoreEvent) {
        let _ = self.evt_tx.send(event);
    }

    /// Log and forward a failed call as [`CoreEvent::Error`].
    pub(super) fn fail(&self, action: &str, source: CoreErrorSource, err: ApiError) {
        error!("backend {} failed: {}", action.to_ascii_lowercase(), err);
        self.send(CoreEvent::Error {
            source,
            message: format!("{} failed: {}", action, err.user_message()),
        });
    }

    pub(super) fn log_perf(&self, op: &str, started: Instant, items: Option<usize>) {
        if !self.perf_log {
            return;
        }
        info!(
            target: "snipvault_state::backend_perf",
            op = op,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            items = items.unwrap_or(0),
            "backend call perf"
        );
    }
}

fn dispatch(state: &mut WorkerState, cmd: CoreCmd) {
    match cmd {
        CoreCmd::FetchSnippets { plan, ticket } => snippet::handle_fetch(state, plan, ticket),
        CoreCmd::CreateSnippet { request } => snippet::handle_create(state, request),
        CoreCmd::UpdateSnippet { id, request } => snippet::handle_update(state, id, request),
        CoreCmd::DeleteSnippet { id } => snippet::handle_delete(state, id),
        CoreCmd::RestoreSnippet { id } => snippet::handle_restore(state, id),
        CoreCmd::PermanentDeleteSnippet { id } => snippet::handle_purge(state, id),
        CoreCmd::SetFavorite {
            id,
            is_favorite,
            seq,
        } => snippet::handle_set_favorite(state, id, is_favorite, seq),
        CoreCmd::Batch { request } => snippet::handle_batch(state, request),
        CoreCmd::FetchCategories => taxonomy::handle_list_categories(state),
        CoreCmd::CreateCategory { request } => taxonomy::handle_create_category(state, request),
        CoreCmd::UpdateCategory { id, request } => {
            taxonomy::handle_update_category(state, id, request)
        }
        CoreCmd::DeleteCategory { id } => taxonomy::handle_delete_category(state, id),
        CoreCmd::FetchTags => taxonomy::handle_list_tags(state),
        CoreCmd::CreateTag { name } => taxonomy::handle_create_tag(state, name),
        CoreCmd::RenameTag { id, name } => taxonomy::handle_rename_tag(state, id, name),
        CoreCmd::DeleteTag { id } => taxonomy::handle_delete_tag(state, id),
        CoreCmd::FetchCollections => taxonomy::handle_list_collections(state),
        CoreCmd::CreateCollection { request } => {
            taxonomy::handle_create_collection(state, request)
        }
        CoreCmd::UpdateCollection { id, request } => {
            taxonomy::handle_update_collection(state, id, request)
        }
        CoreCmd::DeleteCollection { id } => taxonomy::handle_delete_collection(state, id),
        CoreCmd::AddToCollection {
            collection_id,
            snippet_id,
        } => taxonomy::handle_membership(state, collection_id, snippet_id, true),
        CoreCmd::RemoveFromCollection {
            collection_id,
            snippet_id,
        } => taxonomy::handle_membership(state, collection_id, snippet_id, false),
    }
}

/// Spawn the backend worker thread that performs blocking API calls.
///
/// Commands run in the order they were sent. The worker exits once every
/// command sender has been dropped.
///
/// # Returns
/// A [`BackendHandle`] containing the command sender and event receiver.
///
/// # Panics
/// Panics if the worker thread cannot be spawned.
pub fn spawn_backend(api: Box<dyn SnippetApi>) -> BackendHandle {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();

    thread::Builder::new()
        .name("snipvault-backend".to_string())
        .spawn(move || {
            let mut state = WorkerState {
                api,
                evt_tx,
                perf_log: env_flag_enabled(PERF_LOG_ENV),
            };
            for cmd in cmd_rx.iter() {
                debug!("backend command: {:?}", cmd);
                dispatch(&mut state, cmd);
            }
            debug!("backend command channel closed; worker exiting");
        })
        .expect("spawn backend worker");

    BackendHandle { cmd_tx, evt_rx }
}
