//! Snippet command handlers for the backend worker.

use super::WorkerState;
use crate::backend::{CoreErrorSource, CoreEvent};
use snipvault_core::models::{BatchRequest, CreateSnippetRequest, UpdateSnippetRequest};
use snipvault_core::view::FetchPlan;
use std::time::Instant;

pub(super) fn handle_fetch(state: &mut WorkerState, plan: FetchPlan, ticket: u64) {
    let started = Instant::now();
    match state.api.fetch(&plan) {
        Ok(items) => {
            state.log_perf("fetch", started, Some(items.len()));
            state.send(CoreEvent::SnippetsLoaded {
                plan,
                ticket,
                items,
            });
        }
        Err(err) => state.fail("Load snippets", CoreErrorSource::Fetch { ticket }, err),
    }
}

pub(super) fn handle_create(state: &mut WorkerState, request: CreateSnippetRequest) {
    let started = Instant::now();
    match state.api.create_snippet(&request) {
        Ok(snippet) => {
            state.log_perf("create", started, None);
            state.send(CoreEvent::SnippetCreated { snippet });
        }
        Err(err) => state.fail("Create snippet", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_update(state: &mut WorkerState, id: String, request: UpdateSnippetRequest) {
    let started = Instant::now();
    match state.api.update_snippet(&id, &request) {
        Ok(snippet) => {
            state.log_perf("update", started, None);
            state.send(CoreEvent::SnippetSaved { snippet });
        }
        Err(err) => state.fail("Update snippet", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_delete(state: &mut WorkerState, id: String) {
    match state.api.delete_snippet(&id) {
        Ok(()) => state.send(CoreEvent::SnippetDeleted { id }),
        Err(err) => state.fail("Delete snippet", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_restore(state: &mut WorkerState, id: String) {
    match state.api.restore_snippet(&id) {
        Ok(snippet) => state.send(CoreEvent::SnippetRestored { snippet }),
        Err(err) => state.fail("Restore snippet", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_purge(state: &mut WorkerState, id: String) {
    match state.api.permanent_delete_snippet(&id) {
        Ok(()) => state.send(CoreEvent::SnippetPurged { id }),
        Err(err) => state.fail("Permanent delete", CoreErrorSource::Other, err),
    }
}

pub(super) fn handle_set_favorite(state: &mut WorkerState, id: String, is_favorite: bool, seq: u64) {
    match state.api.set_favorite(&id, is_favorite) {
        Ok(snippet) => state.send(CoreEvent::FavoriteSaved { snippet, seq }),
        Err(err) => state.fail("Favorite", CoreErrorSource::Favorite { id, seq }, err),
    }
}

pub(super) fn handle_batch(state: &mut WorkerState, request: BatchRequest) {
    let started = Instant::now();
    match state.api.batch(&request) {
        Ok(result) if result.success => {
            state.log_perf("batch", started, Some(result.count));
            state.send(CoreEvent::BatchApplied {
                operation: request.operation,
                ids: request.snippet_ids,
                count: result.count,
            });
        }
        Ok(_) => state.fail(
            "Batch",
            CoreErrorSource::Other,
            snipvault_client::ApiError::Rejected("batch operation"),
        ),
        Err(err) => state.fail("Batch", CoreErrorSource::Other, err),
    }
}
