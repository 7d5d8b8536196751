//! Event reconciliation, request dispatch, and derived list state.

use super::{EditorMode, Store};
use crate::backend::{CoreCmd, CoreErrorSource, CoreEvent};
use snipvault_core::category_tree::CategoryIndex;
use snipvault_core::models::{tag_key, BatchOperation, Snippet};
use snipvault_core::view::{visible_snippets, FetchPlan, ViewSelection};
use std::time::{Duration, Instant};
use tracing::{debug, info};

impl Store {
    /// Send `cmd` to the backend and count it as in flight.
    ///
    /// `action` names the request in the failure message when the worker is gone.
    pub(super) fn dispatch(&mut self, cmd: CoreCmd, action: &str) -> bool {
        debug!("dispatch {}", action.to_ascii_lowercase());
        if self.backend.cmd_tx.send(cmd).is_err() {
            self.report_error(format!("{} failed: backend unavailable.", action));
            return false;
        }
        self.in_flight += 1;
        true
    }

    /// Apply every event the backend has produced so far; returns how many.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.backend.evt_rx.try_recv() {
            self.apply_event(event);
            applied += 1;
        }
        applied
    }

    /// Block until no request is in flight or `timeout` elapses.
    ///
    /// Returns `false` on timeout or when the worker hung up with requests
    /// still outstanding. Meant for headless callers; a UI polls instead.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.backend.evt_rx.recv_timeout(remaining) {
                Ok(event) => self.apply_event(event),
                Err(_) => return false,
            }
        }
        true
    }

    pub fn fetch_snippets(&mut self) {
        let view = self.view.clone();
        let search = self.search_query.clone();
        self.fetch_snippets_with(&view, &search);
    }

    /// Fetch the list for an explicit view and search text.
    ///
    /// Only the response to the most recent fetch is applied.
    pub fn fetch_snippets_with(&mut self, view: &ViewSelection, search: &str) {
        let plan = FetchPlan::derive(view, search);
        self.fetch_ticket += 1;
        let ticket = self.fetch_ticket;
        self.error = None;
        self.search_last_sent = Some(search.trim().to_string());
        debug!("fetch snippets ticket={} plan={:?}", ticket, plan);
        self.dispatch(CoreCmd::FetchSnippets { plan, ticket }, "Load snippets");
    }

    pub fn fetch_categories(&mut self) {
        self.dispatch(CoreCmd::FetchCategories, "Load categories");
    }

    pub fn fetch_tags(&mut self) {
        self.dispatch(CoreCmd::FetchTags, "Load tags");
    }

    pub fn fetch_collections(&mut self) {
        self.dispatch(CoreCmd::FetchCollections, "Load collections");
    }

    /// Fold one backend event into the store.
    pub fn apply_event(&mut self, event: CoreEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match event {
            CoreEvent::SnippetsLoaded {
                plan,
                ticket,
                items,
            } => {
                // Drop responses overtaken by a newer fetch.
                if ticket != self.fetch_ticket {
                    debug!(
                        "dropping stale snippet list ticket={} current={} plan={:?}",
                        ticket, self.fetch_ticket, plan
                    );
                    return;
                }
                self.snippets = items;
                self.refresh_visible();
            }
            CoreEvent::CategoriesLoaded { items } => {
                self.categories = items;
                self.rebuild_category_index();
            }
            CoreEvent::TagsLoaded { items } => {
                self.tags = items;
                self.refresh_visible();
            }
            CoreEvent::CollectionsLoaded { items } => {
                self.collections = items;
            }
            CoreEvent::SnippetCreated { snippet } => {
                let id = snippet.id.clone();
                self.upsert_snippet(snippet);
                self.selected_snippet_id = Some(id);
                self.editor_mode = EditorMode::View;
                self.refresh_visible();
            }
            CoreEvent::SnippetSaved { snippet } => {
                self.upsert_snippet(snippet);
                self.editor_mode = EditorMode::View;
                self.refresh_visible();
            }
            CoreEvent::SnippetDeleted { id } => {
                self.apply_local_delete(&id);
                self.refresh_visible();
            }
            CoreEvent::SnippetRestored { snippet } => {
                self.upsert_snippet(snippet);
                self.refresh_visible();
            }
            CoreEvent::SnippetPurged { id } => {
                self.apply_local_purge(&id);
                self.refresh_visible();
            }
            CoreEvent::FavoriteSaved { snippet, seq } => {
                if !self.favorites.is_latest(&snippet.id, seq) {
                    debug!("ignoring superseded favorite ack for {}", snippet.id);
                    return;
                }
                self.favorites.commit(&snippet.id, seq);
                self.upsert_snippet(snippet);
                self.refresh_visible();
            }
            CoreEvent::BatchApplied {
                operation,
                ids,
                count,
            } => {
                for id in &ids {
                    self.apply_batch_item(operation, id);
                }
                info!("batch {:?} applied to {} snippet(s)", operation, count);
                self.notify(format!("Updated {} snippet(s).", count));
                self.refresh_visible();
            }
            CoreEvent::CategorySaved { category } => {
                match self.categories.iter_mut().find(|item| item.id == category.id) {
                    Some(slot) => *slot = category,
                    None => self.categories.push(category),
                }
                self.rebuild_category_index();
            }
            CoreEvent::CategoryDeleted { id } => self.apply_category_deleted(&id),
            CoreEvent::TagCreated { tag } => {
                self.pending_tag_creates.remove(&tag_key(&tag.name));
                if !self.tags.iter().any(|existing| existing.id == tag.id) {
                    self.tags.push(tag);
                }
            }
            CoreEvent::TagSaved { tag } => self.apply_tag_saved(tag),
            CoreEvent::TagDeleted { id } => self.apply_tag_deleted(&id),
            CoreEvent::CollectionSaved { collection } => {
                match self
                    .collections
                    .iter_mut()
                    .find(|item| item.id == collection.id)
                {
                    Some(slot) => *slot = collection,
                    None => self.collections.push(collection),
                }
            }
            CoreEvent::CollectionDeleted { id } => {
                self.collections.retain(|collection| collection.id != id);
            }
            CoreEvent::CollectionMembershipChanged {
                collection_id,
                snippet_id,
                member,
            } => {
                let name = self
                    .collections
                    .iter()
                    .find(|collection| collection.id == collection_id)
                    .map(|collection| collection.name.clone())
                    .unwrap_or(collection_id);
                debug!("snippet {} member of {}: {}", snippet_id, name, member);
                if member {
                    self.notify(format!("Added to {}.", name));
                } else {
                    self.notify(format!("Removed from {}.", name));
                }
            }
            CoreEvent::Error { source, message } => self.apply_error(source, message),
        }
    }

    fn apply_error(&mut self, source: CoreErrorSource, message: String) {
        match source {
            CoreErrorSource::Fetch { ticket } => {
                if ticket != self.fetch_ticket {
                    debug!("dropping stale fetch error ticket={}: {}", ticket, message);
                    return;
                }
            }
            CoreErrorSource::Favorite { id, seq } => {
                if let Some(previous) = self.favorites.fail(&id, seq) {
                    self.set_local_favorite(&id, previous);
                    self.refresh_visible();
                }
            }
            CoreErrorSource::TagCreate { name } => {
                self.pending_tag_creates.remove(&tag_key(&name));
            }
            CoreErrorSource::Other => {}
        }
        self.report_error(message);
    }

    pub(super) fn upsert_snippet(&mut self, snippet: Snippet) {
        match self.snippets.iter_mut().find(|item| item.id == snippet.id) {
            Some(slot) => *slot = snippet,
            None => self.snippets.push(snippet),
        }
    }

    pub(super) fn set_local_favorite(&mut self, id: &str, is_favorite: bool) {
        if let Some(snippet) = self.snippets.iter_mut().find(|item| item.id == id) {
            snippet.is_favorite = is_favorite;
        }
    }

    /// Soft delete: the bin view drops the row, other views flag it.
    fn apply_local_delete(&mut self, id: &str) {
        if self.view.is_recycle_bin() {
            self.snippets.retain(|snippet| snippet.id != id);
        } else if let Some(snippet) = self.snippets.iter_mut().find(|item| item.id == id) {
            snippet.is_deleted = true;
        }
        self.favorites.forget(id);
        if self.selected_snippet_id.as_deref() == Some(id) {
            self.selected_snippet_id = None;
        }
    }

    fn apply_local_purge(&mut self, id: &str) {
        self.snippets.retain(|snippet| snippet.id != id);
        self.favorites.forget(id);
        if self.selected_snippet_id.as_deref() == Some(id) {
            self.selected_snippet_id = None;
        }
    }

    fn apply_batch_item(&mut self, operation: BatchOperation, id: &str) {
        match operation {
            BatchOperation::Delete => self.apply_local_delete(id),
            BatchOperation::PermanentDelete => self.apply_local_purge(id),
            BatchOperation::Restore => {
                if let Some(snippet) = self.snippets.iter_mut().find(|item| item.id == id) {
                    snippet.is_deleted = false;
                }
            }
            BatchOperation::Favorite | BatchOperation::Unfavorite => {
                self.favorites.forget(id);
                self.set_local_favorite(id, operation == BatchOperation::Favorite);
            }
        }
    }

    pub(super) fn rebuild_category_index(&mut self) {
        self.category_index = CategoryIndex::build(&self.categories);
    }

    /// Recompute the visible list, then repair the selection against it.
    pub(super) fn refresh_visible(&mut self) {
        self.visible = visible_snippets(&self.snippets, &self.view, &self.tags, &self.search_query)
            .into_iter()
            .map(|snippet| snippet.id.clone())
            .collect();
        self.ensure_selection_after_list_update();
    }

    /// Keep the selection inside the visible list; create mode is left alone.
    fn ensure_selection_after_list_update(&mut self) {
        if self.editor_mode == EditorMode::Create {
            return;
        }
        let selection_valid = self
            .selected_snippet_id
            .as_ref()
            .is_some_and(|id| self.visible.contains(id));
        if selection_valid {
            return;
        }
        let fallback = self.visible.first().cloned();
        if fallback != self.selected_snippet_id && self.editor_mode == EditorMode::Edit {
            self.editor_mode = EditorMode::View;
        }
        self.selected_snippet_id = fallback;
    }
}
