//! The application state store.
//!
//! A [`Store`] is owned by one thread. Actions validate locally, send a
//! [`CoreCmd`](crate::CoreCmd) to the backend, and return immediately; the
//! resulting events are folded back in by [`Store::poll_events`].

mod actions;
mod feedback;
mod optimistic;
mod search;
mod state_ops;
mod taxonomy;

pub use feedback::Notification;
pub use optimistic::Optimistic;
pub use search::SearchDebounce;

use crate::backend::{spawn_backend, BackendHandle};
use optimistic::FavoriteToggles;
use snipvault_client::SnippetApi;
use snipvault_core::category_tree::CategoryIndex;
use snipvault_core::models::{Category, Collection, Snippet, Tag};
use snipvault_core::view::ViewSelection;
use snipvault_core::Config;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;

/// What the editor pane is doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EditorMode {
    #[default]
    View,
    Edit,
    Create,
}

/// Snippet collections, view selection, and request bookkeeping.
pub struct Store {
    backend: BackendHandle,
    snippets: Vec<Snippet>,
    categories: Vec<Category>,
    category_index: CategoryIndex,
    tags: Vec<Tag>,
    collections: Vec<Collection>,
    view: ViewSelection,
    selected_snippet_id: Option<String>,
    editor_mode: EditorMode,
    search_query: String,
    search: SearchDebounce,
    /// Trimmed query of the last snippet fetch; `None` forces the next one.
    search_last_sent: Option<String>,
    fetch_ticket: u64,
    visible: Vec<String>,
    in_flight: usize,
    error: Option<String>,
    notifications: VecDeque<Notification>,
    favorites: FavoriteToggles,
    pending_tag_creates: HashSet<String>,
}

impl Store {
    /// Build a store around an existing backend handle.
    pub fn new(backend: BackendHandle, search_debounce: Duration) -> Self {
        Self {
            backend,
            snippets: Vec::new(),
            categories: Vec::new(),
            category_index: CategoryIndex::default(),
            tags: Vec::new(),
            collections: Vec::new(),
            view: ViewSelection::all(),
            selected_snippet_id: None,
            editor_mode: EditorMode::View,
            search_query: String::new(),
            search: SearchDebounce::new(search_debounce),
            search_last_sent: None,
            fetch_ticket: 0,
            visible: Vec::new(),
            in_flight: 0,
            error: None,
            notifications: VecDeque::new(),
            favorites: FavoriteToggles::default(),
            pending_tag_creates: HashSet::new(),
        }
    }

    /// Spawn a backend worker over `api` and build a store on top of it.
    pub fn connect(api: Box<dyn SnippetApi>, config: &Config) -> Self {
        Self::new(spawn_backend(api), config.search_debounce())
    }

    /// Issue the initial loads: categories, tags, collections, and snippets.
    pub fn bootstrap(&mut self) {
        self.fetch_categories();
        self.fetch_tags();
        self.fetch_collections();
        self.fetch_snippets();
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn snippet(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|snippet| snippet.id == id)
    }

    /// Snippets shown for the current view and search text, in list order.
    pub fn visible_snippets(&self) -> Vec<&Snippet> {
        self.visible
            .iter()
            .filter_map(|id| self.snippet(id))
            .collect()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_index(&self) -> &CategoryIndex {
        &self.category_index
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn view(&self) -> &ViewSelection {
        &self.view
    }

    pub fn selected_snippet_id(&self) -> Option<&str> {
        self.selected_snippet_id.as_deref()
    }

    pub fn selected_snippet(&self) -> Option<&Snippet> {
        self.selected_snippet_id
            .as_deref()
            .and_then(|id| self.snippet(id))
    }

    pub fn editor_mode(&self) -> EditorMode {
        self.editor_mode
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// `true` while any backend request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Optimistic state of the most recent favorite toggle for `id`.
    pub fn favorite_state(&self, id: &str) -> Option<&Optimistic<bool>> {
        self.favorites.state(id)
    }

    /// Heading for the current view.
    pub fn view_title(&self) -> String {
        snipvault_core::view::view_title(&self.view, &self.categories, &self.tags)
    }
}

#[cfg(test)]
mod tests;
