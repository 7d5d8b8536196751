//! Snippet actions and editor/view UI actions.

use super::{EditorMode, Store};
use crate::backend::CoreCmd;
use snipvault_core::models::{BatchOperation, BatchRequest, SnippetDraft, UpdateSnippetRequest};
use snipvault_core::view::{ViewKind, ViewSelection};
use snipvault_core::CoreError;
use tracing::debug;

impl Store {
    /// Surface a local validation or consistency failure; nothing is sent.
    pub(super) fn reject(&mut self, err: CoreError) -> bool {
        self.report_error(err.to_string());
        false
    }

    /// Validate `draft` and create it, creating unknown tags first.
    ///
    /// Returns `true` when the request was handed to the backend.
    pub fn create_snippet(&mut self, draft: &SnippetDraft) -> bool {
        let request = match draft.validate(!self.categories.is_empty()) {
            Ok(request) => request,
            Err(err) => return self.reject(err),
        };
        if let Some(category_id) = request.category_id.as_deref() {
            if !self.categories.is_empty() && !self.category_index.contains(category_id) {
                return self.reject(CoreError::CategoryNotFound(category_id.to_string()));
            }
        }
        for name in &request.tags {
            self.create_tag(name);
        }
        self.dispatch(CoreCmd::CreateSnippet { request }, "Create snippet")
    }

    pub fn update_snippet(&mut self, id: &str, patch: UpdateSnippetRequest) -> bool {
        if self.snippet(id).is_none() {
            return self.reject(CoreError::SnippetNotFound(id.to_string()));
        }
        if let Err(err) = patch.validate() {
            return self.reject(err);
        }
        let request = patch.normalized();
        if let Some(tags) = request.tags.as_ref() {
            for name in tags {
                self.create_tag(name);
            }
        }
        self.dispatch(
            CoreCmd::UpdateSnippet {
                id: id.to_string(),
                request,
            },
            "Update snippet",
        )
    }

    /// Soft delete into the recycle bin.
    pub fn delete_snippet(&mut self, id: &str) -> bool {
        self.dispatch(CoreCmd::DeleteSnippet { id: id.to_string() }, "Delete snippet")
    }

    pub fn restore_snippet(&mut self, id: &str) -> bool {
        self.dispatch(
            CoreCmd::RestoreSnippet { id: id.to_string() },
            "Restore snippet",
        )
    }

    pub fn permanent_delete_snippet(&mut self, id: &str) -> bool {
        self.dispatch(
            CoreCmd::PermanentDeleteSnippet { id: id.to_string() },
            "Permanent delete",
        )
    }

    /// Flip the favorite flag now and persist it in the background.
    ///
    /// A failure restores the flag to its value before this toggle, unless a
    /// newer toggle for the same snippet has been issued since.
    pub fn toggle_favorite(&mut self, id: &str) -> bool {
        let Some(previous) = self.snippet(id).map(|snippet| snippet.is_favorite) else {
            return self.reject(CoreError::SnippetNotFound(id.to_string()));
        };
        self.set_local_favorite(id, !previous);
        let seq = self.favorites.begin(id, previous);
        self.refresh_visible();

        let sent = self.dispatch(
            CoreCmd::SetFavorite {
                id: id.to_string(),
                is_favorite: !previous,
                seq,
            },
            "Favorite",
        );
        if !sent {
            if let Some(previous) = self.favorites.fail(id, seq) {
                self.set_local_favorite(id, previous);
                self.refresh_visible();
            }
        }
        sent
    }

    /// Apply one operation to several snippets at once.
    pub fn batch(&mut self, operation: BatchOperation, ids: &[String]) -> bool {
        if ids.is_empty() {
            debug!("skipping empty batch {:?}", operation);
            return false;
        }
        self.dispatch(
            CoreCmd::Batch {
                request: BatchRequest {
                    operation,
                    snippet_ids: ids.to_vec(),
                },
            },
            "Batch",
        )
    }

    /// Switch the view; pending search state is reset and the list refetched.
    pub fn set_current_view(&mut self, kind: ViewKind, id: Option<String>) {
        let view = ViewSelection::new(kind, id);
        if self.editor_mode == EditorMode::Edit {
            self.editor_mode = EditorMode::View;
        }
        self.view = view;
        self.search.cancel();
        self.search_last_sent = None;
        self.refresh_visible();
        self.fetch_snippets();
    }

    /// Select `id`, or clear the selection with `None`.
    pub fn select_snippet(&mut self, id: Option<&str>) {
        self.selected_snippet_id = id.map(str::to_string);
        if self.editor_mode == EditorMode::Create {
            self.editor_mode = EditorMode::View;
        }
    }

    pub fn set_editor_mode(&mut self, mode: EditorMode) {
        self.editor_mode = mode;
        if mode == EditorMode::Create {
            self.selected_snippet_id = None;
        }
    }

    /// Open an empty form; selection stays clear until the create lands.
    pub fn start_create_snippet(&mut self) {
        self.set_editor_mode(EditorMode::Create);
    }

    /// Leave edit or create mode and put the selection back on the list.
    pub fn cancel_edit(&mut self) {
        self.editor_mode = EditorMode::View;
        self.refresh_visible();
    }

    /// Form contents for the current editor mode: the selected snippet while
    /// editing, an empty draft in the default category while creating.
    pub fn editor_draft(&self) -> Option<SnippetDraft> {
        match self.editor_mode {
            EditorMode::View => None,
            EditorMode::Edit => self.selected_snippet().map(SnippetDraft::from_snippet),
            EditorMode::Create => Some(SnippetDraft {
                category_id: self.default_category_for_new_snippet(),
                ..SnippetDraft::default()
            }),
        }
    }

    /// Category preselected in a new snippet form.
    pub fn default_category_for_new_snippet(&self) -> Option<String> {
        self.view
            .category_id()
            .filter(|id| self.category_index.contains(id))
            .or_else(|| self.categories.first().map(|category| category.id.as_str()))
            .map(str::to_string)
    }
}
