//! Category, tag, and collection actions and their local reconciliation.

use super::Store;
use crate::backend::CoreCmd;
use snipvault_core::category_tree::can_move_under;
use snipvault_core::models::{
    tag_key, CreateCategoryRequest, CreateCollectionRequest, Tag, UpdateCategoryRequest,
    UpdateCollectionRequest,
};
use snipvault_core::view::ViewKind;
use snipvault_core::CoreError;
use tracing::debug;

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Store {
    pub fn create_category(
        &mut self,
        name: &str,
        description: Option<String>,
        parent_id: Option<String>,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return self.reject(CoreError::MissingField("Name"));
        }
        let parent_id = blank_to_none(parent_id);
        if let Some(parent) = parent_id.as_deref() {
            if !self.category_index.contains(parent) {
                return self.reject(CoreError::CategoryNotFound(parent.to_string()));
            }
        }
        self.dispatch(
            CoreCmd::CreateCategory {
                request: CreateCategoryRequest {
                    name: name.to_string(),
                    description: blank_to_none(description),
                    parent_id,
                },
            },
            "Create category",
        )
    }

    /// Rename, describe, or re-parent a category.
    ///
    /// A new parent must exist and must not be the category itself or one of
    /// its descendants; violations are rejected without contacting the server.
    pub fn update_category(&mut self, id: &str, mut patch: UpdateCategoryRequest) -> bool {
        let Some(name) = self
            .categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| category.name.clone())
        else {
            return self.reject(CoreError::CategoryNotFound(id.to_string()));
        };
        if let Some(new_name) = patch.name.as_mut() {
            *new_name = new_name.trim().to_string();
            if new_name.is_empty() {
                return self.reject(CoreError::MissingField("Name"));
            }
        }
        if let Some(Some(parent)) = patch.new_parent() {
            if parent != id && !self.category_index.contains(parent) {
                return self.reject(CoreError::CategoryNotFound(parent.to_string()));
            }
            if !can_move_under(&self.categories, id, parent) {
                return self.reject(CoreError::CyclicMove(name));
            }
        }
        self.dispatch(
            CoreCmd::UpdateCategory {
                id: id.to_string(),
                request: patch,
            },
            "Update category",
        )
    }

    /// Re-parent a category; `None` makes it a root.
    pub fn move_category(&mut self, id: &str, new_parent: Option<&str>) -> bool {
        self.update_category(id, UpdateCategoryRequest::move_to(new_parent.map(str::to_string)))
    }

    pub fn delete_category(&mut self, id: &str) -> bool {
        if !self.category_index.contains(id) {
            return self.reject(CoreError::CategoryNotFound(id.to_string()));
        }
        self.dispatch(
            CoreCmd::DeleteCategory { id: id.to_string() },
            "Delete category",
        )
    }

    /// Drop a deleted category, promote its children to roots, and detach
    /// its snippets.
    pub(super) fn apply_category_deleted(&mut self, id: &str) {
        self.categories.retain(|category| category.id != id);
        for category in &mut self.categories {
            if category.parent_id.as_deref() == Some(id) {
                category.parent_id = None;
            }
        }
        for snippet in &mut self.snippets {
            if snippet.category_id.as_deref() == Some(id) {
                snippet.category_id = None;
            }
        }
        self.rebuild_category_index();
        if self.view.category_id() == Some(id) {
            debug!("viewed category {} deleted; falling back to all", id);
            self.set_current_view(ViewKind::All, None);
        } else {
            self.refresh_visible();
        }
    }

    /// Create a tag unless one with the same name (any case) exists or is
    /// already being created.
    pub fn create_tag(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return self.reject(CoreError::MissingField("Tag name"));
        }
        let key = tag_key(name);
        if self.tags.iter().any(|tag| tag.same_name(name)) || self.pending_tag_creates.contains(&key)
        {
            debug!("tag '{}' already exists; skipping create", name);
            return false;
        }
        let sent = self.dispatch(
            CoreCmd::CreateTag {
                name: name.to_string(),
            },
            "Create tag",
        );
        if sent {
            self.pending_tag_creates.insert(key);
        }
        sent
    }

    pub fn rename_tag(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return self.reject(CoreError::MissingField("Tag name"));
        }
        if !self.tags.iter().any(|tag| tag.id == id) {
            return self.reject(CoreError::TagNotFound(id.to_string()));
        }
        if self
            .tags
            .iter()
            .any(|tag| tag.id != id && tag.same_name(name))
        {
            return self.reject(CoreError::DuplicateTag(name.to_string()));
        }
        self.dispatch(
            CoreCmd::RenameTag {
                id: id.to_string(),
                name: name.to_string(),
            },
            "Rename tag",
        )
    }

    pub fn delete_tag(&mut self, id: &str) -> bool {
        if !self.tags.iter().any(|tag| tag.id == id) {
            return self.reject(CoreError::TagNotFound(id.to_string()));
        }
        self.dispatch(CoreCmd::DeleteTag { id: id.to_string() }, "Delete tag")
    }

    /// Store a renamed tag and rewrite the old name on every snippet.
    pub(super) fn apply_tag_saved(&mut self, tag: Tag) {
        let old_name = match self.tags.iter_mut().find(|item| item.id == tag.id) {
            Some(slot) => Some(std::mem::replace(slot, tag.clone()).name),
            None => {
                self.tags.push(tag.clone());
                None
            }
        };
        if let Some(old_name) = old_name.filter(|old| *old != tag.name) {
            let old_key = tag_key(&old_name);
            for snippet in &mut self.snippets {
                for name in &mut snippet.tags {
                    if tag_key(name) == old_key {
                        *name = tag.name.clone();
                    }
                }
            }
        }
        self.refresh_visible();
    }

    /// Remove a tag and strip its name from every snippet.
    pub(super) fn apply_tag_deleted(&mut self, id: &str) {
        let Some(position) = self.tags.iter().position(|tag| tag.id == id) else {
            return;
        };
        let removed = self.tags.remove(position);
        let removed_key = tag_key(&removed.name);
        for snippet in &mut self.snippets {
            snippet.tags.retain(|name| tag_key(name) != removed_key);
        }
        if self.view.tag_id() == Some(id) {
            debug!("viewed tag {} deleted; falling back to all", id);
            self.set_current_view(ViewKind::All, None);
        } else {
            self.refresh_visible();
        }
    }

    pub fn create_collection(&mut self, name: &str, description: Option<String>) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return self.reject(CoreError::MissingField("Name"));
        }
        self.dispatch(
            CoreCmd::CreateCollection {
                request: CreateCollectionRequest {
                    name: name.to_string(),
                    description: blank_to_none(description),
                },
            },
            "Create collection",
        )
    }

    pub fn update_collection(&mut self, id: &str, patch: UpdateCollectionRequest) -> bool {
        if !self.collections.iter().any(|collection| collection.id == id) {
            return self.reject(CoreError::CollectionNotFound(id.to_string()));
        }
        if matches!(patch.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return self.reject(CoreError::MissingField("Name"));
        }
        self.dispatch(
            CoreCmd::UpdateCollection {
                id: id.to_string(),
                request: patch,
            },
            "Update collection",
        )
    }

    pub fn delete_collection(&mut self, id: &str) -> bool {
        self.dispatch(
            CoreCmd::DeleteCollection { id: id.to_string() },
            "Delete collection",
        )
    }

    pub fn add_to_collection(&mut self, collection_id: &str, snippet_id: &str) -> bool {
        if !self
            .collections
            .iter()
            .any(|collection| collection.id == collection_id)
        {
            return self.reject(CoreError::CollectionNotFound(collection_id.to_string()));
        }
        self.dispatch(
            CoreCmd::AddToCollection {
                collection_id: collection_id.to_string(),
                snippet_id: snippet_id.to_string(),
            },
            "Add to collection",
        )
    }

    pub fn remove_from_collection(&mut self, collection_id: &str, snippet_id: &str) -> bool {
        self.dispatch(
            CoreCmd::RemoveFromCollection {
                collection_id: collection_id.to_string(),
                snippet_id: snippet_id.to_string(),
            },
            "Remove from collection",
        )
    }
}
