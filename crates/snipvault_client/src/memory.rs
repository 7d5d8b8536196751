//! In-process [`SnippetApi`] that mirrors the service's semantics over plain
//! collections. Calls are recorded and individual operations can be made to
//! fail, which is what backend and headless store tests drive.

use crate::{ApiError, SnippetApi};
use snipvault_core::models::{
    tag_key, BatchOperation, BatchRequest, BatchResult, Category, Collection, CreateCategoryRequest,
    CreateCollectionRequest, CreateSnippetRequest, Snippet, Tag, UpdateCategoryRequest,
    UpdateCollectionRequest, UpdateSnippetRequest,
};
use snipvault_core::view::SnippetFilters;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    snippets: Vec<Snippet>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    collections: Vec<Collection>,
    memberships: Vec<(String, String)>,
    failing: HashSet<&'static str>,
    calls: Vec<&'static str>,
}

/// Shared in-memory snippet service.
#[derive(Default)]
pub struct MemoryApi {
    state: Mutex<MemoryState>,
}

fn text_matches(snippet: &Snippet, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    snippet.title.to_lowercase().contains(&needle)
        || snippet
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(&needle))
        || snippet.code.to_lowercase().contains(&needle)
}

impl MemoryState {
    fn snippet_mut(&mut self, id: &str) -> Result<&mut Snippet, ApiError> {
        self.snippets
            .iter_mut()
            .find(|snippet| snippet.id == id)
            .ok_or_else(|| ApiError::not_found("Snippet", id))
    }

    fn filtered(&self, filters: &SnippetFilters, query: Option<&str>) -> Vec<Snippet> {
        let deleted = filters.deleted.unwrap_or(false);
        let tag_name = filters.tag.clone().or_else(|| {
            filters.tag_id.as_deref().and_then(|tag_id| {
                self.tags
                    .iter()
                    .find(|tag| tag.id == tag_id)
                    .map(|tag| tag.name.clone())
            })
        });
        self.snippets
            .iter()
            .filter(|snippet| snippet.is_deleted == deleted)
            .filter(|snippet| filters.favorite.map_or(true, |fav| snippet.is_favorite == fav))
            .filter(|snippet| filters.language.map_or(true, |lang| snippet.language == lang))
            .filter(|snippet| {
                filters
                    .category_id
                    .as_deref()
                    .map_or(true, |id| snippet.category_id.as_deref() == Some(id))
            })
            .filter(|snippet| tag_name.as_deref().map_or(true, |name| snippet.has_tag(name)))
            .filter(|snippet| {
                filters
                    .search
                    .as_deref()
                    .or(query)
                    .map_or(true, |needle| text_matches(snippet, needle))
            })
            .cloned()
            .collect()
    }

    fn ensure_tag(&mut self, name: &str) {
        if !self.tags.iter().any(|tag| tag.same_name(name)) {
            self.tags.push(Tag::new(name));
        }
    }

    fn refresh_counts(&mut self) {
        let live: Vec<&Snippet> = self.snippets.iter().filter(|s| !s.is_deleted).collect();
        for category in self.categories.iter_mut() {
            category.snippet_count = live
                .iter()
                .filter(|snippet| snippet.category_id.as_deref() == Some(category.id.as_str()))
                .count();
        }
        for tag in self.tags.iter_mut() {
            tag.snippet_count = live.iter().filter(|snippet| snippet.has_tag(&tag.name)).count();
        }
    }
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record `op` and fail it when it was marked with [`Self::fail`].
    fn enter(&self, op: &'static str) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        let mut state = self.lock();
        state.calls.push(op);
        if state.failing.contains(op) {
            return Err(ApiError::Unavailable(format!("{} failed", op)));
        }
        Ok(state)
    }

    /// Make every later call to `op` (e.g. `"set_favorite"`) fail.
    pub fn fail(&self, op: &'static str) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        self.lock().failing.remove(op);
    }

    /// Operation names in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn seed_snippet(&self, snippet: Snippet) {
        let mut state = self.lock();
        for tag in snippet.tags.clone() {
            state.ensure_tag(&tag);
        }
        state.snippets.push(snippet);
        state.refresh_counts();
    }

    pub fn seed_category(&self, category: Category) {
        let mut state = self.lock();
        state.categories.push(category);
        state.refresh_counts();
    }

    pub fn seed_tag(&self, tag: Tag) {
        let mut state = self.lock();
        state.tags.push(tag);
        state.refresh_counts();
    }

    /// Stored copy of a snippet, deleted or not.
    pub fn snippet(&self, id: &str) -> Option<Snippet> {
        self.lock()
            .snippets
            .iter()
            .find(|snippet| snippet.id == id)
            .cloned()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }
}

impl SnippetApi for MemoryApi {
    fn list_snippets(&self, filters: &SnippetFilters) -> Result<Vec<Snippet>, ApiError> {
        Ok(self.enter("list_snippets")?.filtered(filters, None))
    }

    fn search_snippets(
        &self,
        query: &str,
        filters: &SnippetFilters,
    ) -> Result<Vec<Snippet>, ApiError> {
        Ok(self.enter("search_snippets")?.filtered(filters, Some(query)))
    }

    fn favorite_snippets(&self) -> Result<Vec<Snippet>, ApiError> {
        let filters = SnippetFilters {
            favorite: Some(true),
            ..SnippetFilters::default()
        };
        Ok(self.enter("favorite_snippets")?.filtered(&filters, None))
    }

    fn recycle_bin(&self) -> Result<Vec<Snippet>, ApiError> {
        let filters = SnippetFilters {
            deleted: Some(true),
            ..SnippetFilters::default()
        };
        Ok(self.enter("recycle_bin")?.filtered(&filters, None))
    }

    fn get_snippet(&self, id: &str) -> Result<Snippet, ApiError> {
        let mut state = self.enter("get_snippet")?;
        Ok(state.snippet_mut(id)?.clone())
    }

    fn create_snippet(&self, request: &CreateSnippetRequest) -> Result<Snippet, ApiError> {
        let mut state = self.enter("create_snippet")?;
        let snippet = Snippet::from_request(request);
        for tag in &snippet.tags {
            state.ensure_tag(tag);
        }
        state.snippets.push(snippet.clone());
        state.refresh_counts();
        Ok(snippet)
    }

    fn update_snippet(
        &self,
        id: &str,
        request: &UpdateSnippetRequest,
    ) -> Result<Snippet, ApiError> {
        let mut state = self.enter("update_snippet")?;
        let snippet = state.snippet_mut(id)?;
        snippet.apply_update(request);
        let updated = snippet.clone();
        for tag in &updated.tags {
            state.ensure_tag(tag);
        }
        state.refresh_counts();
        Ok(updated)
    }

    fn delete_snippet(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.enter("delete_snippet")?;
        state.snippet_mut(id)?.is_deleted = true;
        state.refresh_counts();
        Ok(())
    }

    fn restore_snippet(&self, id: &str) -> Result<Snippet, ApiError> {
        let mut state = self.enter("restore_snippet")?;
        let snippet = state.snippet_mut(id)?;
        snippet.is_deleted = false;
        let restored = snippet.clone();
        state.refresh_counts();
        Ok(restored)
    }

    fn permanent_delete_snippet(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.enter("permanent_delete_snippet")?;
        state.snippet_mut(id)?;
        state.snippets.retain(|snippet| snippet.id != id);
        state.memberships.retain(|(_, snippet_id)| snippet_id != id);
        state.refresh_counts();
        Ok(())
    }

    fn set_favorite(&self, id: &str, is_favorite: bool) -> Result<Snippet, ApiError> {
        let mut state = self.enter("set_favorite")?;
        let snippet = state.snippet_mut(id)?;
        snippet.is_favorite = is_favorite;
        Ok(snippet.clone())
    }

    fn batch(&self, request: &BatchRequest) -> Result<BatchResult, ApiError> {
        let mut state = self.enter("batch")?;
        let ids: HashSet<&str> = request.snippet_ids.iter().map(String::as_str).collect();
        let count = state
            .snippets
            .iter()
            .filter(|snippet| ids.contains(snippet.id.as_str()))
            .count();
        match request.operation {
            BatchOperation::PermanentDelete => {
                state
                    .snippets
                    .retain(|snippet| !ids.contains(snippet.id.as_str()));
            }
            operation => {
                for snippet in state
                    .snippets
                    .iter_mut()
                    .filter(|snippet| ids.contains(snippet.id.as_str()))
                {
                    match operation {
                        BatchOperation::Delete => snippet.is_deleted = true,
                        BatchOperation::Restore => snippet.is_deleted = false,
                        BatchOperation::Favorite => snippet.is_favorite = true,
                        BatchOperation::Unfavorite => snippet.is_favorite = false,
                        BatchOperation::PermanentDelete => {}
                    }
                }
            }
        }
        state.refresh_counts();
        Ok(BatchResult {
            success: true,
            count,
        })
    }

    fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        Ok(self.enter("list_categories")?.categories.clone())
    }

    fn create_category(&self, request: &CreateCategoryRequest) -> Result<Category, ApiError> {
        let mut state = self.enter("create_category")?;
        if let Some(parent_id) = request.parent_id.as_deref() {
            if !state.categories.iter().any(|category| category.id == parent_id) {
                return Err(ApiError::not_found("Category", parent_id));
            }
        }
        let mut category = Category::with_parent(request.name.clone(), request.parent_id.clone());
        category.description = request.description.clone();
        state.categories.push(category.clone());
        Ok(category)
    }

    fn update_category(
        &self,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, ApiError> {
        let mut state = self.enter("update_category")?;
        let category = state
            .categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or_else(|| ApiError::not_found("Category", id))?;
        category.apply_update(request);
        Ok(category.clone())
    }

    fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.enter("delete_category")?;
        if !state.categories.iter().any(|category| category.id == id) {
            return Err(ApiError::not_found("Category", id));
        }
        state.categories.retain(|category| category.id != id);
        for category in state.categories.iter_mut() {
            if category.parent_id.as_deref() == Some(id) {
                category.parent_id = None;
            }
        }
        for snippet in state.snippets.iter_mut() {
            if snippet.category_id.as_deref() == Some(id) {
                snippet.category_id = None;
            }
        }
        Ok(())
    }

    fn category_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError> {
        let filters = SnippetFilters {
            category_id: Some(id.to_string()),
            ..SnippetFilters::default()
        };
        Ok(self.enter("category_snippets")?.filtered(&filters, None))
    }

    fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        Ok(self.enter("list_tags")?.tags.clone())
    }

    fn create_tag(&self, name: &str) -> Result<Tag, ApiError> {
        let mut state = self.enter("create_tag")?;
        if state.tags.iter().any(|tag| tag.same_name(name)) {
            return Err(ApiError::conflict(format!(
                "Tag with name '{}' already exists",
                name
            )));
        }
        let tag = Tag::new(name);
        state.tags.push(tag.clone());
        Ok(tag)
    }

    fn rename_tag(&self, id: &str, name: &str) -> Result<Tag, ApiError> {
        let mut state = self.enter("rename_tag")?;
        if state
            .tags
            .iter()
            .any(|tag| tag.id != id && tag.same_name(name))
        {
            return Err(ApiError::conflict(format!(
                "Tag with name '{}' already exists",
                name
            )));
        }
        let tag = state
            .tags
            .iter_mut()
            .find(|tag| tag.id == id)
            .ok_or_else(|| ApiError::not_found("Tag", id))?;
        let old_key = tag_key(&std::mem::replace(&mut tag.name, name.to_string()));
        let renamed = tag.clone();
        for snippet in state.snippets.iter_mut() {
            for tag in snippet.tags.iter_mut() {
                if tag_key(tag) == old_key {
                    *tag = name.to_string();
                }
            }
        }
        Ok(renamed)
    }

    fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.enter("delete_tag")?;
        let Some(position) = state.tags.iter().position(|tag| tag.id == id) else {
            return Err(ApiError::not_found("Tag", id));
        };
        let removed_key = tag_key(&state.tags.remove(position).name);
        for snippet in state.snippets.iter_mut() {
            snippet.tags.retain(|tag| tag_key(tag) != removed_key);
        }
        Ok(())
    }

    fn tag_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError> {
        let state = self.enter("tag_snippets")?;
        if !state.tags.iter().any(|tag| tag.id == id) {
            return Err(ApiError::not_found("Tag", id));
        }
        let filters = SnippetFilters {
            tag_id: Some(id.to_string()),
            ..SnippetFilters::default()
        };
        Ok(state.filtered(&filters, None))
    }

    fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        Ok(self.enter("list_collections")?.collections.clone())
    }

    fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> Result<Collection, ApiError> {
        let mut state = self.enter("create_collection")?;
        let collection = Collection::new(request.name.clone(), request.description.clone());
        state.collections.push(collection.clone());
        Ok(collection)
    }

    fn update_collection(
        &self,
        id: &str,
        request: &UpdateCollectionRequest,
    ) -> Result<Collection, ApiError> {
        let mut state = self.enter("update_collection")?;
        let collection = state
            .collections
            .iter_mut()
            .find(|collection| collection.id == id)
            .ok_or_else(|| ApiError::not_found("Collection", id))?;
        collection.apply_update(request);
        Ok(collection.clone())
    }

    fn delete_collection(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.enter("delete_collection")?;
        if !state.collections.iter().any(|collection| collection.id == id) {
            return Err(ApiError::not_found("Collection", id));
        }
        state.collections.retain(|collection| collection.id != id);
        state
            .memberships
            .retain(|(collection_id, _)| collection_id != id);
        Ok(())
    }

    fn collection_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError> {
        let state = self.enter("collection_snippets")?;
        let members: HashSet<&str> = state
            .memberships
            .iter()
            .filter(|(collection_id, _)| collection_id == id)
            .map(|(_, snippet_id)| snippet_id.as_str())
            .collect();
        Ok(state
            .snippets
            .iter()
            .filter(|snippet| !snippet.is_deleted && members.contains(snippet.id.as_str()))
            .cloned()
            .collect())
    }

    fn add_to_collection(&self, collection_id: &str, snippet_id: &str) -> Result<(), ApiError> {
        let mut state = self.enter("add_to_collection")?;
        if !state
            .collections
            .iter()
            .any(|collection| collection.id == collection_id)
        {
            return Err(ApiError::not_found("Collection", collection_id));
        }
        state.snippet_mut(snippet_id)?;
        let membership = (collection_id.to_string(), snippet_id.to_string());
        if !state.memberships.contains(&membership) {
            state.memberships.push(membership);
        }
        Ok(())
    }

    fn remove_from_collection(
        &self,
        collection_id: &str,
        snippet_id: &str,
    ) -> Result<(), ApiError> {
        let mut state = self.enter("remove_from_collection")?;
        state
            .memberships
            .retain(|(c, s)| !(c == collection_id && s == snippet_id));
        Ok(())
    }
}
