//! The API seam between the state layer and the snippet service.

use crate::ApiError;
use snipvault_core::models::{
    BatchRequest, BatchResult, Category, Collection, CreateCategoryRequest,
    CreateCollectionRequest, CreateSnippetRequest, Snippet, Tag, UpdateCategoryRequest,
    UpdateCollectionRequest, UpdateSnippetRequest,
};
use snipvault_core::view::{FetchPlan, SnippetFilters};
use std::sync::Arc;

/// Operations offered by the snippet REST service.
///
/// Calls are blocking; the state layer runs them on its backend worker
/// thread. Implementations must be shareable across threads.
pub trait SnippetApi: Send + Sync {
    fn list_snippets(&self, filters: &SnippetFilters) -> Result<Vec<Snippet>, ApiError>;
    fn search_snippets(
        &self,
        query: &str,
        filters: &SnippetFilters,
    ) -> Result<Vec<Snippet>, ApiError>;
    fn favorite_snippets(&self) -> Result<Vec<Snippet>, ApiError>;
    fn recycle_bin(&self) -> Result<Vec<Snippet>, ApiError>;
    fn get_snippet(&self, id: &str) -> Result<Snippet, ApiError>;
    fn create_snippet(&self, request: &CreateSnippetRequest) -> Result<Snippet, ApiError>;
    fn update_snippet(&self, id: &str, request: &UpdateSnippetRequest)
        -> Result<Snippet, ApiError>;
    /// Soft delete: the snippet moves to the recycle bin.
    fn delete_snippet(&self, id: &str) -> Result<(), ApiError>;
    fn restore_snippet(&self, id: &str) -> Result<Snippet, ApiError>;
    fn permanent_delete_snippet(&self, id: &str) -> Result<(), ApiError>;
    fn set_favorite(&self, id: &str, is_favorite: bool) -> Result<Snippet, ApiError>;
    fn batch(&self, request: &BatchRequest) -> Result<BatchResult, ApiError>;

    fn list_categories(&self) -> Result<Vec<Category>, ApiError>;
    fn create_category(&self, request: &CreateCategoryRequest) -> Result<Category, ApiError>;
    fn update_category(
        &self,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, ApiError>;
    fn delete_category(&self, id: &str) -> Result<(), ApiError>;
    fn category_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError>;

    fn list_tags(&self) -> Result<Vec<Tag>, ApiError>;
    fn create_tag(&self, name: &str) -> Result<Tag, ApiError>;
    fn rename_tag(&self, id: &str, name: &str) -> Result<Tag, ApiError>;
    fn delete_tag(&self, id: &str) -> Result<(), ApiError>;
    fn tag_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError>;

    fn list_collections(&self) -> Result<Vec<Collection>, ApiError>;
    fn create_collection(
        &self,
        request: &CreateCollectionRequest,
    ) -> Result<Collection, ApiError>;
    fn update_collection(
        &self,
        id: &str,
        request: &UpdateCollectionRequest,
    ) -> Result<Collection, ApiError>;
    fn delete_collection(&self, id: &str) -> Result<(), ApiError>;
    fn collection_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError>;
    fn add_to_collection(&self, collection_id: &str, snippet_id: &str) -> Result<(), ApiError>;
    fn remove_from_collection(
        &self,
        collection_id: &str,
        snippet_id: &str,
    ) -> Result<(), ApiError>;

    /// Execute a derived [`FetchPlan`] against the matching endpoint.
    fn fetch(&self, plan: &FetchPlan) -> Result<Vec<Snippet>, ApiError> {
        match plan {
            FetchPlan::All => self.list_snippets(&SnippetFilters::default()),
            FetchPlan::Favorites => self.favorite_snippets(),
            FetchPlan::RecycleBin => self.recycle_bin(),
            FetchPlan::Category(id) => self.category_snippets(id),
            FetchPlan::Tag(id) => self.tag_snippets(id),
            FetchPlan::Search { query, filters } => self.search_snippets(query, filters),
            FetchPlan::List { filters } => self.list_snippets(filters),
        }
    }
}

macro_rules! forward_snippet_api {
    ($($name:ident(&self $(, $arg:ident: $ty:ty)*) -> $ret:ty;)*) => {
        $(
            fn $name(&self $(, $arg: $ty)*) -> $ret {
                (**self).$name($($arg),*)
            }
        )*
    };
}

impl<T: SnippetApi + ?Sized> SnippetApi for Arc<T> {
    forward_snippet_api! {
        list_snippets(&self, filters: &SnippetFilters) -> Result<Vec<Snippet>, ApiError>;
        search_snippets(&self, query: &str, filters: &SnippetFilters) -> Result<Vec<Snippet>, ApiError>;
        favorite_snippets(&self) -> Result<Vec<Snippet>, ApiError>;
        recycle_bin(&self) -> Result<Vec<Snippet>, ApiError>;
        get_snippet(&self, id: &str) -> Result<Snippet, ApiError>;
        create_snippet(&self, request: &CreateSnippetRequest) -> Result<Snippet, ApiError>;
        update_snippet(&self, id: &str, request: &UpdateSnippetRequest) -> Result<Snippet, ApiError>;
        delete_snippet(&self, id: &str) -> Result<(), ApiError>;
        restore_snippet(&self, id: &str) -> Result<Snippet, ApiError>;
        permanent_delete_snippet(&self, id: &str) -> Result<(), ApiError>;
        set_favorite(&self, id: &str, is_favorite: bool) -> Result<Snippet, ApiError>;
        batch(&self, request: &BatchRequest) -> Result<BatchResult, ApiError>;
        list_categories(&self) -> Result<Vec<Category>, ApiError>;
        create_category(&self, request: &CreateCategoryRequest) -> Result<Category, ApiError>;
        update_category(&self, id: &str, request: &UpdateCategoryRequest) -> Result<Category, ApiError>;
        delete_category(&self, id: &str) -> Result<(), ApiError>;
        category_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError>;
        list_tags(&self) -> Result<Vec<Tag>, ApiError>;
        create_tag(&self, name: &str) -> Result<Tag, ApiError>;
        rename_tag(&self, id: &str, name: &str) -> Result<Tag, ApiError>;
        delete_tag(&self, id: &str) -> Result<(), ApiError>;
        tag_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError>;
        list_collections(&self) -> Result<Vec<Collection>, ApiError>;
        create_collection(&self, request: &CreateCollectionRequest) -> Result<Collection, ApiError>;
        update_collection(&self, id: &str, request: &UpdateCollectionRequest) -> Result<Collection, ApiError>;
        delete_collection(&self, id: &str) -> Result<(), ApiError>;
        collection_snippets(&self, id: &str) -> Result<Vec<Snippet>, ApiError>;
        add_to_collection(&self, collection_id: &str, snippet_id: &str) -> Result<(), ApiError>;
        remove_from_collection(&self, collection_id: &str, snippet_id: &str) -> Result<(), ApiError>;
    }
}
