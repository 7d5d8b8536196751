//! Protocol types for the backend worker.

use snipvault_core::models::{
    BatchOperation, BatchRequest, Category, Collection, CreateCategoryRequest,
    CreateCollectionRequest, CreateSnippetRequest, Snippet, Tag, UpdateCategoryRequest,
    UpdateCollectionRequest, UpdateSnippetRequest,
};
use snipvault_core::view::FetchPlan;

/// Commands issued by the store for the backend worker to execute.
///
/// Every command is answered by exactly one [`CoreEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum CoreCmd {
    /// Load the snippet list for a derived plan; `ticket` identifies the request.
    FetchSnippets { plan: FetchPlan, ticket: u64 },
    FetchCategories,
    FetchTags,
    FetchCollections,
    CreateSnippet { request: CreateSnippetRequest },
    UpdateSnippet {
        id: String,
        request: UpdateSnippetRequest,
    },
    /// Soft delete into the recycle bin.
    DeleteSnippet { id: String },
    RestoreSnippet { id: String },
    PermanentDeleteSnippet { id: String },
    /// Persist an optimistic favorite flip; `seq` orders toggles per snippet.
    SetFavorite {
        id: String,
        is_favorite: bool,
        seq: u64,
    },
    Batch { request: BatchRequest },
    CreateCategory { request: CreateCategoryRequest },
    UpdateCategory {
        id: String,
        request: UpdateCategoryRequest,
    },
    DeleteCategory { id: String },
    CreateTag { name: String },
    RenameTag { id: String, name: String },
    DeleteTag { id: String },
    CreateCollection { request: CreateCollectionRequest },
    UpdateCollection {
        id: String,
        request: UpdateCollectionRequest,
    },
    DeleteCollection { id: String },
    AddToCollection {
        collection_id: String,
        snippet_id: String,
    },
    RemoveFromCollection {
        collection_id: String,
        snippet_id: String,
    },
}

/// Identifies which request a backend error belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreErrorSource {
    Fetch { ticket: u64 },
    Favorite { id: String, seq: u64 },
    TagCreate { name: String },
    Other,
}

/// Events produced by the backend worker and polled by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    SnippetsLoaded {
        plan: FetchPlan,
        ticket: u64,
        items: Vec<Snippet>,
    },
    CategoriesLoaded { items: Vec<Category> },
    TagsLoaded { items: Vec<Tag> },
    CollectionsLoaded { items: Vec<Collection> },
    SnippetCreated { snippet: Snippet },
    /// An update returned the stored snippet.
    SnippetSaved { snippet: Snippet },
    SnippetDeleted { id: String },
    SnippetRestored { snippet: Snippet },
    SnippetPurged { id: String },
    FavoriteSaved { snippet: Snippet, seq: u64 },
    BatchApplied {
        operation: BatchOperation,
        ids: Vec<String>,
        count: usize,
    },
    CategorySaved { category: Category },
    CategoryDeleted { id: String },
    TagCreated { tag: Tag },
    TagSaved { tag: Tag },
    TagDeleted { id: String },
    CollectionSaved { collection: Collection },
    CollectionDeleted { id: String },
    CollectionMembershipChanged {
        collection_id: String,
        snippet_id: String,
        member: bool,
    },
    /// A backend call failed; `message` is ready to show.
    Error {
        source: CoreErrorSource,
        message: String,
    },
}
