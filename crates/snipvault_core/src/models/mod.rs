//! Data models for snippets, categories, tags, and collections.
//!
//! All wire types serialize with camelCase keys to match the REST service.

pub mod category;
pub mod collection;
pub mod language;
pub mod snippet;
pub mod tag;

pub use category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
pub use collection::{Collection, CreateCollectionRequest, UpdateCollectionRequest};
pub use language::Language;
pub use snippet::{
    normalize_tag_name, BatchOperation, BatchRequest, BatchResult, CreateSnippetRequest, Snippet,
    SnippetDraft, UpdateSnippetRequest,
};
pub use tag::{tag_key, Tag};
