//! JSON envelopes: every list or item is wrapped under a named key.

use serde::{Deserialize, Serialize};
use snipvault_core::models::{Category, Collection, Snippet, Tag};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetsEnvelope {
    pub snippets: Vec<Snippet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetEnvelope {
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesEnvelope {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEnvelope {
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsEnvelope {
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagEnvelope {
    pub tag: Tag,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsEnvelope {
    pub collections: Vec<Collection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionEnvelope {
    pub collection: Collection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuccessEnvelope {
    #[serde(default)]
    pub success: bool,
}

/// Body of `POST /snippets/:id/favorite`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteBody {
    pub is_favorite: bool,
}

/// Body of `POST /tags` and `PUT /tags/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagNameBody {
    pub name: String,
}
