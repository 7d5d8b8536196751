//! View selection, fetch derivation, and client-side filtering.
//!
//! The server answers each view with its own endpoint, but the local
//! collection also holds optimistic edits and leftovers from other views, so
//! the visible list is always re-filtered here.

use crate::constants::TAG_SEARCH_PREFIX;
use crate::models::{tag_key, Category, Language, Snippet, Tag};
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which slice of the snippet collection the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewKind {
    #[default]
    All,
    Category,
    Tag,
    Favorites,
    RecycleBin,
}

impl ViewKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::All => "all",
            ViewKind::Category => "category",
            ViewKind::Tag => "tag",
            ViewKind::Favorites => "favorites",
            ViewKind::RecycleBin => "recycleBin",
        }
    }

    /// Whether the view is scoped by a category or tag id.
    pub fn takes_id(self) -> bool {
        matches!(self, ViewKind::Category | ViewKind::Tag)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewKind {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|ch| *ch != '-' && *ch != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "all" => Ok(ViewKind::All),
            "category" => Ok(ViewKind::Category),
            "tag" => Ok(ViewKind::Tag),
            "favorites" | "favourites" => Ok(ViewKind::Favorites),
            "recyclebin" | "trash" => Ok(ViewKind::RecycleBin),
            _ => Err(CoreError::InvalidValue {
                field: "view",
                value: raw.to_string(),
            }),
        }
    }
}

/// The current view plus its category/tag id when it has one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSelection {
    pub kind: ViewKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ViewSelection {
    /// Build a selection; a category or tag view without an id collapses to `All`
    /// and ids are dropped from views that do not take one.
    pub fn new(kind: ViewKind, id: Option<String>) -> Self {
        let id = id.filter(|id| !id.trim().is_empty());
        match (kind.takes_id(), id) {
            (true, Some(id)) => Self { kind, id: Some(id) },
            (true, None) => Self::all(),
            (false, _) => Self { kind, id: None },
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn favorites() -> Self {
        Self::new(ViewKind::Favorites, None)
    }

    pub fn recycle_bin() -> Self {
        Self::new(ViewKind::RecycleBin, None)
    }

    pub fn category(id: impl Into<String>) -> Self {
        Self::new(ViewKind::Category, Some(id.into()))
    }

    pub fn tag(id: impl Into<String>) -> Self {
        Self::new(ViewKind::Tag, Some(id.into()))
    }

    pub fn is_recycle_bin(&self) -> bool {
        self.kind == ViewKind::RecycleBin
    }

    /// The category id when this is a category view.
    pub fn category_id(&self) -> Option<&str> {
        match self.kind {
            ViewKind::Category => self.id.as_deref(),
            _ => None,
        }
    }

    /// The tag id when this is a tag view.
    pub fn tag_id(&self) -> Option<&str> {
        match self.kind {
            ViewKind::Tag => self.id.as_deref(),
            _ => None,
        }
    }
}

/// How the search box text is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Blank input: show the plain view.
    Off,
    /// Free text matched against title, description, code, language and tags.
    Text(String),
    /// `#name`: snippets carrying that exact tag.
    Tag(String),
}

impl SearchMode {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(name) = trimmed.strip_prefix(TAG_SEARCH_PREFIX) {
            let name = name.trim();
            if name.is_empty() {
                return SearchMode::Off;
            }
            return SearchMode::Tag(tag_key(name));
        }
        if trimmed.is_empty() {
            SearchMode::Off
        } else {
            SearchMode::Text(trimmed.to_string())
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, SearchMode::Off)
    }
}

/// Query parameters accepted by the snippet list and search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl SnippetFilters {
    /// Filters implied by the view alone.
    pub fn for_view(view: &ViewSelection) -> Self {
        let mut filters = Self::default();
        match view.kind {
            ViewKind::Favorites => filters.favorite = Some(true),
            ViewKind::RecycleBin => filters.deleted = Some(true),
            ViewKind::Category => filters.category_id = view.id.clone(),
            ViewKind::Tag => filters.tag_id = view.id.clone(),
            ViewKind::All => {}
        }
        filters
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// URL query pairs in a stable order, wire-named.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(deleted) = self.deleted {
            pairs.push(("deleted", deleted.to_string()));
        }
        if let Some(favorite) = self.favorite {
            pairs.push(("favorite", favorite.to_string()));
        }
        if let Some(search) = self.search.as_ref() {
            pairs.push(("search", search.clone()));
        }
        if let Some(language) = self.language {
            pairs.push(("language", language.as_str().to_string()));
        }
        if let Some(category_id) = self.category_id.as_ref() {
            pairs.push(("categoryId", category_id.clone()));
        }
        if let Some(tag_id) = self.tag_id.as_ref() {
            pairs.push(("tagId", tag_id.clone()));
        }
        if let Some(tag) = self.tag.as_ref() {
            pairs.push(("tag", tag.clone()));
        }
        pairs
    }
}

/// Which request answers the current view and search input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// `GET /snippets`
    All,
    /// `GET /snippets/favorites`
    Favorites,
    /// `GET /snippets/recycle-bin`
    RecycleBin,
    /// `GET /categories/:id/snippets`
    Category(String),
    /// `GET /tags/:id/snippets`
    Tag(String),
    /// `GET /snippets/search?q=...`
    Search {
        query: String,
        filters: SnippetFilters,
    },
    /// `GET /snippets?...`
    List { filters: SnippetFilters },
}

impl FetchPlan {
    /// Derive the request for a view and the raw search box text.
    pub fn derive(view: &ViewSelection, search: &str) -> Self {
        let view = ViewSelection::new(view.kind, view.id.clone());
        match SearchMode::parse(search) {
            SearchMode::Text(query) => FetchPlan::Search {
                query,
                filters: SnippetFilters::for_view(&view),
            },
            SearchMode::Tag(name) => FetchPlan::List {
                filters: SnippetFilters {
                    tag: Some(name),
                    ..SnippetFilters::for_view(&view)
                },
            },
            SearchMode::Off => match (view.kind, view.id) {
                (ViewKind::Favorites, _) => FetchPlan::Favorites,
                (ViewKind::RecycleBin, _) => FetchPlan::RecycleBin,
                (ViewKind::Category, Some(id)) => FetchPlan::Category(id),
                (ViewKind::Tag, Some(id)) => FetchPlan::Tag(id),
                _ => FetchPlan::All,
            },
        }
    }
}

/// Resolve a tag-view id to the tag name snippets store.
fn tag_name_for<'a>(tags: &'a [Tag], tag_id: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.id == tag_id)
        .map(|tag| tag.name.as_str())
}

/// Returns `true` when `snippet` belongs in `view`.
///
/// A tag view whose id does not resolve matches nothing.
pub fn matches_view(snippet: &Snippet, view: &ViewSelection, tags: &[Tag]) -> bool {
    if view.kind == ViewKind::RecycleBin {
        return snippet.is_deleted;
    }
    if snippet.is_deleted {
        return false;
    }
    match view.kind {
        ViewKind::All | ViewKind::RecycleBin => true,
        ViewKind::Favorites => snippet.is_favorite,
        ViewKind::Category => match view.id.as_deref() {
            Some(id) => snippet.category_id.as_deref() == Some(id),
            None => true,
        },
        ViewKind::Tag => match view.id.as_deref() {
            Some(id) => tag_name_for(tags, id).is_some_and(|name| snippet.has_tag(name)),
            None => true,
        },
    }
}

/// Returns `true` when `snippet` satisfies the search box text.
pub fn matches_search(snippet: &Snippet, search: &SearchMode) -> bool {
    match search {
        SearchMode::Off => true,
        SearchMode::Tag(name) => snippet.has_tag(name),
        SearchMode::Text(query) => {
            let needle = query.to_lowercase();
            let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
            contains(&snippet.title)
                || snippet.description.as_deref().is_some_and(contains)
                || contains(&snippet.code)
                || contains(snippet.language.as_str())
                || contains(snippet.language.label())
                || snippet.tags.iter().any(|tag| contains(tag))
        }
    }
}

/// The subset of `snippets` shown for `view` and `search`, in collection order.
pub fn visible_snippets<'a>(
    snippets: &'a [Snippet],
    view: &ViewSelection,
    tags: &[Tag],
    search: &str,
) -> Vec<&'a Snippet> {
    let mode = SearchMode::parse(search);
    snippets
        .iter()
        .filter(|snippet| matches_view(snippet, view, tags) && matches_search(snippet, &mode))
        .collect()
}

/// Heading shown above the snippet list.
pub fn view_title(view: &ViewSelection, categories: &[Category], tags: &[Tag]) -> String {
    match view.kind {
        ViewKind::All => "All Snippets".to_string(),
        ViewKind::Favorites => "Favorites".to_string(),
        ViewKind::RecycleBin => "Recycle Bin".to_string(),
        ViewKind::Category => view
            .id
            .as_deref()
            .and_then(|id| categories.iter().find(|category| category.id == id))
            .map(|category| category.name.clone())
            .unwrap_or_else(|| "Category".to_string()),
        ViewKind::Tag => view
            .id
            .as_deref()
            .and_then(|id| tag_name_for(tags, id))
            .map(|name| format!("{}{}", TAG_SEARCH_PREFIX, name))
            .unwrap_or_else(|| "Tag".to_string()),
    }
}
