//! Snippet models, request payloads, and client-side validation.

use super::language::Language;
use super::tag::tag_key;
use crate::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored code snippet as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub code: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unvalidated form contents for a new snippet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetDraft {
    pub title: String,
    pub description: String,
    pub code: String,
    pub language: Option<Language>,
    pub category_id: Option<String>,
    pub tags: Vec<String>,
}

/// Request payload for `POST /snippets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSnippetRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub code: String,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request payload for `PUT /snippets/:id`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSnippetRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

/// Bulk operations accepted by `POST /snippets/batch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchOperation {
    Delete,
    Restore,
    Favorite,
    Unfavorite,
    PermanentDelete,
}

/// Request payload for `POST /snippets/batch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub operation: BatchOperation,
    pub snippet_ids: Vec<String>,
}

/// Response payload for `POST /snippets/batch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: bool,
    #[serde(default)]
    pub count: usize,
}

/// Canonical form of a tag name typed into the snippet form.
pub fn normalize_tag_name(raw: &str) -> Option<String> {
    let key = tag_key(raw);
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

fn normalize_tags(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw.iter().filter_map(|tag| normalize_tag_name(tag)) {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl Snippet {
    /// Create a snippet with a fresh id and timestamps.
    pub fn new(title: impl Into<String>, code: impl Into<String>, language: Language) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            code: code.into(),
            language,
            category_id: None,
            tags: Vec::new(),
            is_favorite: false,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the stored form of a validated create request.
    pub fn from_request(request: &CreateSnippetRequest) -> Self {
        let mut snippet = Self::new(
            request.title.clone(),
            request.code.clone(),
            request.language,
        );
        snippet.description = request.description.clone();
        snippet.category_id = request.category_id.clone();
        snippet.tags = request.tags.clone();
        snippet
    }

    /// Returns `true` when the snippet carries `name` (case-insensitive).
    pub fn has_tag(&self, name: &str) -> bool {
        let key = tag_key(name);
        self.tags.iter().any(|tag| tag_key(tag) == key)
    }

    /// Apply a partial update in place and bump `updated_at`.
    ///
    /// An empty `category_id` clears the category.
    pub fn apply_update(&mut self, update: &UpdateSnippetRequest) {
        if let Some(title) = update.title.as_ref() {
            self.title = title.clone();
        }
        if let Some(description) = update.description.as_ref() {
            self.description = non_blank(Some(description));
        }
        if let Some(code) = update.code.as_ref() {
            self.code = code.clone();
        }
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(category_id) = update.category_id.as_ref() {
            self.category_id = non_blank(Some(category_id));
        }
        if let Some(tags) = update.tags.as_ref() {
            self.tags = tags.clone();
        }
        if let Some(is_favorite) = update.is_favorite {
            self.is_favorite = is_favorite;
        }
        self.updated_at = Utc::now();
    }
}

impl SnippetDraft {
    /// Validate the form and build a normalized create request.
    ///
    /// # Arguments
    /// - `categories_available`: whether any category exists; a category is
    ///   only mandatory when there is one to choose.
    ///
    /// # Errors
    /// Returns [`CoreError::MissingField`] for the first missing required field
    /// in form order (title, code, language, category).
    pub fn validate(&self, categories_available: bool) -> Result<CreateSnippetRequest, CoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CoreError::MissingField("Title"));
        }
        if self.code.trim().is_empty() {
            return Err(CoreError::MissingField("Code"));
        }
        let Some(language) = self.language else {
            return Err(CoreError::MissingField("Language"));
        };
        let category_id = non_blank(self.category_id.as_deref());
        if category_id.is_none() && categories_available {
            return Err(CoreError::MissingField("Category"));
        }
        Ok(CreateSnippetRequest {
            title: title.to_string(),
            description: non_blank(Some(self.description.as_str())),
            code: self.code.clone(),
            language,
            category_id,
            tags: normalize_tags(&self.tags),
        })
    }

    /// Prefill a draft from an existing snippet (edit mode).
    pub fn from_snippet(snippet: &Snippet) -> Self {
        Self {
            title: snippet.title.clone(),
            description: snippet.description.clone().unwrap_or_default(),
            code: snippet.code.clone(),
            language: Some(snippet.language),
            category_id: snippet.category_id.clone(),
            tags: snippet.tags.clone(),
        }
    }
}

impl UpdateSnippetRequest {
    /// Reject patches that would blank a required field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if matches!(self.title.as_deref(), Some(title) if title.trim().is_empty()) {
            return Err(CoreError::MissingField("Title"));
        }
        if matches!(self.code.as_deref(), Some(code) if code.trim().is_empty()) {
            return Err(CoreError::MissingField("Code"));
        }
        Ok(())
    }

    /// Normalize a validated patch the same way drafts are normalized.
    pub fn normalized(mut self) -> Self {
        if let Some(title) = self.title.as_mut() {
            *title = title.trim().to_string();
        }
        if let Some(tags) = self.tags.as_mut() {
            *tags = normalize_tags(tags);
        }
        self
    }
}
