use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined folder-like grouping; `parent_id` links form a forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub snippet_count: usize,
}

/// Request payload for `POST /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Request payload for `PUT /categories/:id`.
///
/// `parent_id`: `None` leaves the parent alone, `Some(None)` moves the
/// category to the root (serialized as an explicit `null`), `Some(Some(id))`
/// re-parents it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_parent_change"
    )]
    pub parent_id: Option<Option<String>>,
}

fn deserialize_parent_change<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    // Present-but-null must stay distinguishable from absent.
    Option::<String>::deserialize(deserializer).map(Some)
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_parent(name, None)
    }

    pub fn with_parent(name: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            parent_id,
            created_at: Utc::now(),
            snippet_count: 0,
        }
    }

    /// Apply a partial update in place.
    pub fn apply_update(&mut self, update: &UpdateCategoryRequest) {
        if let Some(name) = update.name.as_ref() {
            self.name = name.clone();
        }
        if let Some(description) = update.description.as_ref() {
            self.description = Some(description.clone()).filter(|value| !value.trim().is_empty());
        }
        if let Some(parent_id) = update.parent_id.as_ref() {
            self.parent_id = parent_id.clone();
        }
    }
}

impl UpdateCategoryRequest {
    /// A rename that keeps description and parent.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A move: only the parent changes; `None` promotes to a root.
    pub fn move_to(parent_id: Option<String>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }

    /// Returns the requested new parent when this update re-parents.
    pub fn new_parent(&self) -> Option<Option<&str>> {
        self.parent_id.as_ref().map(|parent| parent.as_deref())
    }
}
