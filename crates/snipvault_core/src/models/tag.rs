use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-form label; snippets reference tags by `name`, not `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub snippet_count: usize,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: Utc::now(),
            snippet_count: 0,
        }
    }

    /// Tag identity is the case-insensitive name.
    pub fn same_name(&self, name: &str) -> bool {
        tag_key(&self.name) == tag_key(name)
    }
}

/// Case-folded form two tag names share when they name the same tag.
pub fn tag_key(name: &str) -> String {
    name.trim().to_lowercase()
}
