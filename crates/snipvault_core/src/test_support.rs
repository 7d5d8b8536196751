//! Fixture builders shared by unit and integration tests.

use crate::models::{Category, Language, Snippet, Tag};
use chrono::{TimeZone, Utc};

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// A category named after its id.
pub fn category(id: &str, parent_id: Option<&str>) -> Category {
    Category {
        id: id.to_string(),
        name: id.to_string(),
        description: None,
        parent_id: parent_id.map(str::to_string),
        created_at: fixed_time(),
        snippet_count: 0,
    }
}

pub fn named_category(id: &str, name: &str, parent_id: Option<&str>) -> Category {
    Category {
        name: name.to_string(),
        ..category(id, parent_id)
    }
}

pub fn tag(id: &str, name: &str) -> Tag {
    Tag {
        id: id.to_string(),
        name: name.to_string(),
        created_at: fixed_time(),
        snippet_count: 0,
    }
}

/// A plaintext snippet with `id` as its title and a one-line body.
pub fn snippet(id: &str) -> Snippet {
    Snippet {
        id: id.to_string(),
        title: id.to_string(),
        description: None,
        code: format!("// {}", id),
        language: Language::Plaintext,
        category_id: None,
        tags: Vec::new(),
        is_favorite: false,
        is_deleted: false,
        created_at: fixed_time(),
        updated_at: fixed_time(),
    }
}

/// Chainable tweaks for [`snippet`] fixtures.
pub trait SnippetFixture: Sized {
    fn titled(self, title: &str) -> Self;
    fn in_category(self, category_id: &str) -> Self;
    fn tagged(self, tags: &[&str]) -> Self;
    fn language(self, language: Language) -> Self;
    fn favorite(self) -> Self;
    fn deleted(self) -> Self;
}

impl SnippetFixture for Snippet {
    fn titled(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    fn in_category(mut self, category_id: &str) -> Self {
        self.category_id = Some(category_id.to_string());
        self
    }

    fn tagged(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }

    fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }
}
