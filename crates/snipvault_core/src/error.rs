//! Domain error types for validation and hierarchy consistency checks.
use thiserror::Error;

/// Errors raised by client-side checks before any request is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Unsupported language: {0}")]
    UnknownLanguage(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),

    #[error("Tag not found: {0}")]
    TagNotFound(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Tag already exists: {0}")]
    DuplicateTag(String),

    #[error("Cannot move category '{0}' into itself or one of its descendants")]
    CyclicMove(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}
