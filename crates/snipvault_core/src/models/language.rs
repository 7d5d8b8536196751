//! Supported snippet languages.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages the editor offers; unknown wire values decode as [`Language::Plaintext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Javascript,
    Typescript,
    Html,
    Css,
    Python,
    Cpp,
    Java,
    Json,
    Markdown,
    Sql,
    Yaml,
    Shell,
    Toml,
    Go,
    Rust,
    Xml,
    #[default]
    #[serde(other)]
    Plaintext,
}

impl Language {
    /// Every supported language in picker order.
    pub const ALL: [Language; 17] = [
        Language::Javascript,
        Language::Typescript,
        Language::Html,
        Language::Css,
        Language::Python,
        Language::Cpp,
        Language::Java,
        Language::Json,
        Language::Markdown,
        Language::Sql,
        Language::Yaml,
        Language::Shell,
        Language::Toml,
        Language::Go,
        Language::Rust,
        Language::Xml,
        Language::Plaintext,
    ];

    /// Wire value sent to and received from the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Html => "html",
            Language::Css => "css",
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Json => "json",
            Language::Markdown => "markdown",
            Language::Sql => "sql",
            Language::Yaml => "yaml",
            Language::Shell => "shell",
            Language::Toml => "toml",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Xml => "xml",
            Language::Plaintext => "plaintext",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Language::Javascript => "JavaScript",
            Language::Typescript => "TypeScript",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Python => "Python",
            Language::Cpp => "C++",
            Language::Java => "Java",
            Language::Json => "JSON",
            Language::Markdown => "Markdown",
            Language::Sql => "SQL",
            Language::Yaml => "Yaml",
            Language::Shell => "Shell",
            Language::Toml => "Toml",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Xml => "Xml",
            Language::Plaintext => "Plain Text",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    /// Accepts wire values and labels, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Language::ALL
            .iter()
            .copied()
            .find(|lang| {
                lang.as_str().eq_ignore_ascii_case(trimmed)
                    || lang.label().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| CoreError::UnknownLanguage(trimmed.to_string()))
    }
}
