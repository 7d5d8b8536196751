//! Core domain library for SnipVault (models, hierarchy, view derivation, config).

/// Category hierarchy queries over parent-linked category lists.
pub mod category_tree;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants used across SnipVault crates.
pub mod constants;
/// Process-global environment mutation helpers.
pub mod env;
/// Domain error types (validation and consistency failures).
pub mod error;
/// Data models for snippets, categories, tags, and collections.
pub mod models;
/// Fixture builders shared by unit and integration tests.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
/// View selection, fetch derivation, and client-side filtering.
pub mod view;

pub use config::Config;
pub use constants::*;
pub use error::CoreError;
