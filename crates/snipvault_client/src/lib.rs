//! REST client layer for SnipVault.
//!
//! [`SnippetApi`] is the seam the state layer talks through; [`HttpApi`] is
//! the blocking HTTP implementation. With the `test-support` feature,
//! `MemoryApi` is an in-process one for tests.

/// The injectable API trait.
pub mod api;
/// Client error type.
pub mod error;
/// Blocking HTTP implementation.
pub mod http;
/// In-process implementation backed by plain collections.
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
/// JSON envelopes used on the wire.
pub mod wire;

pub use api::SnippetApi;
pub use error::ApiError;
pub use http::{error_message_for_response, normalize_server, HttpApi};
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryApi;
