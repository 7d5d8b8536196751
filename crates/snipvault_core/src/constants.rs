//! Shared constants used across SnipVault crates.

use std::time::Duration;

/// Default API base URL used by the CLI and the state layer.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Quiet period before a typed search query is sent to the API.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Maximum number of notifications kept in the queue.
pub const NOTIFICATION_LIMIT: usize = 4;

/// Prefix that switches the search box into tag mode (`#rust`).
pub const TAG_SEARCH_PREFIX: char = '#';

/// Indentation unit used when rendering nested categories.
pub const CATEGORY_INDENT: &str = "— ";
