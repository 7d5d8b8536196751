//! Application state for SnipVault clients.
//!
//! [`Store`] owns the snippet, category, tag, and collection collections plus
//! the view selection. Network work runs on a backend worker thread that
//! speaks the [`CoreCmd`]/[`CoreEvent`] protocol; the store reconciles events
//! in [`Store::apply_event`].

pub mod backend;
pub mod store;

pub use backend::{spawn_backend, BackendHandle, CoreCmd, CoreErrorSource, CoreEvent};
pub use store::{EditorMode, Notification, Optimistic, SearchDebounce, Store};
