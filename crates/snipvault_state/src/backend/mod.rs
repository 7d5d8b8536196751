//! Backend worker wiring.
//!
//! This module exposes the command/event protocol plus the worker spawn helper
//! used by the store.

mod protocol;
mod worker;

pub use protocol::{CoreCmd, CoreErrorSource, CoreEvent};
pub use worker::{spawn_backend, BackendHandle};
