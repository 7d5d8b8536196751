//! Error state and the notification queue.

use super::Store;
use snipvault_core::{NOTIFICATION_LIMIT, NOTIFICATION_TTL};
use std::time::Instant;
use tracing::warn;

/// A transient message for the toast area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub text: String,
    pub is_error: bool,
    pub expires_at: Instant,
}

impl Store {
    /// Active notifications, oldest first.
    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    /// Drop notifications that expired at or before `now`.
    pub fn prune_notifications(&mut self, now: Instant) {
        self.notifications.retain(|note| note.expires_at > now);
    }

    pub fn dismiss_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Informational notice; does not touch `error`.
    pub(super) fn notify(&mut self, text: impl Into<String>) {
        self.push_notification(text.into(), false);
    }

    /// Record a failure: sets `error` and shows it.
    pub(super) fn report_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("{}", text);
        self.error = Some(text.clone());
        self.push_notification(text, true);
    }

    fn push_notification(&mut self, text: String, is_error: bool) {
        let now = Instant::now();
        if let Some(last) = self.notifications.back_mut() {
            if last.text == text {
                last.expires_at = now + NOTIFICATION_TTL;
                last.is_error |= is_error;
                return;
            }
        }
        self.notifications.push_back(Notification {
            text,
            is_error,
            expires_at: now + NOTIFICATION_TTL,
        });
        while self.notifications.len() > NOTIFICATION_LIMIT {
            self.notifications.pop_front();
        }
    }
}
