//! Optimistic update bookkeeping.

use std::collections::HashMap;

/// Lifecycle of a locally applied change awaiting server confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Optimistic<T> {
    /// Applied locally; `previous` is restored if the call fails.
    Pending { previous: T },
    /// Confirmed by the server.
    Committed,
    /// Rejected by the server and rolled back to `previous`.
    Failed { previous: T },
}

impl<T> Optimistic<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Optimistic::Pending { .. })
    }
}

/// Per-snippet favorite toggles, ordered by a store-wide sequence number.
#[derive(Debug, Default)]
pub(super) struct FavoriteToggles {
    next_seq: u64,
    latest: HashMap<String, (u64, Optimistic<bool>)>,
}

impl FavoriteToggles {
    /// Start a toggle for `id` and return its sequence number.
    pub(super) fn begin(&mut self, id: &str, previous: bool) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest
            .insert(id.to_string(), (seq, Optimistic::Pending { previous }));
        seq
    }

    /// Returns `true` when `seq` is the newest toggle issued for `id`.
    pub(super) fn is_latest(&self, id: &str, seq: u64) -> bool {
        self.latest
            .get(id)
            .is_some_and(|(latest, _)| *latest == seq)
    }

    pub(super) fn commit(&mut self, id: &str, seq: u64) {
        if let Some((latest, state)) = self.latest.get_mut(id) {
            if *latest == seq {
                *state = Optimistic::Committed;
            }
        }
    }

    /// Mark the newest toggle failed and return the value to restore.
    ///
    /// Returns `None` when `seq` was superseded; the newer toggle owns the flag.
    pub(super) fn fail(&mut self, id: &str, seq: u64) -> Option<bool> {
        let (latest, state) = self.latest.get_mut(id)?;
        if *latest != seq {
            return None;
        }
        let Optimistic::Pending { previous } = *state else {
            return None;
        };
        *state = Optimistic::Failed { previous };
        Some(previous)
    }

    pub(super) fn state(&self, id: &str) -> Option<&Optimistic<bool>> {
        self.latest.get(id).map(|(_, state)| state)
    }

    pub(super) fn forget(&mut self, id: &str) {
        self.latest.remove(id);
    }
}
