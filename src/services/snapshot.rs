//! Latest-completed-refresh-wins snapshot store.
//!
//! Dashboard refreshes run as independent pure computations over their own
//! row snapshot. When refreshes overlap (a new reporting window was requested
//! before the prior fetch resolved), the stale result must be discarded
//! rather than applied. Each refresh takes a ticket before fetching; a commit
//! only lands if no newer ticket has been issued since. Cancellation is
//! cooperative: the stale computation is not aborted, its result is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Stores the most recent committed value, discarding out-of-date commits.
#[derive(Debug)]
pub struct LatestWins<T> {
    next_ticket: AtomicU64,
    slot: RwLock<Option<(u64, T)>>,
}

impl<T: Clone> LatestWins<T> {
    pub fn new() -> Self {
        Self {
            next_ticket: AtomicU64::new(0),
            slot: RwLock::new(None),
        }
    }

    /// Take a ticket for a refresh that is about to start.
    pub fn begin(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst)
    }

    /// Store `value` unless a newer refresh began after this ticket was
    /// issued. Returns whether the value was applied.
    pub fn commit(&self, ticket: u64, value: T) -> bool {
        if self.next_ticket.load(Ordering::SeqCst) != ticket + 1 {
            return false;
        }
        let mut slot = self.slot.write().unwrap_or_else(|e| e.into_inner());
        match *slot {
            Some((committed, _)) if committed > ticket => false,
            _ => {
                *slot = Some((ticket, value));
                true
            }
        }
    }

    /// The most recently committed value, if any refresh has completed.
    pub fn latest(&self) -> Option<T> {
        self.slot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|(_, value)| value.clone())
    }
}

impl<T: Clone> Default for LatestWins<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_applies_when_no_newer_refresh() {
        let store = LatestWins::new();
        let ticket = store.begin();
        assert!(store.commit(ticket, 1));
        assert_eq!(store.latest(), Some(1));
    }

    #[test]
    fn stale_commit_is_discarded() {
        let store = LatestWins::new();
        let old = store.begin();
        let new = store.begin();

        // The newer refresh resolves first.
        assert!(store.commit(new, 2));
        // The older one resolves late and must not overwrite.
        assert!(!store.commit(old, 1));
        assert_eq!(store.latest(), Some(2));
    }

    #[test]
    fn stale_commit_discarded_even_before_newer_resolves() {
        let store = LatestWins::new();
        let old = store.begin();
        let _new = store.begin();

        // The newer refresh is still in flight; the old result is already
        // obsolete and must not be applied.
        assert!(!store.commit(old, 1));
        assert_eq!(store.latest(), None);
    }

    #[test]
    fn empty_store_has_no_snapshot() {
        let store: LatestWins<u32> = LatestWins::new();
        assert_eq!(store.latest(), None);
    }

    #[tokio::test]
    async fn concurrent_refreshes_leave_newest_value() {
        use std::sync::Arc;

        let store = Arc::new(LatestWins::new());
        let slow = {
            let store = Arc::clone(&store);
            let ticket = store.begin();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                store.commit(ticket, "slow")
            })
        };
        let fast = {
            let store = Arc::clone(&store);
            let ticket = store.begin();
            tokio::spawn(async move { store.commit(ticket, "fast") })
        };

        let (slow_applied, fast_applied) = (slow.await.unwrap(), fast.await.unwrap());
        assert!(fast_applied);
        assert!(!slow_applied);
        assert_eq!(store.latest(), Some("fast"));
    }
}
