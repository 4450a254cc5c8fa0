//! Per-user serialisation of timer mutations

use std::sync::Arc;

use dashmap::DashMap;
use tally_domain::UserId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Table of one async mutex per user
///
/// Holding a user's guard serialises every read-modify-write of that user's
/// active entry. Different users never contend. Clones share the table.
/// A user's slot is evicted once the last guard is released with nobody
/// waiting, so the table only holds users with work in flight.
#[derive(Debug, Clone, Default)]
pub struct UserLocks {
    locks: Arc<DashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`'s timer state.
    pub async fn acquire(&self, user_id: &UserId) -> UserLockGuard {
        // Clone the Arc out so the shard guard is released before awaiting.
        let lock = self.locks.entry(user_id.clone()).or_default().clone();
        let guard = lock.lock_owned().await;
        UserLockGuard {
            _guard: guard,
            locks: Arc::clone(&self.locks),
            user_id: user_id.clone(),
        }
    }

    /// Number of users currently holding or waiting for a lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one user's timer state; released on drop.
#[derive(Debug)]
pub struct UserLockGuard {
    _guard: OwnedMutexGuard<()>,
    locks: Arc<DashMap<UserId, Arc<Mutex<()>>>>,
    user_id: UserId,
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        // Two references: the table and this guard. The mutex is released after this runs.
        self.locks.remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 2);
    }
}
