// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-record-type lock registry.
//!
//! The remote API rejects concurrent modifications within a zone, so every
//! read-modify-write sequence runs under a lock. By default there is one lock
//! per [`RecordType`], allocated up front when the registry is built. The
//! registry is an explicit value owned by the orchestrator; there is no
//! process-global lock table.
//!
//! With [`LockGranularity::RecordSet`] locks are keyed by the full
//! `(zone, host, type)` triple instead. They are created on first use and
//! removed again when the last holder releases them with nobody waiting, so
//! the table only tracks record sets that are in flight.
//!
//! # Example
//!
//! ```rust
//! use configdns_sync::locks::{LockGranularity, LockRegistry};
//! use configdns_sync::record_type::RecordType;
//! use configdns_sync::recordset::RecordKey;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let locks = LockRegistry::new(LockGranularity::RecordType);
//! let key = RecordKey::new("example.com", "www.example.com", RecordType::A);
//!
//! let guard = locks.acquire(&key).await;
//! // ... read, write and re-read the record set ...
//! drop(guard);
//! # }
//! ```

use crate::record_type::RecordType;
use crate::recordset::RecordKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

type SetLocks = Arc<StdMutex<HashMap<RecordKey, Arc<Mutex<()>>>>>;

/// What a single lock protects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LockGranularity {
    /// One lock per record type, shared by every zone and host
    #[default]
    RecordType,
    /// One lock per `(zone, host, type)`
    RecordSet,
}

/// Registry of synchronization locks.
#[derive(Debug)]
pub struct LockRegistry {
    granularity: LockGranularity,
    by_type: HashMap<RecordType, Arc<Mutex<()>>>,
    by_set: SetLocks,
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new(LockGranularity::default())
    }
}

impl LockRegistry {
    /// Builds a registry with one lock per supported record type.
    #[must_use]
    pub fn new(granularity: LockGranularity) -> Self {
        let by_type = RecordType::ALL
            .into_iter()
            .map(|t| (t, Arc::new(Mutex::new(()))))
            .collect();
        Self {
            granularity,
            by_type,
            by_set: Arc::default(),
        }
    }

    #[must_use]
    pub fn granularity(&self) -> LockGranularity {
        self.granularity
    }

    fn lock_for(&self, key: &RecordKey) -> Arc<Mutex<()>> {
        match self.granularity {
            LockGranularity::RecordType => match self.by_type.get(&key.record_type) {
                Some(lock) => Arc::clone(lock),
                // Unreachable while `by_type` is built from `RecordType::ALL`
                None => Arc::new(Mutex::new(())),
            },
            LockGranularity::RecordSet => {
                // The std mutex is only held to look up or insert the entry
                let mut sets = self.by_set.lock().unwrap_or_else(PoisonError::into_inner);
                Arc::clone(sets.entry(key.clone()).or_default())
            }
        }
    }

    /// Waits for and takes the lock covering `key`.
    ///
    /// The lock is released when the returned guard is dropped, including on
    /// early return through `?` and when the owning future is cancelled.
    pub async fn acquire(&self, key: &RecordKey) -> RecordLockGuard {
        let lock = self.lock_for(key);
        debug!(record = %key, granularity = ?self.granularity, "Waiting for record lock");
        let guard = lock.lock_owned().await;
        debug!(record = %key, "Acquired record lock");
        let sets = match self.granularity {
            LockGranularity::RecordType => None,
            LockGranularity::RecordSet => Some(Arc::clone(&self.by_set)),
        };
        RecordLockGuard {
            key: key.clone(),
            guard: Some(guard),
            sets,
        }
    }

    /// Number of per-record-set locks currently tracked.
    #[must_use]
    pub fn tracked_sets(&self) -> usize {
        self.by_set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Held while a record set is being synchronized.
#[derive(Debug)]
pub struct RecordLockGuard {
    key: RecordKey,
    guard: Option<OwnedMutexGuard<()>>,
    /// Set table to prune on release, for per-record-set locks only
    sets: Option<SetLocks>,
}

impl RecordLockGuard {
    #[must_use]
    pub fn key(&self) -> &RecordKey {
        &self.key
    }
}

impl Drop for RecordLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        if let Some(sets) = &self.sets {
            // Waiters clone the entry under this mutex before awaiting, so a
            // count of one means the table holds the only reference.
            let mut sets = sets.lock().unwrap_or_else(PoisonError::into_inner);
            if sets.get(&self.key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
                sets.remove(&self.key);
            }
        }
        debug!(record = %self.key, "Released record lock");
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod locks_tests;
