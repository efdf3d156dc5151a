// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record set synchronization.
//!
//! [`SyncOrchestrator`] drives each request through
//! `VALIDATING -> LOCKED -> READING_REMOTE -> CREATING | UPDATING -> SETTLED`,
//! failing out of any state:
//!
//! 1. Validate the declaration locally. Failures never reach the remote.
//! 2. Take the lock for the record type (or record set, see [`LockGranularity`]).
//! 3. Read the remote record set. "Not found" selects the create path.
//! 4. Encode the declaration, reconcile MX against the remote, fingerprint.
//! 5. Save or update through the [`RetryPolicy`], skipping the write when the
//!    remote already matches.
//! 6. Read the record set back and return its [`RecordState`].
//!
//! The lock is held from step 2 until the read-back completes and is released
//! on every exit path. The returned state is not persisted here; the caller
//! stores it once the operation has succeeded.
//!
//! Locking per record type serializes every writer of that type across all
//! zones. The bottleneck is accepted in exchange for never racing the remote's
//! per-zone change tracking; [`LockGranularity::RecordSet`] trades that back
//! for throughput.
//!
//! [`LockGranularity`]: crate::locks::LockGranularity
//! [`LockGranularity::RecordSet`]: crate::locks::LockGranularity::RecordSet

pub mod operations;

use crate::client::{ConfigDnsClient, RecordBody};
use crate::codec::{self, mx};
use crate::diff;
use crate::dns_errors::SyncError;
use crate::fingerprint::fingerprint;
use crate::locks::LockRegistry;
use crate::metrics;
use crate::record_type::RecordType;
use crate::recordset::{RecordData, RecordKey, RecordSet};
use crate::retry::RetryPolicy;
use crate::soa::SoaSerialCoordinator;
use crate::state::RecordState;
use operations::{DeleteRecord, WriteMode, WriteRecord};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What a create-or-update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Updated,
    /// The remote already held the declared rdata and TTL
    Unchanged,
}

impl SyncAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        }
    }
}

/// Result of [`SyncOrchestrator::create_or_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub action: SyncAction,
    /// State to persist, taken from the read-back
    pub state: RecordState,
}

/// Result of [`SyncOrchestrator::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyAbsent,
    /// SOA and apex NS record sets belong to the zone and are never deleted
    Retained,
}

/// Remote state compared with the last synchronized state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drift {
    InSync,
    /// Attributes that differ, e.g. `["target", "ttl"]`
    Drifted { changed: Vec<String> },
    /// The record set no longer exists on the remote
    Missing,
}

/// A record set as read from the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRecord {
    /// Decoded declaration that reproduces the remote record set
    pub record_set: RecordSet,
    pub state: RecordState,
}

/// Result of [`SyncOrchestrator::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub drift: Drift,
    /// `None` when the record set is missing
    pub remote: Option<RemoteRecord>,
}

/// Synchronizes declared record sets with the remote API.
pub struct SyncOrchestrator {
    client: Arc<dyn ConfigDnsClient>,
    locks: LockRegistry,
    retry: RetryPolicy,
    soa: SoaSerialCoordinator,
}

impl SyncOrchestrator {
    #[must_use]
    pub fn new(client: Arc<dyn ConfigDnsClient>, locks: LockRegistry, retry: RetryPolicy) -> Self {
        let soa = SoaSerialCoordinator::new(Arc::clone(&client));
        Self {
            client,
            locks,
            retry,
            soa,
        }
    }

    #[must_use]
    pub fn client(&self) -> &Arc<dyn ConfigDnsClient> {
        &self.client
    }

    /// Creates or updates a declared record set.
    ///
    /// `previous` is the state stored by the last successful synchronization
    /// of the same record set, if any. MX reconciliation uses it to recognize
    /// exchangers that were removed from the declaration.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Validation`] before any remote call
    /// - [`SyncError::InvalidMxFormat`] if a declared exchanger disagrees with the remote
    /// - [`SyncError::RetryExhausted`] if conflicts outlast the retry budget
    /// - [`SyncError::Remote`] for any other remote failure, including the read-back
    pub async fn create_or_update(
        &self,
        set: &RecordSet,
        previous: Option<&RecordState>,
    ) -> Result<SyncOutcome, SyncError> {
        let start = Instant::now();
        let record_type = set.record_type();
        let result = self.sync(set, previous).await;
        match &result {
            Ok(outcome) => {
                let status = if outcome.action == SyncAction::Unchanged {
                    "unchanged"
                } else {
                    "success"
                };
                let operation = match outcome.action {
                    SyncAction::Created => "create",
                    SyncAction::Updated | SyncAction::Unchanged => "update",
                };
                metrics::record_operation(record_type, operation, status, start.elapsed());
            }
            Err(e) => {
                warn!(record = %set.id(), reason = e.status_reason(), error = %e, "Synchronization failed");
                metrics::record_failure(record_type, "sync", e, start.elapsed());
            }
        }
        result
    }

    async fn sync(&self, set: &RecordSet, previous: Option<&RecordState>) -> Result<SyncOutcome, SyncError> {
        codec::validate(set)?;

        let key = set.key();
        let record_type = key.record_type;
        let _guard = self.locks.acquire(&key).await;

        let remote = self.fetch(&key).await?;

        let declared = codec::encode(set)?;
        let rdata = match (&set.data, &remote) {
            (RecordData::MX { .. }, Some(existing)) => {
                let previous_declared = previous.map_or(&[][..], |p| p.declared_rdata.as_slice());
                mx::reconcile(&declared, previous_declared, &existing.rdata)?
            }
            _ => declared.clone(),
        };
        let declared_fingerprint = fingerprint(record_type, &rdata);

        if let Some(existing) = &remote {
            let remote_rdata = normalize(record_type, &existing.rdata);
            if existing.ttl == set.ttl
                && diff::suppress_record_diff(record_type, &remote_rdata, &rdata)
            {
                debug!(record = %key, fingerprint = %declared_fingerprint, "Remote already up to date");
                return Ok(SyncOutcome {
                    action: SyncAction::Unchanged,
                    state: RecordState::new(&key, existing.ttl, existing.rdata.clone(), declared),
                });
            }
        }

        let mode = if remote.is_some() {
            WriteMode::Update
        } else {
            WriteMode::Save
        };
        let body = RecordBody {
            name: set.host.clone(),
            record_type,
            ttl: set.ttl,
            rdata,
        };
        let mut write = WriteRecord::new(
            Arc::clone(&self.client),
            self.soa.clone(),
            &set.zone,
            mode,
            body,
        );
        self.retry.run(&format!("{mode} {key}"), &mut write).await?;

        // Read-after-write while the lock is still held
        let confirmed = self
            .client
            .get_record(&key.zone, &key.host, record_type)
            .await?;
        let state = RecordState::new(&key, confirmed.ttl, confirmed.rdata, declared);
        if state.fingerprint != fingerprint(record_type, &write.body.rdata) {
            debug!(
                record = %key,
                written = %fingerprint(record_type, &write.body.rdata),
                confirmed = %state.fingerprint,
                "Remote normalized the written rdata"
            );
        }

        let action = match mode {
            WriteMode::Save => SyncAction::Created,
            WriteMode::Update => SyncAction::Updated,
        };
        info!(
            record = %key,
            action = action.as_str(),
            fingerprint = %state.fingerprint,
            "Synchronized record set"
        );
        Ok(SyncOutcome { action, state })
    }

    /// Deletes a record set.
    ///
    /// The remote removes the whole set; there is no partial deletion. A set
    /// that is already gone counts as deleted. SOA and apex NS sets are left
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RetryExhausted`] or [`SyncError::Remote`] if the
    /// remote delete fails.
    pub async fn delete(&self, key: &RecordKey) -> Result<DeleteOutcome, SyncError> {
        let start = Instant::now();

        if key.record_type == RecordType::SOA || (key.record_type == RecordType::NS && key.is_apex()) {
            info!(record = %key, "Zone-owned record set is never deleted, leaving it in place");
            metrics::record_operation(key.record_type, "delete", "retained", start.elapsed());
            return Ok(DeleteOutcome::Retained);
        }

        let result = async {
            let _guard = self.locks.acquire(key).await;
            let mut delete =
                DeleteRecord::new(Arc::clone(&self.client), &key.zone, &key.host, key.record_type);
            self.retry.run(&format!("delete {key}"), &mut delete).await
        }
        .await;

        match result {
            Ok(true) => {
                info!(record = %key, "Deleted record set");
                metrics::record_operation(key.record_type, "delete", "success", start.elapsed());
                Ok(DeleteOutcome::Deleted)
            }
            Ok(false) => {
                debug!(record = %key, "Record set already absent");
                metrics::record_operation(key.record_type, "delete", "unchanged", start.elapsed());
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(e) => {
                metrics::record_failure(key.record_type, "delete", &e, start.elapsed());
                Err(e)
            }
        }
    }

    /// Returns whether the record set exists on the remote.
    ///
    /// # Errors
    ///
    /// Any remote error other than "not found" is returned unmodified.
    pub async fn exists(&self, key: &RecordKey) -> Result<bool, SyncError> {
        Ok(self.fetch(key).await?.is_some())
    }

    /// Reads a record set and compares it with the last synchronized state.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidIdentifier`] for a bad `id`,
    /// [`SyncError::MalformedRdata`] if the remote rdata does not decode, or
    /// the remote error.
    pub async fn read(&self, id: &str, stored: &RecordState) -> Result<ReadOutcome, SyncError> {
        let start = Instant::now();
        let key: RecordKey = id.parse()?;

        let Some(remote) = self.fetch(&key).await? else {
            info!(record = %key, "Record set is missing on the remote");
            metrics::record_operation(key.record_type, "read", "missing", start.elapsed());
            return Ok(ReadOutcome {
                drift: Drift::Missing,
                remote: None,
            });
        };

        let record = remote_record(&key, remote, stored.declared_rdata.clone())?;

        let mut changed = Vec::new();
        if record.state.fingerprint != stored.fingerprint {
            changed = match codec::decode(key.record_type, &stored.rdata) {
                Ok(before) => diff::changed_fields(&before, &record.record_set.data),
                Err(_) => vec!["rdata".to_string()],
            };
            // Equivalent spellings can still hash differently
            if changed.is_empty() {
                changed.push("rdata".to_string());
            }
        }
        if record.state.ttl != stored.ttl {
            changed.push("ttl".to_string());
        }

        let drift = if changed.is_empty() {
            Drift::InSync
        } else {
            warn!(record = %key, changed = ?changed, "Remote record set drifted from synchronized state");
            Drift::Drifted { changed }
        };
        metrics::record_operation(key.record_type, "read", "success", start.elapsed());
        Ok(ReadOutcome {
            drift,
            remote: Some(record),
        })
    }

    /// Imports an existing record set so it can be managed declaratively.
    ///
    /// Accepts the current and the legacy identifier formats. Every remote
    /// MX exchanger becomes part of the declaration.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidIdentifier`] for a bad `id`, the remote
    /// "not found" error if the set does not exist, or
    /// [`SyncError::MalformedRdata`] if it does not decode.
    pub async fn import(&self, id: &str) -> Result<RemoteRecord, SyncError> {
        let start = Instant::now();
        let key: RecordKey = id.parse()?;

        let remote = self
            .client
            .get_record(&key.zone, &key.host, key.record_type)
            .await?;
        let declared = remote.rdata.clone();
        let record = remote_record(&key, remote, declared)?;

        info!(record = %key, fingerprint = %record.state.fingerprint, "Imported record set");
        metrics::record_operation(key.record_type, "import", "success", start.elapsed());
        Ok(record)
    }

    /// Reads a record set, mapping "not found" to `None`.
    async fn fetch(&self, key: &RecordKey) -> Result<Option<RecordBody>, SyncError> {
        match self
            .client
            .get_record(&key.zone, &key.host, key.record_type)
            .await
        {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.not_found() => {
                debug!(record = %key, "Record set not found on remote");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Re-encodes remote rdata the way a declaration would be encoded.
///
/// Rdata that does not decode is returned unchanged.
fn normalize(record_type: RecordType, rdata: &[String]) -> Vec<String> {
    codec::decode(record_type, rdata)
        .ok()
        .and_then(|data| codec::encode_data(&data).ok())
        .unwrap_or_else(|| rdata.to_vec())
}

fn remote_record(
    key: &RecordKey,
    remote: RecordBody,
    declared_rdata: Vec<String>,
) -> Result<RemoteRecord, SyncError> {
    let data = codec::decode(key.record_type, &remote.rdata)?;
    let record_set = RecordSet {
        zone: key.zone.clone(),
        host: key.host.clone(),
        ttl: remote.ttl,
        active: true,
        data,
    };
    let state = RecordState::new(key, remote.ttl, remote.rdata, declared_rdata);
    Ok(RemoteRecord { record_set, state })
}
