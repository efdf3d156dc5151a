// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Persisted synchronization state.
//!
//! After a record set has been written and read back, its identifier, rdata
//! and fingerprint are recorded as a [`RecordState`]. The state is what drift
//! detection compares against and what MX reconciliation uses to tell which
//! exchangers were declared before.
//!
//! [`StateStore`] keeps the states in a JSON file keyed by record identifier.
//! A state is only stored after a successful synchronization; a failed
//! operation leaves the previous entry untouched.

use crate::fingerprint::fingerprint;
use crate::record_type::RecordType;
use crate::recordset::RecordKey;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Last synchronized state of one record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordState {
    /// Identifier in the current `zone#host#type` format
    pub id: String,
    pub zone: String,
    pub host: String,
    pub record_type: RecordType,
    pub ttl: u32,
    /// Rdata as read back from the remote after the write
    pub rdata: Vec<String>,
    /// Fingerprint of `rdata`
    pub fingerprint: String,
    /// Encoded declared rdata, before MX reconciliation merged remote entries in
    #[serde(default)]
    pub declared_rdata: Vec<String>,
    pub synced_at: DateTime<Utc>,
}

impl RecordState {
    /// Builds a state and computes its fingerprint.
    #[must_use]
    pub fn new(key: &RecordKey, ttl: u32, rdata: Vec<String>, declared_rdata: Vec<String>) -> Self {
        Self {
            id: key.id(),
            zone: key.zone.clone(),
            host: key.host.clone(),
            record_type: key.record_type,
            ttl,
            fingerprint: fingerprint(key.record_type, &rdata),
            rdata,
            declared_rdata,
            synced_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.zone, &self.host, self.record_type)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    records: BTreeMap<String, RecordState>,
}

/// JSON-file-backed store of [`RecordState`]s.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    records: BTreeMap<String, RecordState>,
}

impl StateStore {
    /// Loads the store from `path`. A missing file yields an empty store.
    ///
    /// Entries keyed by a legacy identifier are re-keyed to the current format.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str::<StateFile>(&text)
                .with_context(|| format!("Failed to parse state file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No state file yet, starting empty");
                StateFile::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read state file {}", path.display()))
            }
        };

        let mut records = BTreeMap::new();
        for (id, mut state) in file.records {
            match id.parse::<RecordKey>() {
                Ok(key) => {
                    let current = key.id();
                    if current != id {
                        info!(legacy_id = %id, id = %current, "Migrated legacy record identifier");
                    }
                    state.id.clone_from(&current);
                    records.insert(current, state);
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Dropping state entry with unparseable identifier");
                }
            }
        }

        Ok(Self { path, records })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self, key: &RecordKey) -> Option<&RecordState> {
        self.records.get(&key.id())
    }

    pub fn put(&mut self, state: RecordState) {
        self.records.insert(state.id.clone(), state);
    }

    pub fn remove(&mut self, key: &RecordKey) -> Option<RecordState> {
        self.records.remove(&key.id())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordState> {
        self.records.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the store back to disk, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self) -> Result<()> {
        let file = StateFile {
            records: self.records.clone(),
        };
        let json = serde_json::to_string_pretty(&file).context("Failed to serialize state")?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace state file {}", self.path.display()))?;

        debug!(path = %self.path.display(), records = self.records.len(), "Saved state");
        Ok(())
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
