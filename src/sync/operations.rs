// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Remote calls wrapped by the retry policy.

use crate::client::{ConfigDnsClient, RecordBody};
use crate::dns_errors::{ConfigDnsError, SyncError};
use crate::record_type::RecordType;
use crate::retry::RetryableOperation;
use crate::soa::SoaSerialCoordinator;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Whether a write creates or replaces the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Save,
    Update,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Save => "create",
            Self::Update => "update",
        })
    }
}

/// Creates or replaces one record set.
///
/// An SOA write that the remote rejects for a stale serial recovers by
/// bumping the serial in `body`.
pub(crate) struct WriteRecord {
    client: Arc<dyn ConfigDnsClient>,
    soa: SoaSerialCoordinator,
    zone: String,
    mode: WriteMode,
    pub(crate) body: RecordBody,
}

impl WriteRecord {
    pub(crate) fn new(
        client: Arc<dyn ConfigDnsClient>,
        soa: SoaSerialCoordinator,
        zone: &str,
        mode: WriteMode,
        body: RecordBody,
    ) -> Self {
        Self {
            client,
            soa,
            zone: zone.to_string(),
            mode,
            body,
        }
    }
}

#[async_trait]
impl RetryableOperation for WriteRecord {
    type Output = ();

    fn record_type(&self) -> RecordType {
        self.body.record_type
    }

    async fn attempt(&mut self) -> Result<(), ConfigDnsError> {
        match self.mode {
            WriteMode::Save => self.client.save_record(&self.zone, &self.body).await,
            WriteMode::Update => self.client.update_record(&self.zone, &self.body).await,
        }
    }

    async fn recover(&mut self, error: &ConfigDnsError) -> Result<(), SyncError> {
        if self.body.record_type != RecordType::SOA {
            return Err(SyncError::Remote(error.clone()));
        }
        self.soa.bump(&self.zone, &mut self.body).await.map(|_| ())
    }
}

/// Deletes one record set. Yields `false` if it was already gone.
pub(crate) struct DeleteRecord {
    client: Arc<dyn ConfigDnsClient>,
    zone: String,
    host: String,
    record_type: RecordType,
}

impl DeleteRecord {
    pub(crate) fn new(
        client: Arc<dyn ConfigDnsClient>,
        zone: &str,
        host: &str,
        record_type: RecordType,
    ) -> Self {
        Self {
            client,
            zone: zone.to_string(),
            host: host.to_string(),
            record_type,
        }
    }
}

#[async_trait]
impl RetryableOperation for DeleteRecord {
    type Output = bool;

    fn record_type(&self) -> RecordType {
        self.record_type
    }

    async fn attempt(&mut self) -> Result<bool, ConfigDnsError> {
        match self
            .client
            .delete_record(&self.zone, &self.host, self.record_type)
            .await
        {
            Ok(()) => Ok(true),
            Err(e) if e.not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
