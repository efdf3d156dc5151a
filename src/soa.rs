// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! SOA serial coordination.
//!
//! When the remote rejects an SOA write because the serial did not advance,
//! [`SoaSerialCoordinator::bump`] reads the serial currently held by the
//! remote, sets the pending write's serial to exactly one more, and re-encodes
//! the write. The retry policy then repeats the request.
//!
//! The increment uses serial number arithmetic (RFC 1982), so `u32::MAX`
//! advances to `0`. A bump never moves more than one step past the remote
//! serial.

use crate::client::{ConfigDnsClient, RecordBody};
use crate::codec::{self, soa};
use crate::dns_errors::SyncError;
use crate::metrics;
use crate::record_type::RecordType;
use std::sync::Arc;
use tracing::info;

/// Computes the serial that follows `serial`.
#[must_use]
pub fn next_serial(serial: u32) -> u32 {
    serial.wrapping_add(1)
}

/// Re-serializes SOA writes that the remote rejected for a stale serial.
#[derive(Clone)]
pub struct SoaSerialCoordinator {
    client: Arc<dyn ConfigDnsClient>,
}

impl SoaSerialCoordinator {
    #[must_use]
    pub fn new(client: Arc<dyn ConfigDnsClient>) -> Self {
        Self { client }
    }

    /// Reads the remote SOA serial of `zone`.
    ///
    /// # Errors
    ///
    /// Returns the remote error, or [`SyncError::MalformedRdata`] if the
    /// remote SOA cannot be decoded.
    pub async fn remote_serial(&self, zone: &str, apex: &str) -> Result<u32, SyncError> {
        let remote = self.client.get_record(zone, apex, RecordType::SOA).await?;
        let data = codec::decode(RecordType::SOA, &remote.rdata)?;
        soa::serial(&data).ok_or_else(|| SyncError::MalformedRdata {
            record_type: RecordType::SOA,
            rdata: remote.rdata.join(" | "),
            reason: "remote record carries no serial".to_string(),
        })
    }

    /// Sets the serial of a pending SOA write to the remote serial plus one.
    ///
    /// Returns the new serial.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the current SOA cannot be read, or
    /// [`SyncError::MalformedRdata`] if `body` is not a decodable SOA write.
    pub async fn bump(&self, zone: &str, body: &mut RecordBody) -> Result<u32, SyncError> {
        let malformed = |body: &RecordBody, reason: String| SyncError::MalformedRdata {
            record_type: body.record_type,
            rdata: body.rdata.join(" | "),
            reason,
        };
        if body.record_type != RecordType::SOA {
            return Err(malformed(body, "only SOA writes carry a serial".to_string()));
        }

        let current = self.remote_serial(zone, &body.name).await?;
        let next = next_serial(current);

        let mut data = codec::decode(RecordType::SOA, &body.rdata)?;
        soa::set_serial(&mut data, next);
        let rdata = codec::encode_data(&data).map_err(|reason| malformed(body, reason))?;
        body.rdata = rdata;

        metrics::record_soa_bump(zone);
        info!(
            zone = %zone,
            remote_serial = current,
            serial = next,
            "Incremented SOA serial after remote precondition failure"
        );
        Ok(next)
    }
}

#[cfg(test)]
#[path = "soa_tests.rs"]
mod soa_tests;
