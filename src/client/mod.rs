// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Boundary to the remote DNS configuration API.
//!
//! The engine only talks to the remote service through [`ConfigDnsClient`],
//! which returns structured [`ConfigDnsError`] kinds. [`http::HttpConfigDnsClient`]
//! is the production implementation; tests substitute in-memory fakes.
//!
//! # Wire format
//!
//! Record sets are exchanged as [`RecordBody`]:
//!
//! ```json
//! { "name": "www.example.com", "type": "A", "ttl": 300, "rdata": ["192.0.2.1"] }
//! ```

pub mod http;

use crate::dns_errors::ConfigDnsError;
use crate::record_type::RecordType;
use crate::zone::{TsigKey, ZoneType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One record set as the remote API represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordBody {
    /// Owner name
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Time to live in seconds
    pub ttl: u32,
    /// One token per resource record
    pub rdata: Vec<String>,
}

/// A zone as the remote API represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBody {
    pub zone: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tsig_key: Option<TsigKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub sign_and_serve: bool,
}

/// Operations the engine needs from the remote DNS configuration API.
///
/// Every method maps a remote failure to a [`ConfigDnsError`] kind; callers
/// never inspect response text.
#[async_trait]
pub trait ConfigDnsClient: Send + Sync {
    /// Reads the record set `(zone, name, record_type)`.
    async fn get_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<RecordBody, ConfigDnsError>;

    /// Creates a record set that does not exist yet.
    async fn save_record(&self, zone: &str, record: &RecordBody) -> Result<(), ConfigDnsError>;

    /// Replaces an existing record set.
    async fn update_record(&self, zone: &str, record: &RecordBody) -> Result<(), ConfigDnsError>;

    /// Deletes a whole record set.
    async fn delete_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<(), ConfigDnsError>;

    /// Reads a zone.
    async fn get_zone(&self, zone: &str) -> Result<ZoneBody, ConfigDnsError>;

    /// Creates a zone under a contract and group.
    async fn create_zone(
        &self,
        zone: &ZoneBody,
        contract_id: &str,
        group_id: &str,
    ) -> Result<(), ConfigDnsError>;
}
