// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Declared record sets and their identifiers.
//!
//! A [`RecordSet`] is the unit of synchronization: all resource records that
//! share `(zone, host, type)`. The identity triple is immutable; changing any
//! part of it means deleting one record set and creating another.
//!
//! The type-specific attributes live in [`RecordData`], a tagged variant with
//! one shape per supported [`RecordType`].
//!
//! # Example
//!
//! ```rust
//! use configdns_sync::recordset::{RecordData, RecordSet};
//!
//! let set: RecordSet = serde_yaml::from_str(
//!     r#"
//! zone: example.com
//! host: mail.example.com
//! recordType: MX
//! ttl: 3600
//! target: ["mx1.example.com", "mx2.example.com"]
//! priority: 10
//! priorityIncrement: 10
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(set.id(), "example.com#mail.example.com#MX");
//! assert!(matches!(set.data, RecordData::MX { .. }));
//! ```

use crate::constants::{DEFAULT_RECORD_TTL_SECS, LEGACY_RECORD_ID_SEPARATOR, RECORD_ID_SEPARATOR};
use crate::dns_errors::SyncError;
use crate::record_type::RecordType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn default_ttl() -> u32 {
    DEFAULT_RECORD_TTL_SECS
}

fn default_active() -> bool {
    true
}

/// A declared record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSet {
    /// Zone the record set belongs to (e.g. `example.com`)
    pub zone: String,

    /// Fully-qualified owner name (e.g. `www.example.com`)
    pub host: String,

    /// Time to live in seconds
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Whether the record set is meant to be served. Inactive sets are skipped by `apply`.
    #[serde(default = "default_active")]
    pub active: bool,

    /// Type-specific attributes, tagged by `recordType`
    #[serde(flatten)]
    pub data: RecordData,
}

impl RecordSet {
    /// Record type of this set, derived from its attributes.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }

    /// Identity triple of this record set.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.zone, &self.host, self.record_type())
    }

    /// Identifier in the current `zone#host#type` format.
    #[must_use]
    pub fn id(&self) -> String {
        self.key().id()
    }
}

/// One CAA property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaaEntry {
    /// Flags octet (0 or 128 for issuer-critical)
    #[serde(default)]
    pub flags: u8,
    /// Property tag, e.g. `issue`, `issuewild`, `iodef`
    pub tag: String,
    /// Property value, unquoted
    pub value: String,
}

/// Type-specific attributes of a record set.
///
/// Types whose record sets hold several independent values carry a `target`
/// list. Structured types carry dedicated scalar fields.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "recordType", rename_all_fields = "camelCase")]
pub enum RecordData {
    A {
        target: Vec<String>,
    },
    AAAA {
        target: Vec<String>,
    },
    AFSDB {
        target: Vec<String>,
        subtype: u16,
    },
    CAA {
        target: Vec<CaaEntry>,
    },
    CERT {
        /// Certificate type, mnemonic (`PKIX`) or numeric
        cert_type: String,
        keytag: u16,
        algorithm: u8,
        certificate: String,
    },
    CNAME {
        target: Vec<String>,
    },
    DNSKEY {
        flags: u16,
        protocol: u8,
        algorithm: u8,
        key: String,
    },
    DS {
        keytag: u16,
        algorithm: u8,
        digest_type: u8,
        digest: String,
    },
    HINFO {
        hardware: String,
        software: String,
    },
    LOC {
        target: Vec<String>,
    },
    MX {
        /// Mail exchangers, either bare host names or explicit `"<priority> <host>"` entries
        target: Vec<String>,
        /// Base priority for bare host names
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u16>,
        /// Added to the priority after each bare host name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority_increment: Option<u16>,
    },
    NAPTR {
        order: u16,
        preference: u16,
        flags: String,
        service: String,
        regexp: String,
        replacement: String,
    },
    NS {
        target: Vec<String>,
    },
    PTR {
        target: Vec<String>,
    },
    RP {
        mailbox: String,
        txt: String,
    },
    SOA {
        name_server: String,
        email_address: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expiry: u32,
        nxdomain_ttl: u32,
    },
    SPF {
        target: Vec<String>,
    },
    SRV {
        /// Service targets, either bare host names or explicit `"<priority> <weight> <port> <host>"` entries
        target: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<u16>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weight: Option<u16>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        port: Option<u16>,
    },
    SSHFP {
        algorithm: u8,
        fingerprint_type: u8,
        fingerprint: String,
    },
    TLSA {
        usage: u8,
        selector: u8,
        match_type: u8,
        certificate: String,
    },
    TXT {
        target: Vec<String>,
    },
}

impl RecordData {
    /// Record type this variant describes.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A { .. } => RecordType::A,
            Self::AAAA { .. } => RecordType::AAAA,
            Self::AFSDB { .. } => RecordType::AFSDB,
            Self::CAA { .. } => RecordType::CAA,
            Self::CERT { .. } => RecordType::CERT,
            Self::CNAME { .. } => RecordType::CNAME,
            Self::DNSKEY { .. } => RecordType::DNSKEY,
            Self::DS { .. } => RecordType::DS,
            Self::HINFO { .. } => RecordType::HINFO,
            Self::LOC { .. } => RecordType::LOC,
            Self::MX { .. } => RecordType::MX,
            Self::NAPTR { .. } => RecordType::NAPTR,
            Self::NS { .. } => RecordType::NS,
            Self::PTR { .. } => RecordType::PTR,
            Self::RP { .. } => RecordType::RP,
            Self::SOA { .. } => RecordType::SOA,
            Self::SPF { .. } => RecordType::SPF,
            Self::SRV { .. } => RecordType::SRV,
            Self::SSHFP { .. } => RecordType::SSHFP,
            Self::TLSA { .. } => RecordType::TLSA,
            Self::TXT { .. } => RecordType::TXT,
        }
    }

    /// The plain `target` list, for variants that have one.
    #[must_use]
    pub fn targets(&self) -> Option<&[String]> {
        match self {
            Self::A { target }
            | Self::AAAA { target }
            | Self::AFSDB { target, .. }
            | Self::CNAME { target }
            | Self::LOC { target }
            | Self::MX { target, .. }
            | Self::NS { target }
            | Self::PTR { target }
            | Self::SPF { target }
            | Self::SRV { target, .. }
            | Self::TXT { target } => Some(target),
            _ => None,
        }
    }
}

/// Identity triple of a record set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub zone: String,
    pub host: String,
    pub record_type: RecordType,
}

impl RecordKey {
    #[must_use]
    pub fn new(zone: &str, host: &str, record_type: RecordType) -> Self {
        Self {
            zone: zone.to_string(),
            host: host.to_string(),
            record_type,
        }
    }

    /// Identifier in the current `zone#host#type` format.
    #[must_use]
    pub fn id(&self) -> String {
        format!(
            "{zone}{sep}{host}{sep}{rtype}",
            zone = self.zone,
            host = self.host,
            rtype = self.record_type,
            sep = RECORD_ID_SEPARATOR
        )
    }

    /// Whether the owner name is the zone apex.
    #[must_use]
    pub fn is_apex(&self) -> bool {
        names_equal(&self.host, &self.zone)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for RecordKey {
    type Err = SyncError;

    /// Parses a record identifier.
    ///
    /// Accepts the current `zone#host#type` format and, for state written by
    /// older releases, the legacy `zone-host-type-fingerprint` format.
    fn from_str(id: &str) -> Result<Self, Self::Err> {
        if id.contains(RECORD_ID_SEPARATOR) {
            parse_current_id(id)
        } else {
            parse_legacy_id(id)
        }
    }
}

fn invalid_id(id: &str, reason: &str) -> SyncError {
    SyncError::InvalidIdentifier {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_current_id(id: &str) -> Result<RecordKey, SyncError> {
    let parts: Vec<&str> = id.split(RECORD_ID_SEPARATOR).collect();
    let [zone, host, rtype] = parts.as_slice() else {
        return Err(invalid_id(id, "expected <zone>#<host>#<recordtype>"));
    };
    if zone.is_empty() || host.is_empty() {
        return Err(invalid_id(id, "zone and host must not be empty"));
    }
    let record_type = rtype.parse::<RecordType>()?;
    Ok(RecordKey::new(zone, host, record_type))
}

fn parse_legacy_id(id: &str) -> Result<RecordKey, SyncError> {
    let mut parts = id.rsplitn(3, LEGACY_RECORD_ID_SEPARATOR);
    let (Some(fingerprint), Some(rtype), Some(zone_and_host)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid_id(
            id,
            "expected <zone>#<host>#<recordtype> or <zone>-<host>-<recordtype>-<fingerprint>",
        ));
    };
    if fingerprint.is_empty() || !fingerprint.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid_id(id, "legacy fingerprint segment is malformed"));
    }
    let record_type = rtype
        .parse::<RecordType>()
        .map_err(|_| invalid_id(id, "legacy record type segment is not a supported type"))?;

    // Zone and host may both contain '-'; the host is always inside the zone,
    // which pins down the split point.
    let split = zone_and_host
        .match_indices(LEGACY_RECORD_ID_SEPARATOR)
        .map(|(i, _)| i)
        .find(|&i| {
            let zone = &zone_and_host[..i];
            let host = &zone_and_host[i + 1..];
            !zone.is_empty() && host_in_zone(host, zone)
        })
        .ok_or_else(|| invalid_id(id, "cannot separate zone from host"))?;

    Ok(RecordKey::new(
        &zone_and_host[..split],
        &zone_and_host[split + 1..],
        record_type,
    ))
}

fn trim_dot(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Case-insensitive DNS name comparison that ignores a trailing root dot.
#[must_use]
pub fn names_equal(a: &str, b: &str) -> bool {
    trim_dot(a).eq_ignore_ascii_case(trim_dot(b))
}

/// Whether `host` is the zone apex or a name below it.
#[must_use]
pub fn host_in_zone(host: &str, zone: &str) -> bool {
    let host = trim_dot(host).to_ascii_lowercase();
    let zone = trim_dot(zone).to_ascii_lowercase();
    !zone.is_empty() && (host == zone || host.ends_with(&format!(".{zone}")))
}

#[cfg(test)]
#[path = "recordset_tests.rs"]
mod recordset_tests;
