// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The closed set of resource record types the engine can synchronize.

use crate::dns_errors::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource record type.
///
/// Every variant has exactly one encode/decode/validate implementation in
/// [`crate::codec`]; adding a variant without one is a compile error.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    A,
    AAAA,
    AFSDB,
    CAA,
    CERT,
    CNAME,
    DNSKEY,
    DS,
    HINFO,
    LOC,
    MX,
    NAPTR,
    NS,
    PTR,
    RP,
    SOA,
    SPF,
    SRV,
    SSHFP,
    TLSA,
    TXT,
}

impl RecordType {
    /// All supported record types, used to pre-allocate one lock per type.
    pub const ALL: [RecordType; 21] = [
        RecordType::A,
        RecordType::AAAA,
        RecordType::AFSDB,
        RecordType::CAA,
        RecordType::CERT,
        RecordType::CNAME,
        RecordType::DNSKEY,
        RecordType::DS,
        RecordType::HINFO,
        RecordType::LOC,
        RecordType::MX,
        RecordType::NAPTR,
        RecordType::NS,
        RecordType::PTR,
        RecordType::RP,
        RecordType::SOA,
        RecordType::SPF,
        RecordType::SRV,
        RecordType::SSHFP,
        RecordType::TLSA,
        RecordType::TXT,
    ];

    /// Wire name of the type as the remote API spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::AFSDB => "AFSDB",
            Self::CAA => "CAA",
            Self::CERT => "CERT",
            Self::CNAME => "CNAME",
            Self::DNSKEY => "DNSKEY",
            Self::DS => "DS",
            Self::HINFO => "HINFO",
            Self::LOC => "LOC",
            Self::MX => "MX",
            Self::NAPTR => "NAPTR",
            Self::NS => "NS",
            Self::PTR => "PTR",
            Self::RP => "RP",
            Self::SOA => "SOA",
            Self::SPF => "SPF",
            Self::SRV => "SRV",
            Self::SSHFP => "SSHFP",
            Self::TLSA => "TLSA",
            Self::TXT => "TXT",
        }
    }

    /// Whether the rdata of this type is an unordered set of values.
    ///
    /// Unordered types are stored and compared in sorted order. MX keeps the
    /// order produced by reconciliation against the remote record set.
    #[must_use]
    pub const fn is_unordered(self) -> bool {
        !matches!(self, Self::MX)
    }

    /// Whether a record set of this type holds exactly one resource record.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self, Self::CNAME | Self::SOA)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| SyncError::UnsupportedRecordType {
                record_type: s.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "record_type_tests.rs"]
mod record_type_tests;
