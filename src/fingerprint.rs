// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Change fingerprints over canonicalized rdata.
//!
//! A fingerprint is a deterministic SHA-256 digest of a record set's rdata
//! tokens. It is stored after every successful synchronization and compared
//! against the remote rdata to detect drift and to skip writes that would not
//! change anything.
//!
//! Tokens are sorted before hashing. For MX the sort key is the numeric
//! `(priority, host)` pair, so the same exchangers listed in a different
//! textual order hash identically, while a changed priority does not.
//!
//! # Example
//!
//! ```rust
//! use configdns_sync::fingerprint::fingerprint;
//! use configdns_sync::record_type::RecordType;
//!
//! let a = fingerprint(RecordType::A, &["192.0.2.2".to_string(), "192.0.2.1".to_string()]);
//! let b = fingerprint(RecordType::A, &["192.0.2.1".to_string(), "192.0.2.2".to_string()]);
//! assert_eq!(a, b);
//! ```

use crate::codec::mx::MxEntry;
use crate::record_type::RecordType;
use sha2::{Digest, Sha256};

/// Returns the tokens in the order they are hashed.
#[must_use]
pub fn canonical_tokens(record_type: RecordType, rdata: &[String]) -> Vec<String> {
    let mut tokens: Vec<String> = rdata.iter().map(|t| t.trim().to_string()).collect();
    if record_type == RecordType::MX {
        // Unparseable tokens sort after valid ones, lexicographically
        tokens.sort_by_cached_key(|t| match MxEntry::parse(t) {
            Ok(entry) => (0u8, entry.priority, entry.host.to_ascii_lowercase()),
            Err(_) => (1u8, 0, t.clone()),
        });
    } else {
        tokens.sort();
    }
    tokens
}

/// Calculates the hex-encoded SHA-256 fingerprint of a record set's rdata.
#[must_use]
pub fn fingerprint(record_type: RecordType, rdata: &[String]) -> String {
    let canonical = canonical_tokens(record_type, rdata).join(" ");
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod fingerprint_tests;
