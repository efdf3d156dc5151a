// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the record synchronization engine.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Remote API Constants
// ============================================================================

/// Path prefix of the remote DNS configuration API
pub const CONFIG_DNS_API_PREFIX: &str = "/config-dns/v2";

/// Response text the remote API uses for the SOA serial precondition.
///
/// Only the HTTP client boundary matches on this string; the engine works with
/// the structured [`crate::dns_errors::ConfigDnsError::SoaSerialRequired`] kind.
pub const SOA_SERIAL_SENTINEL: &str = "SOA serial number must be incremented";

/// Default timeout for a single HTTP request to the remote API (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Retry Constants
// ============================================================================

/// Default number of attempts (first try included) before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default fixed sleep between attempts after a concurrency conflict (2 seconds)
pub const DEFAULT_CONFLICT_INTERVAL_MILLIS: u64 = 2000;

// ============================================================================
// Record Constants
// ============================================================================

/// Default TTL for declared record sets (5 minutes)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 300;

/// Maximum length of a single DNS character-string
pub const MAX_CHARACTER_STRING_LEN: usize = 255;

/// Separator of the current record identifier format (`zone#host#type`)
pub const RECORD_ID_SEPARATOR: char = '#';

/// Separator of the legacy record identifier format (`zone-host-type-fingerprint`)
pub const LEGACY_RECORD_ID_SEPARATOR: char = '-';

/// The only DNSKEY protocol value permitted by RFC 4034
pub const DNSKEY_PROTOCOL: u8 = 3;

/// Default LOC sphere size in meters (RFC 1876)
pub const LOC_DEFAULT_SIZE_METERS: f64 = 1.0;

/// Default LOC horizontal precision in meters (RFC 1876)
pub const LOC_DEFAULT_HORIZ_PRECISION_METERS: f64 = 10_000.0;

/// Default LOC vertical precision in meters (RFC 1876)
pub const LOC_DEFAULT_VERT_PRECISION_METERS: f64 = 10.0;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

/// Default path of the persisted record state
pub const DEFAULT_STATE_FILE: &str = "configdns-state.json";

// ============================================================================
// Environment Variables
// ============================================================================

/// Overrides the remote API endpoint
pub const ENV_ENDPOINT: &str = "CONFIGDNS_ENDPOINT";

/// Overrides the bearer token sent to the remote API
pub const ENV_ACCESS_TOKEN: &str = "CONFIGDNS_ACCESS_TOKEN";

/// Overrides the retry budget
pub const ENV_MAX_ATTEMPTS: &str = "CONFIGDNS_MAX_ATTEMPTS";

/// Overrides the fixed conflict sleep in milliseconds
pub const ENV_CONFLICT_INTERVAL_MS: &str = "CONFIGDNS_CONFLICT_INTERVAL_MS";
