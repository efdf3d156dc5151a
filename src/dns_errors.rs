// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Remote API and synchronization error types.
//!
//! This module provides two layers of errors:
//! - [`ConfigDnsError`] classifies failures reported by the remote DNS
//!   configuration API (not found, concurrency conflict, SOA precondition, ...)
//! - [`SyncError`] is the engine taxonomy surfaced to callers of the
//!   synchronization operations
//!
//! Classification is structured: nothing outside the HTTP client boundary
//! inspects response text.

use crate::record_type::RecordType;
use thiserror::Error;

/// Errors reported by the remote DNS configuration API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigDnsError {
    /// The zone or record set does not exist (HTTP 404)
    #[error("Resource not found on remote API: {message}")]
    NotFound {
        /// Message returned by the remote API
        message: String,
    },

    /// Another writer modified the zone concurrently (HTTP 409)
    ///
    /// Transient. The same request is expected to succeed once the competing
    /// change has been committed.
    #[error("Concurrency conflict reported by remote API: {message}")]
    ConcurrencyConflict {
        /// Message returned by the remote API
        message: String,
    },

    /// The remote API refused an SOA write because the serial was not incremented
    #[error("SOA serial precondition failed: {message}")]
    SoaSerialRequired {
        /// Message returned by the remote API
        message: String,
    },

    /// Any other HTTP error response
    #[error("Remote API returned HTTP {status_code}: {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Response body or error message
        message: String,
    },

    /// The request never produced an HTTP response (connection refused, timeout, ...)
    #[error("HTTP request to {endpoint} failed: {reason}")]
    Transport {
        /// The URL that couldn't be reached
        endpoint: String,
        /// Reason for the failure
        reason: String,
    },

    /// The response body could not be decoded
    #[error("Failed to decode remote API response: {reason}")]
    Decode {
        /// Decoder error
        reason: String,
    },
}

impl ConfigDnsError {
    /// Returns true if the remote reported the resource as absent.
    #[must_use]
    pub fn not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the remote reported a transient concurrency conflict.
    #[must_use]
    pub fn concurrency_conflict(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }

    /// Returns true if the remote requires the SOA serial to be incremented.
    #[must_use]
    pub fn soa_serial_required(&self) -> bool {
        matches!(self, Self::SoaSerialRequired { .. })
    }

    /// Returns true for the two kinds the remote reports as transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.concurrency_conflict() || self.soa_serial_required()
    }

    /// HTTP status code carried by the error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::ConcurrencyConflict { .. } => Some(409),
            Self::Api { status_code, .. } => Some(*status_code),
            Self::SoaSerialRequired { .. } | Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Errors surfaced by the synchronization engine.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// Declared configuration failed type-specific checks. Never sent to the remote.
    #[error("Invalid {record_type} record set '{record}': {reason}")]
    Validation {
        /// Identifier of the offending record set
        record: String,
        /// Record type being validated
        record_type: RecordType,
        /// Explanation of what is invalid
        reason: String,
    },

    /// The record type has no codec
    #[error("Unsupported record type '{record_type}'")]
    UnsupportedRecordType {
        /// The type string as declared or returned by the remote
        record_type: String,
    },

    /// A declared MX target disagrees with the priority it already has on the remote
    #[error(
        "Invalid MX format for '{target}': declared priority {declared} but remote has {remote}; target order must align with remote"
    )]
    InvalidMxFormat {
        /// The mail exchanger host name
        target: String,
        /// Priority computed from the declaration
        declared: u16,
        /// Priority present in the remote record set
        remote: u16,
    },

    /// Remote rdata could not be parsed into typed fields
    #[error("Malformed {record_type} rdata '{rdata}': {reason}")]
    MalformedRdata {
        /// Record type being decoded
        record_type: RecordType,
        /// The offending rdata token
        rdata: String,
        /// Explanation of what is malformed
        reason: String,
    },

    /// A record identifier matched neither the current nor the legacy format
    #[error("Invalid record identifier '{id}': {reason}")]
    InvalidIdentifier {
        /// The identifier as given
        id: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// Zone declaration violated the zone type invariants
    #[error("Invalid zone configuration for '{zone}': {reason}")]
    InvalidZone {
        /// The zone name
        zone: String,
        /// Explanation of what is invalid
        reason: String,
    },

    /// The retry budget ran out while the remote kept reporting a recoverable error
    #[error("{operation} gave up after {attempts} attempts: {last}")]
    RetryExhausted {
        /// Human-readable operation name
        operation: String,
        /// Number of attempts made
        attempts: u32,
        /// The last error reported by the remote
        #[source]
        last: ConfigDnsError,
    },

    /// Any non-recoverable remote error, surfaced unmodified
    #[error(transparent)]
    Remote(#[from] ConfigDnsError),
}

impl SyncError {
    /// Returns the underlying remote error when this error originated from the remote API.
    ///
    /// Retry exhaustion is not unwrapped; use the `last` field for that.
    #[must_use]
    pub fn config_dns_error(&self) -> Option<&ConfigDnsError> {
        match self {
            Self::Remote(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the error is a remote "not found".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.config_dns_error().is_some_and(ConfigDnsError::not_found)
    }

    /// Returns true if the error was produced locally, before any remote call.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::UnsupportedRecordType { .. }
                | Self::InvalidMxFormat { .. }
                | Self::MalformedRdata { .. }
                | Self::InvalidIdentifier { .. }
                | Self::InvalidZone { .. }
        )
    }

    /// Returns a stable reason code for logs, CLI output and metric labels.
    #[must_use]
    pub fn status_reason(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::UnsupportedRecordType { .. } => "UnsupportedRecordType",
            Self::InvalidMxFormat { .. } => "InvalidMXFormat",
            Self::MalformedRdata { .. } => "MalformedRdata",
            Self::InvalidIdentifier { .. } => "InvalidIdentifier",
            Self::InvalidZone { .. } => "InvalidZoneConfiguration",
            Self::RetryExhausted { .. } => "RetryExhausted",
            Self::Remote(ConfigDnsError::NotFound { .. }) => "NotFound",
            Self::Remote(ConfigDnsError::ConcurrencyConflict { .. }) => "ConcurrencyConflict",
            Self::Remote(ConfigDnsError::SoaSerialRequired { .. }) => "SOASerialRequired",
            Self::Remote(ConfigDnsError::Api { .. }) => "RemoteApiError",
            Self::Remote(ConfigDnsError::Transport { .. }) => "RemoteUnreachable",
            Self::Remote(ConfigDnsError::Decode { .. }) => "RemoteDecodeError",
        }
    }
}

#[cfg(test)]
#[path = "dns_errors_tests.rs"]
mod dns_errors_tests;
