// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for DNS error types.

#[cfg(test)]
mod tests {
    use crate::dns_errors::*;
    use crate::record_type::RecordType;
    use std::error::Error as _;

    #[test]
    fn test_not_found_classification() {
        let error = ConfigDnsError::NotFound {
            message: "no such record".to_string(),
        };

        assert!(error.not_found());
        assert!(!error.concurrency_conflict());
        assert!(!error.soa_serial_required());
        assert_eq!(error.status_code(), Some(404));
    }

    #[test]
    fn test_concurrency_conflict_classification() {
        let error = ConfigDnsError::ConcurrencyConflict {
            message: "zone is being modified".to_string(),
        };

        assert!(error.concurrency_conflict());
        assert!(!error.not_found());
        assert_eq!(error.status_code(), Some(409));
    }

    #[test]
    fn test_api_error_display() {
        let error = ConfigDnsError::Api {
            status_code: 500,
            message: "boom".to_string(),
        };

        assert_eq!(error.to_string(), "Remote API returned HTTP 500: boom");
    }

    #[test]
    fn test_validation_error_display() {
        let error = SyncError::Validation {
            record: "example.com#example.com#MX".to_string(),
            record_type: RecordType::MX,
            reason: "priority is required".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Invalid MX record set 'example.com#example.com#MX': priority is required"
        );
        assert!(error.is_local());
        assert_eq!(error.status_reason(), "ValidationError");
    }

    #[test]
    fn test_invalid_mx_format_display() {
        let error = SyncError::InvalidMxFormat {
            target: "mail1.example.com.".to_string(),
            declared: 20,
            remote: 10,
        };

        assert!(error.to_string().contains("target order must align with remote"));
        assert_eq!(error.status_reason(), "InvalidMXFormat");
    }

    #[test]
    fn test_remote_error_is_transparent() {
        let remote = ConfigDnsError::Api {
            status_code: 403,
            message: "forbidden".to_string(),
        };
        let error = SyncError::from(remote.clone());

        assert_eq!(error.to_string(), remote.to_string());
        assert_eq!(error.config_dns_error(), Some(&remote));
        assert!(!error.is_local());
        assert_eq!(error.status_reason(), "RemoteApiError");
    }

    #[test]
    fn test_retry_exhausted_keeps_last_error_as_source() {
        let last = ConfigDnsError::ConcurrencyConflict {
            message: "still busy".to_string(),
        };
        let error = SyncError::RetryExhausted {
            operation: "update example.com#www.example.com#A".to_string(),
            attempts: 5,
            last: last.clone(),
        };

        assert_eq!(error.status_reason(), "RetryExhausted");
        assert!(error.config_dns_error().is_none());
        let source = error.source().expect("source should be attached");
        assert_eq!(source.to_string(), last.to_string());
    }

    #[test]
    fn test_is_not_found() {
        let error = SyncError::Remote(ConfigDnsError::NotFound {
            message: String::new(),
        });
        assert!(error.is_not_found());

        let error = SyncError::UnsupportedRecordType {
            record_type: "SVCB".to_string(),
        };
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_only_conflict_and_soa_serial_are_retryable() {
        assert!(ConfigDnsError::ConcurrencyConflict {
            message: String::new()
        }
        .is_retryable());
        assert!(ConfigDnsError::SoaSerialRequired {
            message: String::new()
        }
        .is_retryable());
        assert!(!ConfigDnsError::Api {
            status_code: 500,
            message: String::new()
        }
        .is_retryable());
        assert!(!ConfigDnsError::Transport {
            endpoint: "https://dns.example.net".to_string(),
            reason: "connection refused".to_string()
        }
        .is_retryable());
    }
}
