// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the record synchronization engine.
//!
//! All metrics share the namespace prefix `configdns_sync_`.
//!
//! # Metrics Categories
//!
//! - **Operation Metrics** - Synchronization operations, their outcomes and duration
//! - **Retry Metrics** - Retries after concurrency conflicts and SOA serial bumps
//! - **Error Metrics** - Failures by record type and reason
//!
//! # Example
//!
//! ```rust
//! use configdns_sync::metrics::{gather_metrics, record_operation};
//! use configdns_sync::record_type::RecordType;
//!
//! record_operation(RecordType::A, "create", "success", std::time::Duration::from_millis(40));
//! assert!(gather_metrics().unwrap().contains("configdns_sync_sync_operations_total"));
//! ```

use crate::dns_errors::SyncError;
use crate::record_type::RecordType;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "configdns_sync";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Operation Metrics
// ============================================================================

/// Total number of synchronization operations
///
/// Labels:
/// - `record_type`: Record type (e.g., `A`, `MX`)
/// - `operation`: `create`, `update`, `delete`, `read`, `import`
/// - `status`: `success`, `unchanged`, `error`
pub static SYNC_OPERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_sync_operations_total"),
        "Total number of synchronization operations by record type, operation and status",
    );
    let counter = CounterVec::new(opts, &["record_type", "operation", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of synchronization operations in seconds, lock wait included
///
/// Labels:
/// - `record_type`: Record type
/// - `operation`: Operation name
pub static SYNC_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_sync_duration_seconds"),
        "Duration of synchronization operations in seconds by record type and operation",
    )
    .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["record_type", "operation"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Retry Metrics
// ============================================================================

/// Total number of retried remote calls
///
/// Labels:
/// - `record_type`: Record type
/// - `reason`: `concurrency_conflict` or `soa_serial`
pub static RETRIES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_retries_total"),
        "Total number of retried remote calls by record type and reason",
    );
    let counter = CounterVec::new(opts, &["record_type", "reason"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Total number of SOA serial increments
///
/// Labels:
/// - `zone`: Zone whose serial was bumped
pub static SOA_SERIAL_BUMPS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_soa_serial_bumps_total"),
        "Total number of SOA serial increments by zone",
    );
    let counter = CounterVec::new(opts, &["zone"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of errors
///
/// Labels:
/// - `record_type`: Record type
/// - `error_type`: Stable reason code from [`SyncError::status_reason`]
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_errors_total"),
        "Total number of errors by record type and error type",
    );
    let counter = CounterVec::new(opts, &["record_type", "error_type"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record the outcome and duration of one synchronization operation
pub fn record_operation(record_type: RecordType, operation: &str, status: &str, duration: Duration) {
    SYNC_OPERATIONS_TOTAL
        .with_label_values(&[record_type.as_str(), operation, status])
        .inc();
    SYNC_DURATION_SECONDS
        .with_label_values(&[record_type.as_str(), operation])
        .observe(duration.as_secs_f64());
}

/// Record a failed operation, labelled by its reason code
pub fn record_failure(record_type: RecordType, operation: &str, error: &SyncError, duration: Duration) {
    record_operation(record_type, operation, "error", duration);
    ERRORS_TOTAL
        .with_label_values(&[record_type.as_str(), error.status_reason()])
        .inc();
}

/// Record one retry
///
/// # Arguments
/// * `record_type` - Record type of the retried operation
/// * `reason` - `concurrency_conflict` or `soa_serial`
pub fn record_retry(record_type: RecordType, reason: &str) {
    RETRIES_TOTAL
        .with_label_values(&[record_type.as_str(), reason])
        .inc();
}

/// Record an SOA serial increment
pub fn record_soa_bump(zone: &str) {
    SOA_SERIAL_BUMPS_TOTAL.with_label_values(&[zone]).inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
