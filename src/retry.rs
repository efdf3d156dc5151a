// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Bounded retry for remote write operations.
//!
//! [`RetryPolicy`] wraps a [`RetryableOperation`] and asks a classifier what
//! to do with each remote error:
//!
//! - [`RetryDecision::Retry`] - sleep the fixed conflict interval, then try again
//! - [`RetryDecision::Recover`] - let the operation repair its request, then try again
//! - [`RetryDecision::Fail`] - surface the error unmodified
//!
//! The default classifier retries concurrency conflicts and recovers from the
//! SOA serial precondition. Every other remote error fails fast. Once the
//! attempt budget is spent the last error is wrapped in
//! [`SyncError::RetryExhausted`].

use crate::constants::{DEFAULT_CONFLICT_INTERVAL_MILLIS, DEFAULT_MAX_ATTEMPTS};
use crate::dns_errors::{ConfigDnsError, SyncError};
use crate::metrics;
use crate::record_type::RecordType;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep the conflict interval and repeat the same request
    Retry,
    /// Call [`RetryableOperation::recover`] and repeat immediately
    Recover,
    /// Give up and return the error
    Fail,
}

/// Maps a remote error to a [`RetryDecision`].
pub type Classifier = fn(&ConfigDnsError) -> RetryDecision;

/// Retries concurrency conflicts and recovers from the SOA serial precondition.
#[must_use]
pub fn default_classifier(error: &ConfigDnsError) -> RetryDecision {
    match error {
        ConfigDnsError::ConcurrencyConflict { .. } => RetryDecision::Retry,
        ConfigDnsError::SoaSerialRequired { .. } => RetryDecision::Recover,
        _ => RetryDecision::Fail,
    }
}

/// A remote call that can be attempted more than once.
#[async_trait]
pub trait RetryableOperation: Send {
    type Output: Send;

    /// Record type the operation acts on, for logs and metrics.
    fn record_type(&self) -> RecordType;

    /// Performs one attempt.
    async fn attempt(&mut self) -> Result<Self::Output, ConfigDnsError>;

    /// Repairs the request after an error classified as [`RetryDecision::Recover`].
    ///
    /// Operations that cannot recover keep the default, which fails with the
    /// original error.
    async fn recover(&mut self, error: &ConfigDnsError) -> Result<(), SyncError> {
        Err(SyncError::Remote(error.clone()))
    }
}

/// Bounded, fixed-interval retry policy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts including the first one
    pub max_attempts: u32,
    /// Sleep between attempts after a [`RetryDecision::Retry`]
    pub conflict_interval: Duration,
    /// Decides what to do with each remote error
    pub classifier: Classifier,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            conflict_interval: Duration::from_millis(DEFAULT_CONFLICT_INTERVAL_MILLIS),
            classifier: default_classifier,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, conflict_interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            conflict_interval,
            classifier: default_classifier,
        }
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Runs `operation` until it succeeds, fails fast or exhausts the budget.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Remote`] for errors the classifier rejects
    /// - [`SyncError::RetryExhausted`] once `max_attempts` attempts have failed
    /// - whatever [`RetryableOperation::recover`] returns if recovery fails
    pub async fn run<O>(&self, operation_name: &str, operation: &mut O) -> Result<O::Output, SyncError>
    where
        O: RetryableOperation,
    {
        let record_type = operation.record_type();
        let start_time = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let e = match operation.attempt().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(
                            operation = operation_name,
                            attempt = attempt,
                            elapsed = ?start_time.elapsed(),
                            "Remote call succeeded after retries"
                        );
                    } else {
                        debug!(operation = operation_name, "Remote call succeeded");
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            match (self.classifier)(&e) {
                RetryDecision::Fail => {
                    error!(
                        operation = operation_name,
                        error = %e,
                        "Non-retryable remote error, failing immediately"
                    );
                    return Err(SyncError::Remote(e));
                }
                _ if attempt >= self.max_attempts => {
                    error!(
                        operation = operation_name,
                        attempt = attempt,
                        elapsed = ?start_time.elapsed(),
                        error = %e,
                        "Retry budget exhausted, giving up"
                    );
                    return Err(SyncError::RetryExhausted {
                        operation: operation_name.to_string(),
                        attempts: attempt,
                        last: e,
                    });
                }
                RetryDecision::Retry => {
                    metrics::record_retry(record_type, "concurrency_conflict");
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        retry_after = ?self.conflict_interval,
                        error = %e,
                        "Concurrency conflict, will retry"
                    );
                    tokio::time::sleep(self.conflict_interval).await;
                }
                RetryDecision::Recover => {
                    metrics::record_retry(record_type, "soa_serial");
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        error = %e,
                        "Remote requested recovery, repairing request before retry"
                    );
                    operation.recover(&e).await?;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
