// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `retry.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::collections::VecDeque;

    /// Replays a fixed list of outcomes, then succeeds.
    struct Scripted {
        outcomes: VecDeque<ConfigDnsError>,
        attempts: u32,
        recoveries: u32,
        recover_fails: bool,
    }

    impl Scripted {
        fn new(outcomes: Vec<ConfigDnsError>) -> Self {
            Self {
                outcomes: outcomes.into(),
                attempts: 0,
                recoveries: 0,
                recover_fails: false,
            }
        }
    }

    #[async_trait]
    impl RetryableOperation for Scripted {
        type Output = u32;

        fn record_type(&self) -> RecordType {
            RecordType::A
        }

        async fn attempt(&mut self) -> Result<u32, ConfigDnsError> {
            self.attempts += 1;
            match self.outcomes.pop_front() {
                Some(e) => Err(e),
                None => Ok(self.attempts),
            }
        }

        async fn recover(&mut self, error: &ConfigDnsError) -> Result<(), SyncError> {
            self.recoveries += 1;
            if self.recover_fails {
                return Err(SyncError::Remote(error.clone()));
            }
            Ok(())
        }
    }

    fn conflict() -> ConfigDnsError {
        ConfigDnsError::ConcurrencyConflict {
            message: "zone is locked".to_string(),
        }
    }

    fn soa() -> ConfigDnsError {
        ConfigDnsError::SoaSerialRequired {
            message: "SOA serial number must be incremented".to_string(),
        }
    }

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(10))
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.conflict_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_default_classifier() {
        assert_eq!(default_classifier(&conflict()), RetryDecision::Retry);
        assert_eq!(default_classifier(&soa()), RetryDecision::Recover);
        assert_eq!(
            default_classifier(&ConfigDnsError::NotFound {
                message: String::new()
            }),
            RetryDecision::Fail
        );
        assert_eq!(
            default_classifier(&ConfigDnsError::Api {
                status_code: 500,
                message: String::new()
            }),
            RetryDecision::Fail
        );
    }

    #[tokio::test]
    async fn test_conflicts_then_success_sleeps_between_attempts() {
        let mut op = Scripted::new(vec![conflict(), conflict()]);
        let started = Instant::now();

        let result = fast(5).run("update A", &mut op).await.unwrap();

        assert_eq!(result, 3);
        assert_eq!(op.attempts, 3);
        assert_eq!(op.recoveries, 0);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_fast() {
        let mut op = Scripted::new(vec![ConfigDnsError::Api {
            status_code: 400,
            message: "bad request".to_string(),
        }]);

        let err = fast(5).run("update A", &mut op).await.unwrap_err();

        assert_eq!(op.attempts, 1);
        assert!(matches!(
            err,
            SyncError::Remote(ConfigDnsError::Api {
                status_code: 400,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_budget_is_bounded() {
        let mut op = Scripted::new(vec![conflict(); 10]);

        let err = fast(3).run("update A", &mut op).await.unwrap_err();

        assert_eq!(op.attempts, 3);
        match err {
            SyncError::RetryExhausted { attempts, last, .. } => {
                assert_eq!(attempts, 3);
                assert!(last.concurrency_conflict());
            }
            other => panic!("expected RetryExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_recover_runs_once_per_soa_failure() {
        let mut op = Scripted::new(vec![soa()]);

        let result = fast(5).run("update SOA", &mut op).await.unwrap();

        assert_eq!(result, 2);
        assert_eq!(op.recoveries, 1);
    }

    #[tokio::test]
    async fn test_repeated_soa_failures_stay_within_budget() {
        let mut op = Scripted::new(vec![soa(); 10]);

        let err = fast(3).run("update SOA", &mut op).await.unwrap_err();

        assert_eq!(op.attempts, 3);
        // No recovery after the final attempt
        assert_eq!(op.recoveries, 2);
        assert!(matches!(err, SyncError::RetryExhausted { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn test_failed_recovery_is_surfaced() {
        let mut op = Scripted::new(vec![soa()]);
        op.recover_fails = true;

        let err = fast(5).run("update SOA", &mut op).await.unwrap_err();

        assert_eq!(op.attempts, 1);
        assert!(matches!(
            err,
            SyncError::Remote(ConfigDnsError::SoaSerialRequired { .. })
        ));
    }

    #[tokio::test]
    async fn test_custom_classifier_can_disable_retries() {
        let mut op = Scripted::new(vec![conflict()]);
        let policy = fast(5).with_classifier(|_| RetryDecision::Fail);

        let err = policy.run("update A", &mut op).await.unwrap_err();

        assert_eq!(op.attempts, 1);
        assert!(matches!(err, SyncError::Remote(_)));
    }
}
