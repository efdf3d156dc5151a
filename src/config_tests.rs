// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `config.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::recordset::RecordData;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SyncConfig::from_yaml("endpoint: https://dns.example.net").unwrap();
        assert_eq!(config.retry.max_attempts, 10);
        assert_eq!(config.retry.conflict_interval_ms, 2000);
        assert_eq!(config.lock_granularity, LockGranularity::RecordType);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.state_file, PathBuf::from("configdns-state.json"));
        config.validate().unwrap();
    }

    #[test]
    fn test_full_document() {
        let config = SyncConfig::from_yaml(
            r"
endpoint: https://dns.example.net
retry:
  maxAttempts: 3
  conflictIntervalMs: 250
lockGranularity: recordSet
requestTimeoutSecs: 5
stateFile: /tmp/state.json
",
        )
        .unwrap();
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.conflict_interval, Duration::from_millis(250));
        assert_eq!(config.lock_granularity, LockGranularity::RecordSet);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = SyncConfig::default();
        config
            .apply_env_overrides(env(&[
                ("CONFIGDNS_ENDPOINT", "https://override.example.net"),
                ("CONFIGDNS_ACCESS_TOKEN", "secret"),
                ("CONFIGDNS_MAX_ATTEMPTS", "4"),
                ("CONFIGDNS_CONFLICT_INTERVAL_MS", "100"),
            ]))
            .unwrap();
        assert_eq!(config.endpoint, "https://override.example.net");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.retry.conflict_interval_ms, 100);
    }

    #[test]
    fn test_bad_numeric_override() {
        let mut config = SyncConfig::default();
        assert!(config
            .apply_env_overrides(env(&[("CONFIGDNS_MAX_ATTEMPTS", "many")]))
            .is_err());
    }

    #[test]
    fn test_validate_endpoint() {
        let mut config = SyncConfig::default();
        assert!(config.validate().is_err());

        config.endpoint = "ftp://dns.example.net".to_string();
        assert!(config.validate().is_err());

        config.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = SyncConfig::from_yaml("endpoint: https://dns.example.net").unwrap();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_is_not_serialized() {
        let mut config = SyncConfig::from_yaml("endpoint: https://dns.example.net").unwrap();
        config.access_token = Some("secret".to_string());
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("secret"));
    }

    #[test]
    fn test_declarations() {
        let declarations = Declarations::from_yaml(
            r#"
zones:
  - contract: C-1
    group: "42"
    zone: example.com
    type: PRIMARY
records:
  - zone: example.com
    host: www.example.com
    recordType: A
    target: ["192.0.2.1"]
  - zone: example.com
    host: example.com
    recordType: TXT
    ttl: 600
    active: false
    target: ["v=spf1 -all"]
"#,
        )
        .unwrap();
        assert_eq!(declarations.zones.len(), 1);
        assert_eq!(declarations.records.len(), 2);
        assert_eq!(declarations.records[0].ttl, 300);
        assert!(declarations.records[0].active);
        assert!(!declarations.records[1].active);
        assert!(matches!(declarations.records[1].data, RecordData::TXT { .. }));
    }

    #[test]
    fn test_declarations_reject_unknown_type() {
        let err = Declarations::from_yaml(
            r"
records:
  - zone: example.com
    host: www.example.com
    recordType: SVCB
    target: []
",
        );
        assert!(err.is_err());
    }
}
