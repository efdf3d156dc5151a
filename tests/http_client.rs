// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP client tests against a mock remote API.
//!
//! Run with: cargo test --test http_client

use configdns_sync::client::http::HttpConfigDnsClient;
use configdns_sync::client::{ConfigDnsClient, RecordBody};
use configdns_sync::dns_errors::{ConfigDnsError, SyncError};
use configdns_sync::locks::{LockGranularity, LockRegistry};
use configdns_sync::record_type::RecordType;
use configdns_sync::recordset::{RecordData, RecordSet};
use configdns_sync::retry::RetryPolicy;
use configdns_sync::sync::{SyncAction, SyncOrchestrator};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECORD_PATH: &str = "/config-dns/v2/zones/example.com/names/www.example.com/types/A";

fn client(server: &MockServer, token: Option<&str>) -> HttpConfigDnsClient {
    HttpConfigDnsClient::new(
        &server.uri(),
        token.map(str::to_string),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn a_body(rdata: &[&str]) -> RecordBody {
    RecordBody {
        name: "www.example.com".to_string(),
        record_type: RecordType::A,
        ttl: 300,
        rdata: rdata.iter().map(|s| (*s).to_string()).collect(),
    }
}

#[tokio::test]
async fn test_get_record_decodes_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RECORD_PATH))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "www.example.com",
            "type": "A",
            "ttl": 300,
            "rdata": ["192.0.2.1"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client(&server, Some("secret"))
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap();

    assert_eq!(record, a_body(&["192.0.2.1"]));
}

#[tokio::test]
async fn test_not_found_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string("record set not found"))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap_err();

    assert!(err.not_found());
}

#[tokio::test]
async fn test_conflict_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_string("zone change in progress"))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .update_record("example.com", &a_body(&["192.0.2.1"]))
        .await
        .unwrap_err();

    assert!(err.concurrency_conflict());
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_soa_sentinel_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/config-dns/v2/zones/example.com/names/example.com/types/SOA"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"title":"Bad Request","detail":"SOA serial number must be incremented"}"#,
        ))
        .mount(&server)
        .await;

    let body = RecordBody {
        name: "example.com".to_string(),
        record_type: RecordType::SOA,
        ttl: 3600,
        rdata: vec!["ns1.example.com. hostmaster.example.com. 5 3600 600 604800 300".to_string()],
    };
    let err = client(&server, None)
        .update_record("example.com", &body)
        .await
        .unwrap_err();

    assert!(err.soa_serial_required());
}

#[tokio::test]
async fn test_server_error_is_not_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server, None)
        .delete_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ConfigDnsError::Api {
            status_code: 500,
            message: "Internal Server Error".to_string()
        }
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_save_sends_record_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(RECORD_PATH))
        .and(body_json(json!({
            "name": "www.example.com",
            "type": "A",
            "ttl": 300,
            "rdata": ["192.0.2.1", "192.0.2.2"]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, None)
        .save_record("example.com", &a_body(&["192.0.2.1", "192.0.2.2"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_zone_passes_contract_and_group() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/config-dns/v2/zones"))
        .and(query_param("contractId", "C-1"))
        .and(query_param("gid", "42"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let zone: configdns_sync::zone::Zone = serde_yaml::from_str(
        "contract: C-1\ngroup: \"42\"\nzone: example.com\ntype: PRIMARY\n",
    )
    .unwrap();
    client(&server, None)
        .create_zone(&zone.body(), &zone.contract, &zone.group)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let client = HttpConfigDnsClient::new("http://127.0.0.1:1", None, Duration::from_secs(1)).unwrap();

    let err = client
        .get_record("example.com", "www.example.com", RecordType::A)
        .await
        .unwrap_err();

    assert!(matches!(err, ConfigDnsError::Transport { .. }));
}

#[tokio::test]
async fn test_orchestrator_retries_http_conflicts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(409))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "www.example.com",
            "type": "A",
            "ttl": 300,
            "rdata": ["192.0.2.1"]
        })))
        .mount(&server)
        .await;

    let sync = SyncOrchestrator::new(
        Arc::new(client(&server, None)),
        LockRegistry::new(LockGranularity::RecordType),
        RetryPolicy::new(5, Duration::from_millis(10)),
    );
    let set = RecordSet {
        zone: "example.com".to_string(),
        host: "www.example.com".to_string(),
        ttl: 300,
        active: true,
        data: RecordData::A {
            target: vec!["192.0.2.1".to_string()],
        },
    };

    let outcome = sync.create_or_update(&set, None).await.unwrap();
    assert_eq!(outcome.action, SyncAction::Created);
    assert_eq!(outcome.state.rdata, vec!["192.0.2.1"]);
}

#[tokio::test]
async fn test_orchestrator_surfaces_exhaustion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(RECORD_PATH))
        .respond_with(ResponseTemplate::new(409))
        .expect(2)
        .mount(&server)
        .await;

    let sync = SyncOrchestrator::new(
        Arc::new(client(&server, None)),
        LockRegistry::new(LockGranularity::RecordType),
        RetryPolicy::new(2, Duration::from_millis(10)),
    );
    let set = RecordSet {
        zone: "example.com".to_string(),
        host: "www.example.com".to_string(),
        ttl: 300,
        active: true,
        data: RecordData::A {
            target: vec!["192.0.2.1".to_string()],
        },
    };

    let err = sync.create_or_update(&set, None).await.unwrap_err();
    assert!(matches!(err, SyncError::RetryExhausted { attempts: 2, .. }));
    assert_eq!(err.status_reason(), "RetryExhausted");
}
