// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests
//!
//! [`FakeClient`] is an in-memory remote API. It records every call, lets a
//! test script failures per operation and record type, and tracks how many
//! calls of each record type are in flight at once.

#![allow(dead_code)]

use async_trait::async_trait;
use configdns_sync::client::{ConfigDnsClient, RecordBody, ZoneBody};
use configdns_sync::codec;
use configdns_sync::dns_errors::ConfigDnsError;
use configdns_sync::record_type::RecordType;
use configdns_sync::recordset::{RecordData, RecordSet};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Remote operation kinds, used to script failures and inspect calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Save,
    Update,
    Delete,
}

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub zone: String,
    pub host: String,
    pub record_type: RecordType,
    /// Rdata sent with a save or update
    pub rdata: Option<Vec<String>>,
}

type Key = (String, String, RecordType);

fn key(zone: &str, host: &str, record_type: RecordType) -> Key {
    (
        zone.to_ascii_lowercase(),
        host.trim_end_matches('.').to_ascii_lowercase(),
        record_type,
    )
}

#[derive(Default)]
struct InFlight {
    current: HashMap<RecordType, usize>,
    max: HashMap<RecordType, usize>,
}

/// In-memory [`ConfigDnsClient`].
#[derive(Default)]
pub struct FakeClient {
    records: Mutex<HashMap<Key, RecordBody>>,
    zones: Mutex<HashMap<String, ZoneBody>>,
    failures: Mutex<HashMap<(Op, RecordType), VecDeque<ConfigDnsError>>>,
    calls: Mutex<Vec<Call>>,
    in_flight: Mutex<InFlight>,
    created_zones: Mutex<Vec<(String, String, String)>>,
    latency: Duration,
}

struct InFlightGuard<'a> {
    client: &'a FakeClient,
    record_type: RecordType,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.client.in_flight.lock().unwrap();
        if let Some(count) = in_flight.current.get_mut(&self.record_type) {
            *count -= 1;
        }
    }
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` while counted as in flight.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn insert(&self, zone: &str, host: &str, record_type: RecordType, ttl: u32, rdata: &[&str]) {
        self.records.lock().unwrap().insert(
            key(zone, host, record_type),
            RecordBody {
                name: host.to_string(),
                record_type,
                ttl,
                rdata: rdata.iter().map(|s| (*s).to_string()).collect(),
            },
        );
    }

    pub fn insert_zone(&self, body: ZoneBody) {
        self.zones.lock().unwrap().insert(body.zone.clone(), body);
    }

    pub fn record(&self, zone: &str, host: &str, record_type: RecordType) -> Option<RecordBody> {
        self.records
            .lock()
            .unwrap()
            .get(&key(zone, host, record_type))
            .cloned()
    }

    /// Queues errors returned by the next calls of `op` for `record_type`.
    pub fn fail_next(&self, op: Op, record_type: RecordType, errors: Vec<ConfigDnsError>) {
        self.failures
            .lock()
            .unwrap()
            .entry((op, record_type))
            .or_default()
            .extend(errors);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, op: Op) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.op == op).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn max_in_flight(&self, record_type: RecordType) -> usize {
        self.in_flight
            .lock()
            .unwrap()
            .max
            .get(&record_type)
            .copied()
            .unwrap_or(0)
    }

    pub fn created_zones(&self) -> Vec<(String, String, String)> {
        self.created_zones.lock().unwrap().clone()
    }

    async fn enter(
        &self,
        op: Op,
        zone: &str,
        host: &str,
        record_type: RecordType,
        rdata: Option<&[String]>,
    ) -> Result<InFlightGuard<'_>, ConfigDnsError> {
        {
            let mut in_flight = self.in_flight.lock().unwrap();
            let current = in_flight.current.entry(record_type).or_default();
            *current += 1;
            let now = *current;
            let max = in_flight.max.entry(record_type).or_default();
            *max = (*max).max(now);
        }
        let guard = InFlightGuard {
            client: self,
            record_type,
        };
        self.calls.lock().unwrap().push(Call {
            op,
            zone: zone.to_string(),
            host: host.to_string(),
            record_type,
            rdata: rdata.map(<[String]>::to_vec),
        });

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let scripted = self
            .failures
            .lock()
            .unwrap()
            .get_mut(&(op, record_type))
            .and_then(VecDeque::pop_front);
        match scripted {
            Some(error) => Err(error),
            None => Ok(guard),
        }
    }

    /// Rejects SOA writes whose serial does not exceed the stored serial.
    fn check_soa_serial(&self, zone: &str, record: &RecordBody) -> Result<(), ConfigDnsError> {
        if record.record_type != RecordType::SOA {
            return Ok(());
        }
        let Some(existing) = self.record(zone, &record.name, RecordType::SOA) else {
            return Ok(());
        };
        let serial = |rdata: &[String]| match codec::decode(RecordType::SOA, rdata) {
            Ok(RecordData::SOA { serial, .. }) => serial,
            _ => 0,
        };
        if serial(&record.rdata) <= serial(&existing.rdata) {
            return Err(ConfigDnsError::SoaSerialRequired {
                message: "SOA serial number must be incremented".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found(what: &str) -> ConfigDnsError {
    ConfigDnsError::NotFound {
        message: format!("{what} not found"),
    }
}

#[async_trait]
impl ConfigDnsClient for FakeClient {
    async fn get_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<RecordBody, ConfigDnsError> {
        let _guard = self.enter(Op::Get, zone, name, record_type, None).await?;
        self.record(zone, name, record_type)
            .ok_or_else(|| not_found(&format!("{name}/{record_type}")))
    }

    async fn save_record(&self, zone: &str, record: &RecordBody) -> Result<(), ConfigDnsError> {
        let _guard = self
            .enter(Op::Save, zone, &record.name, record.record_type, Some(&record.rdata))
            .await?;
        let k = key(zone, &record.name, record.record_type);
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&k) {
            return Err(ConfigDnsError::Api {
                status_code: 400,
                message: "record set already exists".to_string(),
            });
        }
        records.insert(k, record.clone());
        Ok(())
    }

    async fn update_record(&self, zone: &str, record: &RecordBody) -> Result<(), ConfigDnsError> {
        let _guard = self
            .enter(Op::Update, zone, &record.name, record.record_type, Some(&record.rdata))
            .await?;
        self.check_soa_serial(zone, record)?;
        let k = key(zone, &record.name, record.record_type);
        let mut records = self.records.lock().unwrap();
        if !records.contains_key(&k) {
            return Err(not_found(&record.name));
        }
        records.insert(k, record.clone());
        Ok(())
    }

    async fn delete_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<(), ConfigDnsError> {
        let _guard = self.enter(Op::Delete, zone, name, record_type, None).await?;
        self.records
            .lock()
            .unwrap()
            .remove(&key(zone, name, record_type))
            .map(|_| ())
            .ok_or_else(|| not_found(name))
    }

    async fn get_zone(&self, zone: &str) -> Result<ZoneBody, ConfigDnsError> {
        self.zones
            .lock()
            .unwrap()
            .get(zone)
            .cloned()
            .ok_or_else(|| not_found(zone))
    }

    async fn create_zone(
        &self,
        zone: &ZoneBody,
        contract_id: &str,
        group_id: &str,
    ) -> Result<(), ConfigDnsError> {
        self.created_zones.lock().unwrap().push((
            zone.zone.clone(),
            contract_id.to_string(),
            group_id.to_string(),
        ));
        self.zones
            .lock()
            .unwrap()
            .insert(zone.zone.clone(), zone.clone());
        Ok(())
    }
}

pub fn record_set(zone: &str, host: &str, data: RecordData) -> RecordSet {
    RecordSet {
        zone: zone.to_string(),
        host: host.to_string(),
        ttl: 300,
        active: true,
        data,
    }
}

pub fn a_record(host: &str, addresses: &[&str]) -> RecordSet {
    record_set(
        "example.com",
        host,
        RecordData::A {
            target: addresses.iter().map(|s| (*s).to_string()).collect(),
        },
    )
}

pub fn conflict() -> ConfigDnsError {
    ConfigDnsError::ConcurrencyConflict {
        message: "zone is being modified by another request".to_string(),
    }
}

pub fn soa_required() -> ConfigDnsError {
    ConfigDnsError::SoaSerialRequired {
        message: "SOA serial number must be incremented".to_string(),
    }
}
