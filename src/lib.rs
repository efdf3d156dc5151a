// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # configdns-sync - Declarative DNS record synchronization
//!
//! configdns-sync keeps record sets declared in configuration in step with a
//! remote authoritative DNS configuration API. It does not resolve, transfer
//! or serve DNS; it computes record-set definitions and pushes them.
//!
//! ## Overview
//!
//! A declared [`RecordSet`](recordset::RecordSet) travels through:
//!
//! - [`codec`] - typed fields to the rdata tokens the remote expects, and back
//! - [`fingerprint`] - a stable hash over canonicalized rdata
//! - [`locks`] - one writer per record type (or per record set)
//! - [`sync`] - create/update/read/delete against the remote
//! - [`retry`] and [`soa`] - bounded retries on conflicts and SOA serial bumps
//!
//! ## Modules
//!
//! - [`client`] - Remote API trait and its HTTP implementation
//! - [`config`] - Engine configuration and declarations file
//! - [`state`] - Persisted state of synchronized record sets
//! - [`zone`] - Zone model and create-if-absent
//! - [`metrics`] - Prometheus metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use configdns_sync::{
//!     client::http::HttpConfigDnsClient,
//!     locks::{LockGranularity, LockRegistry},
//!     recordset::{RecordData, RecordSet},
//!     retry::RetryPolicy,
//!     sync::SyncOrchestrator,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = HttpConfigDnsClient::new("https://dns-api.example.net", None, Duration::from_secs(30))?;
//! let orchestrator = SyncOrchestrator::new(
//!     Arc::new(client),
//!     LockRegistry::new(LockGranularity::RecordType),
//!     RetryPolicy::default(),
//! );
//!
//! let set = RecordSet {
//!     zone: "example.com".to_string(),
//!     host: "www.example.com".to_string(),
//!     ttl: 300,
//!     active: true,
//!     data: RecordData::A {
//!         target: vec!["192.0.2.10".to_string()],
//!     },
//! };
//! let outcome = orchestrator.create_or_update(&set, None).await?;
//! println!("{} {}", outcome.action.as_str(), outcome.state.fingerprint);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod constants;
pub mod diff;
pub mod dns_errors;
pub mod fingerprint;
pub mod locks;
pub mod metrics;
pub mod record_type;
pub mod recordset;
pub mod retry;
pub mod soa;
pub mod state;
pub mod sync;
pub mod zone;
