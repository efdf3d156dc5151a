// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zones and zone creation.
//!
//! A zone is created once under a contract and group. The remote service
//! creates the zone's SOA and NS records itself; this crate never deletes them.
//!
//! Type invariants:
//!
//! - `masters` is non-empty if and only if the zone is `SECONDARY`
//! - `target` is set if and only if the zone is `ALIAS`
//! - a TSIG key is only valid on `SECONDARY` zones

use crate::client::{ConfigDnsClient, ZoneBody};
use crate::dns_errors::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Zone type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneType {
    Primary,
    Secondary,
    Alias,
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primary => "PRIMARY",
            Self::Secondary => "SECONDARY",
            Self::Alias => "ALIAS",
        })
    }
}

/// TSIG key used by a secondary zone to authenticate zone transfers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsigKey {
    pub name: String,
    pub algorithm: String,
    pub secret: String,
}

/// A declared zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Contract the zone is billed to
    pub contract: String,
    /// Group the zone belongs to
    pub group: String,
    /// Zone name (e.g. `example.com`)
    pub zone: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    /// Primary name servers of a secondary zone
    #[serde(default)]
    pub masters: Vec<String>,
    /// Zone an alias zone points at
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub tsig_key: Option<TsigKey>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub sign_and_serve: bool,
}

impl Zone {
    /// Checks the zone type invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidZone`] describing the first violation.
    pub fn validate(&self) -> Result<(), SyncError> {
        let invalid = |reason: &str| SyncError::InvalidZone {
            zone: self.zone.clone(),
            reason: reason.to_string(),
        };

        if self.zone.trim().is_empty() {
            return Err(invalid("zone name is required"));
        }
        if self.contract.trim().is_empty() || self.group.trim().is_empty() {
            return Err(invalid("contract and group are required"));
        }

        let has_masters = !self.masters.is_empty();
        let has_target = self.target.as_deref().is_some_and(|t| !t.trim().is_empty());
        match self.zone_type {
            ZoneType::Secondary if !has_masters => {
                return Err(invalid("SECONDARY zones require at least one master"));
            }
            ZoneType::Primary | ZoneType::Alias if has_masters => {
                return Err(invalid("masters are only valid on SECONDARY zones"));
            }
            ZoneType::Alias if !has_target => {
                return Err(invalid("ALIAS zones require a target"));
            }
            ZoneType::Primary | ZoneType::Secondary if has_target => {
                return Err(invalid("target is only valid on ALIAS zones"));
            }
            _ => {}
        }
        if self.tsig_key.is_some() && self.zone_type != ZoneType::Secondary {
            return Err(invalid("tsigKey is only valid on SECONDARY zones"));
        }
        Ok(())
    }

    /// Wire representation of this zone.
    #[must_use]
    pub fn body(&self) -> ZoneBody {
        ZoneBody {
            zone: self.zone.clone(),
            zone_type: self.zone_type,
            masters: self.masters.clone(),
            target: self.target.clone(),
            tsig_key: self.tsig_key.clone(),
            comment: self.comment.clone(),
            sign_and_serve: self.sign_and_serve,
        }
    }
}

/// Result of [`ZoneManager::ensure_zone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneOutcome {
    /// The zone already existed and was left alone
    Existing,
    /// The zone was created
    Created,
}

/// Creates zones that do not exist yet.
pub struct ZoneManager {
    client: Arc<dyn ConfigDnsClient>,
}

impl ZoneManager {
    #[must_use]
    pub fn new(client: Arc<dyn ConfigDnsClient>) -> Self {
        Self { client }
    }

    /// Returns whether the zone exists on the remote.
    ///
    /// # Errors
    ///
    /// Propagates any remote error other than "not found".
    pub async fn zone_exists(&self, zone: &str) -> Result<bool, SyncError> {
        match self.client.get_zone(zone).await {
            Ok(_) => Ok(true),
            Err(e) if e.not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates the zone unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidZone`] if the declaration is invalid, or
    /// the remote error if the lookup or creation fails.
    pub async fn ensure_zone(&self, zone: &Zone) -> Result<ZoneOutcome, SyncError> {
        zone.validate()?;

        if self.zone_exists(&zone.zone).await? {
            debug!(zone = %zone.zone, "Zone already exists");
            return Ok(ZoneOutcome::Existing);
        }

        self.client
            .create_zone(&zone.body(), &zone.contract, &zone.group)
            .await?;
        info!(
            zone = %zone.zone,
            zone_type = %zone.zone_type,
            contract = %zone.contract,
            group = %zone.group,
            "Created zone"
        );
        Ok(ZoneOutcome::Created)
    }
}

#[cfg(test)]
#[path = "zone_tests.rs"]
mod zone_tests;
