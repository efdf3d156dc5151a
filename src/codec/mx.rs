// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! MX rdata and reconciliation against the remote record set.
//!
//! Declared targets are either bare host names, whose priority comes from a
//! base `priority` plus `priority_increment` per bare host, or explicit
//! `"<priority> <host>"` entries. The encoded token is `"<priority> <host>."`.
//!
//! MX rdata is never sorted. [`reconcile`] merges the declared entries with
//! whatever the remote set already holds so that configuration is additive:
//! remote exchangers nobody declared are carried over unchanged.
//!
//! Reconciliation keys entries by host name only. If the remote set holds the
//! same host twice with different priorities, the last one read wins.

use super::{fqdn, number, split_fields, FieldResult};
use crate::dns_errors::SyncError;
use crate::record_type::RecordType;
use crate::recordset::{names_equal, RecordData};

/// One mail exchanger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxEntry {
    pub priority: u16,
    pub host: String,
}

impl MxEntry {
    /// Parses an encoded `"<priority> <host>"` token.
    ///
    /// # Errors
    ///
    /// Returns a reason if the token is not a priority followed by a host name.
    pub fn parse(token: &str) -> Result<Self, String> {
        let fields = split_fields(token)?;
        let [priority, host] = fields.as_slice() else {
            return Err(format!("MX rdata '{token}' must be '<priority> <host>'"));
        };
        Ok(Self {
            priority: number(priority, "MX priority")?,
            host: fqdn(host)?,
        })
    }

    /// Rdata token for this entry.
    #[must_use]
    pub fn token(&self) -> String {
        format!("{} {}", self.priority, self.host)
    }
}

/// Splits a declared target into an explicit priority, if any, and its host.
fn declared_target(target: &str) -> FieldResult<(Option<u16>, String)> {
    let fields = split_fields(target)?;
    match fields.as_slice() {
        [host] => Ok((None, fqdn(host)?)),
        [priority, host] => Ok((Some(number(priority, "MX priority")?), fqdn(host)?)),
        _ => Err(format!(
            "MX target '{target}' must be '<host>' or '<priority> <host>'"
        )),
    }
}

pub(crate) fn validate(
    targets: &[String],
    priority: Option<u16>,
    priority_increment: Option<u16>,
) -> FieldResult<()> {
    if priority.is_none() && priority_increment.is_some() {
        return Err("priorityIncrement requires a base priority".to_string());
    }
    if priority_increment == Some(0) {
        return Err("priorityIncrement must be positive; omit it for a shared priority".to_string());
    }
    for target in targets {
        let (explicit, _) = declared_target(target)?;
        if explicit.is_none() && priority.is_none() {
            return Err(format!(
                "MX target '{target}' has no priority; set 'priority' or use '<priority> <host>'"
            ));
        }
    }
    Ok(())
}

/// Resolves declared targets to entries, in declaration order.
pub(crate) fn entries(
    targets: &[String],
    priority: Option<u16>,
    priority_increment: Option<u16>,
) -> FieldResult<Vec<MxEntry>> {
    let increment = u32::from(priority_increment.unwrap_or(0));
    let mut next = priority.map(u32::from);
    let mut out = Vec::with_capacity(targets.len());

    for target in targets {
        let (explicit, host) = declared_target(target)?;
        let priority = match explicit {
            Some(p) => p,
            None => {
                let current = next.ok_or_else(|| {
                    format!("MX target '{target}' has no priority and no base priority is set")
                })?;
                next = Some(current + increment);
                u16::try_from(current)
                    .map_err(|_| format!("MX priority for '{target}' exceeds 65535"))?
            }
        };
        out.push(MxEntry { priority, host });
    }
    Ok(out)
}

pub(crate) fn encode(
    targets: &[String],
    priority: Option<u16>,
    priority_increment: Option<u16>,
) -> FieldResult<Vec<String>> {
    Ok(entries(targets, priority, priority_increment)?
        .iter()
        .map(MxEntry::token)
        .collect())
}

/// Decodes remote MX rdata, preserving order.
///
/// A set with a single shared priority, or priorities rising by a constant
/// step, comes back as bare hosts with `priority`/`priority_increment`.
/// Anything else is returned as explicit `"<priority> <host>"` targets.
pub(crate) fn decode(rdata: &[String]) -> FieldResult<RecordData> {
    let parsed: Vec<MxEntry> = rdata
        .iter()
        .map(|t| MxEntry::parse(t))
        .collect::<Result<_, _>>()?;

    let priorities: Vec<u16> = parsed.iter().map(|e| e.priority).collect();
    let hosts = || parsed.iter().map(|e| e.host.clone()).collect::<Vec<_>>();

    let first = priorities[0];
    if priorities.iter().all(|&p| p == first) {
        return Ok(RecordData::MX {
            target: hosts(),
            priority: Some(first),
            priority_increment: None,
        });
    }
    let step = priorities[1].checked_sub(first).filter(|&s| s > 0);
    if let Some(step) = step {
        let progression = priorities
            .windows(2)
            .all(|w| w[1].checked_sub(w[0]) == Some(step));
        if progression {
            return Ok(RecordData::MX {
                target: hosts(),
                priority: Some(first),
                priority_increment: Some(step),
            });
        }
    }
    Ok(RecordData::MX {
        target: parsed.iter().map(MxEntry::token).collect(),
        priority: None,
        priority_increment: None,
    })
}

/// Merges declared MX tokens with the remote record set.
///
/// - `declared`: encoded tokens of the current configuration
/// - `previous`: encoded tokens of the configuration that was last synchronized
/// - `remote`: rdata currently held by the remote service
///
/// Hosts that were previously declared belong to the configuration: if they
/// are no longer declared they are dropped, and if they are still declared
/// their new priority applies. Any other remote host that is also declared
/// must agree on priority; a mismatch is rejected. Remote-only hosts are
/// appended unchanged after the declared entries.
///
/// # Errors
///
/// Returns [`SyncError::InvalidMxFormat`] on a priority mismatch and
/// [`SyncError::MalformedRdata`] if any token does not parse.
pub fn reconcile(
    declared: &[String],
    previous: &[String],
    remote: &[String],
) -> Result<Vec<String>, SyncError> {
    let malformed = |rdata: &[String], reason: String| SyncError::MalformedRdata {
        record_type: RecordType::MX,
        rdata: rdata.join(" | "),
        reason,
    };
    let parse_all = |tokens: &[String]| -> Result<Vec<MxEntry>, SyncError> {
        tokens
            .iter()
            .map(|t| MxEntry::parse(t))
            .collect::<Result<_, _>>()
            .map_err(|reason| malformed(tokens, reason))
    };

    let declared = parse_all(declared)?;
    let previous = parse_all(previous)?;

    // host -> priority, keeping first-seen position; later duplicates overwrite the priority
    let mut remaining: Vec<MxEntry> = Vec::new();
    for entry in parse_all(remote)? {
        match remaining.iter_mut().find(|e| names_equal(&e.host, &entry.host)) {
            Some(existing) => existing.priority = entry.priority,
            None => remaining.push(entry),
        }
    }

    remaining.retain(|r| !previous.iter().any(|p| names_equal(&p.host, &r.host)));

    let mut merged = Vec::with_capacity(declared.len() + remaining.len());
    for entry in declared {
        if let Some(pos) = remaining
            .iter()
            .position(|r| names_equal(&r.host, &entry.host))
        {
            let existing = remaining.remove(pos);
            if existing.priority != entry.priority {
                return Err(SyncError::InvalidMxFormat {
                    target: entry.host,
                    declared: entry.priority,
                    remote: existing.priority,
                });
            }
        }
        merged.push(entry.token());
    }
    merged.extend(remaining.iter().map(MxEntry::token));
    Ok(merged)
}

#[cfg(test)]
#[path = "mx_tests.rs"]
mod mx_tests;
