// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! SOA rdata.
//!
//! The codec never touches the serial on its own; the serial is only bumped
//! by [`crate::soa::SoaSerialCoordinator`] when the remote API demands it.

use super::{fqdn, mailbox, number, split_fields, FieldResult};
use crate::recordset::RecordData;

pub(crate) fn validate(data: &RecordData) -> FieldResult<()> {
    let RecordData::SOA {
        name_server,
        email_address,
        serial,
        refresh,
        retry,
        expiry,
        nxdomain_ttl,
    } = data
    else {
        return Err("not an SOA record".to_string());
    };
    if name_server.trim().is_empty() {
        return Err("SOA nameServer is required".to_string());
    }
    if email_address.trim().is_empty() {
        return Err("SOA emailAddress is required".to_string());
    }
    let timers = [
        ("serial", serial),
        ("refresh", refresh),
        ("retry", retry),
        ("expiry", expiry),
        ("nxdomainTtl", nxdomain_ttl),
    ];
    if let Some((field, _)) = timers.iter().find(|(_, v)| **v == 0) {
        return Err(format!("SOA {field} must be non-zero"));
    }
    Ok(())
}

pub(crate) fn encode(data: &RecordData) -> FieldResult<String> {
    let RecordData::SOA {
        name_server,
        email_address,
        serial,
        refresh,
        retry,
        expiry,
        nxdomain_ttl,
    } = data
    else {
        return Err("not an SOA record".to_string());
    };
    Ok(format!(
        "{} {} {serial} {refresh} {retry} {expiry} {nxdomain_ttl}",
        fqdn(name_server)?,
        mailbox(email_address)?
    ))
}

pub(crate) fn decode(token: &str) -> FieldResult<RecordData> {
    let fields = split_fields(token)?;
    let [ns, email, serial, refresh, retry, expiry, minimum] = fields.as_slice() else {
        return Err(
            "SOA rdata must be '<ns> <email> <serial> <refresh> <retry> <expiry> <minimum>'"
                .to_string(),
        );
    };
    Ok(RecordData::SOA {
        name_server: fqdn(ns)?,
        email_address: fqdn(email)?,
        serial: number(serial, "SOA serial")?,
        refresh: number(refresh, "SOA refresh")?,
        retry: number(retry, "SOA retry")?,
        expiry: number(expiry, "SOA expiry")?,
        nxdomain_ttl: number(minimum, "SOA minimum")?,
    })
}

/// Serial of an SOA record, if `data` is one.
#[must_use]
pub fn serial(data: &RecordData) -> Option<u32> {
    match data {
        RecordData::SOA { serial, .. } => Some(*serial),
        _ => None,
    }
}

/// Replaces the serial of an SOA record. Returns `false` for any other type.
pub fn set_serial(data: &mut RecordData, value: u32) -> bool {
    match data {
        RecordData::SOA { serial, .. } => {
            *serial = value;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "soa_tests.rs"]
mod soa_tests;
