// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! A and AAAA rdata.
//!
//! AAAA addresses are always written in the fully-expanded eight-group form so
//! that `1::1` and `0001:0000:...:0001` produce identical rdata and therefore
//! identical fingerprints.

use super::FieldResult;
use crate::recordset::RecordData;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Formats an IPv6 address as eight zero-padded hex groups.
#[must_use]
pub fn expand_ipv6(addr: &Ipv6Addr) -> String {
    addr.segments()
        .iter()
        .map(|s| format!("{s:04x}"))
        .collect::<Vec<_>>()
        .join(":")
}

fn parse_ipv4(value: &str) -> FieldResult<Ipv4Addr> {
    value
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| format!("'{value}' is not a valid IPv4 address"))
}

fn parse_ipv6(value: &str) -> FieldResult<Ipv6Addr> {
    value
        .trim()
        .parse::<Ipv6Addr>()
        .map_err(|_| format!("'{value}' is not a valid IPv6 address"))
}

pub(crate) fn encode_a(targets: &[String]) -> FieldResult<Vec<String>> {
    targets
        .iter()
        .map(|t| parse_ipv4(t).map(|ip| ip.to_string()))
        .collect()
}

pub(crate) fn encode_aaaa(targets: &[String]) -> FieldResult<Vec<String>> {
    targets
        .iter()
        .map(|t| parse_ipv6(t).map(|ip| expand_ipv6(&ip)))
        .collect()
}

pub(crate) fn decode_a(rdata: &[String]) -> FieldResult<RecordData> {
    Ok(RecordData::A {
        target: encode_a(rdata)?,
    })
}

pub(crate) fn decode_aaaa(rdata: &[String]) -> FieldResult<RecordData> {
    Ok(RecordData::AAAA {
        target: encode_aaaa(rdata)?,
    })
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod address_tests;
