// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Service location rdata: SRV and NAPTR.

use super::{fqdn, number, quote, split_fields, FieldResult};
use crate::recordset::RecordData;

/// Parses an explicit `"<priority> <weight> <port> <host>"` SRV entry.
fn srv_entry(token: &str) -> FieldResult<(u16, u16, u16, String)> {
    let fields = split_fields(token)?;
    let [priority, weight, port, host] = fields.as_slice() else {
        return Err(format!(
            "SRV rdata '{token}' must be '<priority> <weight> <port> <host>'"
        ));
    };
    Ok((
        number(priority, "SRV priority")?,
        number(weight, "SRV weight")?,
        number(port, "SRV port")?,
        fqdn(host)?,
    ))
}

pub(crate) fn encode_srv(
    targets: &[String],
    priority: Option<u16>,
    weight: Option<u16>,
    port: Option<u16>,
) -> FieldResult<Vec<String>> {
    targets
        .iter()
        .map(|target| {
            if split_fields(target)?.len() == 4 {
                let (p, w, port, host) = srv_entry(target)?;
                return Ok(format!("{p} {w} {port} {host}"));
            }
            let (Some(p), Some(w), Some(port)) = (priority, weight, port) else {
                return Err(format!(
                    "SRV target '{target}' needs priority, weight and port"
                ));
            };
            Ok(format!("{p} {w} {port} {}", fqdn(target)?))
        })
        .collect()
}

/// Decodes SRV rdata. Entries sharing priority, weight and port collapse to bare hosts.
pub(crate) fn decode_srv(rdata: &[String]) -> FieldResult<RecordData> {
    let entries: Vec<_> = rdata
        .iter()
        .map(|t| srv_entry(t))
        .collect::<Result<_, _>>()?;

    let (p, w, port, _) = &entries[0];
    let shared = entries
        .iter()
        .all(|(ep, ew, eport, _)| ep == p && ew == w && eport == port);

    if shared {
        Ok(RecordData::SRV {
            target: entries.iter().map(|(.., host)| host.clone()).collect(),
            priority: Some(*p),
            weight: Some(*w),
            port: Some(*port),
        })
    } else {
        Ok(RecordData::SRV {
            target: entries
                .iter()
                .map(|(p, w, port, host)| format!("{p} {w} {port} {host}"))
                .collect(),
            priority: None,
            weight: None,
            port: None,
        })
    }
}

pub(crate) fn encode_naptr(
    order: u16,
    preference: u16,
    flags: &str,
    service: &str,
    regexp: &str,
    replacement: &str,
) -> FieldResult<String> {
    if !flags.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!("NAPTR flags '{flags}' must be alphanumeric"));
    }
    Ok(format!(
        "{order} {preference} {} {} {} {}",
        quote(&flags.to_ascii_uppercase()),
        quote(service),
        quote(regexp),
        fqdn(replacement)?
    ))
}

pub(crate) fn decode_naptr(token: &str) -> FieldResult<RecordData> {
    let fields = split_fields(token)?;
    let [order, preference, flags, service, regexp, replacement] = fields.as_slice() else {
        return Err(
            "NAPTR rdata must be '<order> <preference> \"<flags>\" \"<service>\" \"<regexp>\" <replacement>'"
                .to_string(),
        );
    };
    Ok(RecordData::NAPTR {
        order: number(order, "NAPTR order")?,
        preference: number(preference, "NAPTR preference")?,
        flags: flags.to_ascii_uppercase(),
        service: service.clone(),
        regexp: regexp.clone(),
        replacement: fqdn(replacement)?,
    })
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
