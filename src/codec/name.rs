// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Rdata whose payload is one or more domain names: CNAME, NS, PTR, AFSDB, RP.

use super::{fqdn, mailbox, number, split_fields, FieldResult};
use crate::recordset::RecordData;

pub(crate) fn encode_names(targets: &[String]) -> FieldResult<Vec<String>> {
    targets.iter().map(|t| fqdn(t)).collect()
}

pub(crate) fn decode_names(rdata: &[String]) -> FieldResult<Vec<String>> {
    encode_names(rdata)
}

pub(crate) fn encode_afsdb(targets: &[String], subtype: u16) -> FieldResult<Vec<String>> {
    if !matches!(subtype, 1 | 2) {
        return Err(format!("AFSDB subtype must be 1 or 2, got {subtype}"));
    }
    targets
        .iter()
        .map(|t| fqdn(t).map(|host| format!("{subtype} {host}")))
        .collect()
}

pub(crate) fn decode_afsdb(rdata: &[String]) -> FieldResult<RecordData> {
    let mut subtype = None;
    let mut target = Vec::with_capacity(rdata.len());
    for token in rdata {
        let fields = split_fields(token)?;
        let [st, host] = fields.as_slice() else {
            return Err("AFSDB rdata must be '<subtype> <hostname>'".to_string());
        };
        let st: u16 = number(st, "AFSDB subtype")?;
        match subtype {
            None => subtype = Some(st),
            Some(existing) if existing != st => {
                return Err("AFSDB record set mixes subtypes".to_string());
            }
            Some(_) => {}
        }
        target.push(fqdn(host)?);
    }
    Ok(RecordData::AFSDB {
        target,
        subtype: subtype.unwrap_or(1),
    })
}

pub(crate) fn encode_rp(mailbox_address: &str, txt: &str) -> FieldResult<String> {
    Ok(format!("{} {}", mailbox(mailbox_address)?, fqdn(txt)?))
}

pub(crate) fn decode_rp(token: &str) -> FieldResult<RecordData> {
    let fields = split_fields(token)?;
    let [mbox, txt] = fields.as_slice() else {
        return Err("RP rdata must be '<mailbox> <txt-domain>'".to_string());
    };
    Ok(RecordData::RP {
        mailbox: fqdn(mbox)?,
        txt: fqdn(txt)?,
    })
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod name_tests;
