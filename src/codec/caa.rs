// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CAA rdata (RFC 8659): `<flags> <tag> "<value>"`.

use super::{number, quote, split_fields, FieldResult};
use crate::recordset::{CaaEntry, RecordData};

fn encode_entry(entry: &CaaEntry) -> FieldResult<String> {
    if entry.tag.is_empty() || !entry.tag.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(format!(
            "CAA tag '{}' must be non-empty and alphanumeric",
            entry.tag
        ));
    }
    Ok(format!(
        "{} {} {}",
        entry.flags,
        entry.tag.to_ascii_lowercase(),
        quote(&entry.value)
    ))
}

pub(crate) fn encode(entries: &[CaaEntry]) -> FieldResult<Vec<String>> {
    entries.iter().map(encode_entry).collect()
}

pub(crate) fn decode(rdata: &[String]) -> FieldResult<RecordData> {
    let target = rdata
        .iter()
        .map(|token| {
            let fields = split_fields(token)?;
            let [flags, tag, value] = fields.as_slice() else {
                return Err(format!("CAA rdata '{token}' must be '<flags> <tag> \"<value>\"'"));
            };
            Ok(CaaEntry {
                flags: number(flags, "CAA flags")?,
                tag: tag.to_ascii_lowercase(),
                value: value.clone(),
            })
        })
        .collect::<FieldResult<Vec<_>>>()?;
    Ok(RecordData::CAA { target })
}

#[cfg(test)]
#[path = "caa_tests.rs"]
mod caa_tests;
