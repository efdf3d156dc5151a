// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Character-string rdata: TXT, SPF and HINFO.
//!
//! Values are wrapped in escaped quotes. Embedded quotes and backslashes are
//! un-escaped and then re-escaped, so a value written either way encodes
//! identically. Values
//! longer than one character-string are split into consecutive quoted strings
//! inside the same token.

use super::{quote, quote_raw, split_fields, unescape, FieldResult};
use crate::constants::MAX_CHARACTER_STRING_LEN;
use crate::recordset::RecordData;

/// Removes one pair of surrounding quotes, if present.
fn strip_outer_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Splits a value into chunks of at most `MAX_CHARACTER_STRING_LEN` bytes on char boundaries.
fn chunks(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut rest = value;
    while rest.len() > MAX_CHARACTER_STRING_LEN {
        let mut cut = MAX_CHARACTER_STRING_LEN;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        let (head, tail) = rest.split_at(cut);
        out.push(head);
        rest = tail;
    }
    out.push(rest);
    out
}

/// Encodes one TXT/SPF value into a single rdata token.
#[must_use]
pub fn encode_text_value(value: &str) -> String {
    let raw = unescape(strip_outer_quotes(value));
    chunks(&raw)
        .into_iter()
        .map(quote_raw)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn encode_text(targets: &[String]) -> Vec<String> {
    targets.iter().map(|t| encode_text_value(t)).collect()
}

pub(crate) fn decode_text(rdata: &[String]) -> FieldResult<Vec<String>> {
    rdata
        .iter()
        .map(|token| {
            if token.trim_start().starts_with('"') {
                split_fields(token).map(|parts| parts.concat())
            } else {
                Ok(token.trim().to_string())
            }
        })
        .collect()
}

pub(crate) fn encode_hinfo(hardware: &str, software: &str) -> String {
    format!(
        "{} {}",
        quote(strip_outer_quotes(hardware)),
        quote(strip_outer_quotes(software))
    )
}

pub(crate) fn decode_hinfo(token: &str) -> FieldResult<RecordData> {
    let fields = split_fields(token)?;
    let [hardware, software] = fields.as_slice() else {
        return Err("HINFO rdata must be '\"<hardware>\" \"<software>\"'".to_string());
    };
    Ok(RecordData::HINFO {
        hardware: hardware.clone(),
        software: software.clone(),
    })
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod text_tests;
