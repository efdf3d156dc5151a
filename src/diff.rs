// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Diff suppression for logically-equivalent representations.
//!
//! Declared configuration and remote state often spell the same thing
//! differently: `"true"` versus `"1"`, re-indented JSON, or the same rdata in
//! another order. These helpers decide when such differences are noise.

use crate::fingerprint::fingerprint;
use crate::record_type::RecordType;
use crate::recordset::RecordData;
use serde_json::Value;

fn as_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value == "1" || value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value == "0" || value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Returns true if both values denote the same boolean, or are identical strings.
///
/// `"true"` matches `"1"` and `"false"` matches `"0"`, case-insensitively.
#[must_use]
pub fn equivalent_bool(old: &str, new: &str) -> bool {
    match (as_bool(old), as_bool(new)) {
        (Some(a), Some(b)) => a == b,
        _ => old == new,
    }
}

/// Returns true if both values parse to the same JSON document.
///
/// Falls back to plain string equality when either side is not valid JSON.
#[must_use]
pub fn equivalent_json(old: &str, new: &str) -> bool {
    match (
        serde_json::from_str::<Value>(old),
        serde_json::from_str::<Value>(new),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => old == new,
    }
}

/// Returns true if two rdata lists have the same fingerprint.
#[must_use]
pub fn suppress_record_diff(record_type: RecordType, old: &[String], new: &[String]) -> bool {
    fingerprint(record_type, old) == fingerprint(record_type, new)
}

fn equivalent_value(old: &Value, new: &Value) -> bool {
    if old == new {
        return true;
    }
    match (old, new) {
        (Value::String(a), Value::String(b)) => equivalent_bool(a, b) || equivalent_json(a, b),
        (Value::String(s), other) | (other, Value::String(s)) => {
            equivalent_bool(s, &other.to_string()) || equivalent_json(s, &other.to_string())
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equivalent_value(x, y))
        }
        _ => false,
    }
}

/// Names of the attributes that differ between two record data values.
///
/// Differences that [`equivalent_bool`] or [`equivalent_json`] consider
/// noise are not reported. Returns `["recordType"]` if the types differ.
#[must_use]
pub fn changed_fields(old: &RecordData, new: &RecordData) -> Vec<String> {
    let (Ok(Value::Object(old)), Ok(Value::Object(new))) =
        (serde_json::to_value(old), serde_json::to_value(new))
    else {
        return vec!["recordType".to_string()];
    };

    let mut keys: Vec<&String> = old.keys().chain(new.keys()).collect();
    keys.sort();
    keys.dedup();

    keys.into_iter()
        .filter(|key| match (old.get(*key), new.get(*key)) {
            (Some(a), Some(b)) => !equivalent_value(a, b),
            _ => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod diff_tests;
