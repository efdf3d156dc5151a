// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Rdata codec: typed record attributes to and from remote rdata tokens.
//!
//! Every [`RecordType`] maps to exactly one encode/decode/validate
//! implementation. Dispatch is a single exhaustive `match` per direction, so a
//! new type without a codec does not compile.
//!
//! Each record type has its own submodule:
//!
//! - [`address`] - A, AAAA
//! - [`name`] - CNAME, NS, PTR, AFSDB, RP
//! - [`text`] - TXT, SPF, HINFO
//! - [`mx`] - MX, including reconciliation against the remote record set
//! - [`service`] - SRV, NAPTR
//! - [`soa`] - SOA
//! - [`loc`] - LOC
//! - [`caa`] - CAA
//! - [`security`] - DNSKEY, DS, CERT, SSHFP, TLSA
//!
//! # Example
//!
//! ```rust
//! use configdns_sync::codec;
//! use configdns_sync::recordset::{RecordData, RecordSet};
//!
//! let set = RecordSet {
//!     zone: "example.com".to_string(),
//!     host: "www.example.com".to_string(),
//!     ttl: 300,
//!     active: true,
//!     data: RecordData::AAAA { target: vec!["2001:db8::1".to_string()] },
//! };
//!
//! let rdata = codec::encode(&set).unwrap();
//! assert_eq!(rdata, vec!["2001:0db8:0000:0000:0000:0000:0000:0001".to_string()]);
//! ```

pub mod address;
pub mod caa;
pub mod loc;
pub mod mx;
pub mod name;
pub mod security;
pub mod service;
pub mod soa;
pub mod text;

use crate::dns_errors::SyncError;
use crate::record_type::RecordType;
use crate::recordset::{host_in_zone, names_equal, RecordData, RecordSet};

/// Largest TTL a resolver must honour (RFC 2181)
const MAX_TTL: u32 = 2_147_483_647;

/// Field-level codec result; the reason is wrapped into a [`SyncError`] by the dispatchers.
pub(crate) type FieldResult<T> = Result<T, String>;

/// Encodes a declared record set into the rdata tokens the remote API expects.
///
/// Unordered types come back sorted and de-duplicated. MX entries keep their
/// declared order; use [`mx::reconcile`] to merge with an existing remote set.
///
/// # Errors
///
/// Returns [`SyncError::Validation`] if a field cannot be encoded.
pub fn encode(set: &RecordSet) -> Result<Vec<String>, SyncError> {
    encode_data(&set.data).map_err(|reason| validation(set, reason))
}

/// Decodes remote rdata tokens into typed attributes.
///
/// # Errors
///
/// Returns [`SyncError::MalformedRdata`] if a token does not parse.
pub fn decode(record_type: RecordType, rdata: &[String]) -> Result<RecordData, SyncError> {
    let malformed = |reason: String| SyncError::MalformedRdata {
        record_type,
        rdata: rdata.join(" | "),
        reason,
    };
    if rdata.is_empty() {
        return Err(malformed("record set has no rdata".to_string()));
    }
    if record_type.is_singleton() && rdata.len() > 1 {
        return Err(malformed(format!(
            "{record_type} record set holds {} records",
            rdata.len()
        )));
    }

    let data = match record_type {
        RecordType::A => address::decode_a(rdata),
        RecordType::AAAA => address::decode_aaaa(rdata),
        RecordType::AFSDB => name::decode_afsdb(rdata),
        RecordType::CAA => caa::decode(rdata),
        RecordType::CERT => single(rdata).and_then(security::decode_cert),
        RecordType::CNAME => name::decode_names(rdata).map(|target| RecordData::CNAME { target }),
        RecordType::DNSKEY => single(rdata).and_then(security::decode_dnskey),
        RecordType::DS => single(rdata).and_then(security::decode_ds),
        RecordType::HINFO => single(rdata).and_then(text::decode_hinfo),
        RecordType::LOC => loc::decode(rdata),
        RecordType::MX => mx::decode(rdata),
        RecordType::NAPTR => single(rdata).and_then(service::decode_naptr),
        RecordType::NS => name::decode_names(rdata).map(|target| RecordData::NS { target }),
        RecordType::PTR => name::decode_names(rdata).map(|target| RecordData::PTR { target }),
        RecordType::RP => single(rdata).and_then(name::decode_rp),
        RecordType::SOA => single(rdata).and_then(soa::decode),
        RecordType::SPF => text::decode_text(rdata).map(|target| RecordData::SPF { target }),
        RecordType::SRV => service::decode_srv(rdata),
        RecordType::SSHFP => single(rdata).and_then(security::decode_sshfp),
        RecordType::TLSA => single(rdata).and_then(security::decode_tlsa),
        RecordType::TXT => text::decode_text(rdata).map(|target| RecordData::TXT { target }),
    };
    data.map_err(malformed)
}

/// Validates the required fields of a declared record set.
///
/// Validation is purely local: no remote call is made and a failure is
/// terminal for the synchronization request.
///
/// # Errors
///
/// Returns [`SyncError::Validation`] describing the first problem found.
pub fn validate(set: &RecordSet) -> Result<(), SyncError> {
    let check = || -> FieldResult<()> {
        if set.zone.trim().is_empty() {
            return Err("zone must not be empty".to_string());
        }
        if !host_in_zone(&set.host, &set.zone) {
            return Err(format!("host '{}' is not inside zone '{}'", set.host, set.zone));
        }
        if set.ttl > MAX_TTL {
            return Err(format!("ttl {} exceeds {MAX_TTL}", set.ttl));
        }
        if let Some(target) = set.data.targets() {
            if target.is_empty() {
                return Err("at least one target is required".to_string());
            }
            if target.len() > 1 && set.record_type().is_singleton() {
                return Err(format!(
                    "{} record sets hold exactly one target",
                    set.record_type()
                ));
            }
        }
        match &set.data {
            RecordData::CAA { target } if target.is_empty() => {
                return Err("at least one CAA entry is required".to_string());
            }
            RecordData::SOA { .. } if !names_equal(&set.host, &set.zone) => {
                return Err("SOA records live at the zone apex".to_string());
            }
            RecordData::SOA { .. } => soa::validate(&set.data)?,
            RecordData::MX {
                target,
                priority,
                priority_increment,
            } => mx::validate(target, *priority, *priority_increment)?,
            _ => {}
        }
        encode_data(&set.data).map(|_| ())
    };
    check().map_err(|reason| validation(set, reason))
}

/// Encodes typed attributes without record-set context.
pub(crate) fn encode_data(data: &RecordData) -> FieldResult<Vec<String>> {
    let tokens = match data {
        RecordData::A { target } => address::encode_a(target)?,
        RecordData::AAAA { target } => address::encode_aaaa(target)?,
        RecordData::AFSDB { target, subtype } => name::encode_afsdb(target, *subtype)?,
        RecordData::CAA { target } => caa::encode(target)?,
        RecordData::CERT {
            cert_type,
            keytag,
            algorithm,
            certificate,
        } => vec![security::encode_cert(cert_type, *keytag, *algorithm, certificate)?],
        RecordData::CNAME { target } | RecordData::NS { target } | RecordData::PTR { target } => {
            name::encode_names(target)?
        }
        RecordData::DNSKEY {
            flags,
            protocol,
            algorithm,
            key,
        } => vec![security::encode_dnskey(*flags, *protocol, *algorithm, key)?],
        RecordData::DS {
            keytag,
            algorithm,
            digest_type,
            digest,
        } => vec![security::encode_ds(*keytag, *algorithm, *digest_type, digest)?],
        RecordData::HINFO { hardware, software } => vec![text::encode_hinfo(hardware, software)],
        RecordData::LOC { target } => loc::encode(target)?,
        RecordData::MX {
            target,
            priority,
            priority_increment,
        } => mx::encode(target, *priority, *priority_increment)?,
        RecordData::NAPTR {
            order,
            preference,
            flags,
            service,
            regexp,
            replacement,
        } => vec![service::encode_naptr(
            *order,
            *preference,
            flags,
            service,
            regexp,
            replacement,
        )?],
        RecordData::RP { mailbox, txt } => vec![name::encode_rp(mailbox, txt)?],
        RecordData::SOA { .. } => vec![soa::encode(data)?],
        RecordData::SPF { target } | RecordData::TXT { target } => text::encode_text(target),
        RecordData::SRV {
            target,
            priority,
            weight,
            port,
        } => service::encode_srv(target, *priority, *weight, *port)?,
        RecordData::SSHFP {
            algorithm,
            fingerprint_type,
            fingerprint,
        } => vec![security::encode_sshfp(*algorithm, *fingerprint_type, fingerprint)?],
        RecordData::TLSA {
            usage,
            selector,
            match_type,
            certificate,
        } => vec![security::encode_tlsa(*usage, *selector, *match_type, certificate)?],
    };
    Ok(canonical_order(data.record_type(), tokens))
}

/// Sorts and de-duplicates tokens of unordered types; leaves ordered types untouched.
#[must_use]
pub fn canonical_order(record_type: RecordType, mut tokens: Vec<String>) -> Vec<String> {
    if record_type.is_unordered() {
        tokens.sort();
        tokens.dedup();
    }
    tokens
}

fn validation(set: &RecordSet, reason: String) -> SyncError {
    SyncError::Validation {
        record: set.id(),
        record_type: set.record_type(),
        reason,
    }
}

fn single(rdata: &[String]) -> FieldResult<&str> {
    match rdata {
        [token] => Ok(token.as_str()),
        _ => Err(format!(
            "expected exactly one resource record, found {}",
            rdata.len()
        )),
    }
}

// ============================================================================
// Shared token helpers
// ============================================================================

/// Appends the root dot to a host name if it is missing.
pub(crate) fn fqdn(name: &str) -> FieldResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("host name must not be empty".to_string());
    }
    if name.chars().any(char::is_whitespace) {
        return Err(format!("host name '{name}' contains whitespace"));
    }
    if name.ends_with('.') {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}."))
    }
}

/// Converts `user@example.com` to the RFC 1035 mailbox form `user.example.com.`.
pub(crate) fn mailbox(address: &str) -> FieldResult<String> {
    fqdn(&address.trim().replacen('@', ".", 1))
}

/// Resolves `\"` and `\\` escapes in a declared value. Other backslashes are kept.
pub(crate) fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next @ ('"' | '\\')) = chars.peek() {
                out.push(next);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Quotes raw text, escaping backslashes and quotes the way [`split_fields`] resolves them.
pub(crate) fn quote_raw(raw: &str) -> String {
    format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Wraps a value in double quotes, escaping embedded quotes and backslashes exactly once.
///
/// Already-escaped values are un-escaped first so re-encoding is stable.
pub(crate) fn quote(value: &str) -> String {
    quote_raw(&unescape(value))
}

/// Splits an rdata token into fields, honouring double-quoted strings.
///
/// Quotes are removed and `\"` / `\\` escapes inside quoted strings resolved.
pub(crate) fn split_fields(token: &str) -> FieldResult<Vec<String>> {
    let mut fields = Vec::new();
    let mut chars = token.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut field = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some(escaped @ ('"' | '\\')) => field.push(escaped),
                        Some(other) => {
                            field.push('\\');
                            field.push(other);
                        }
                        None => field.push('\\'),
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => field.push(c),
                }
            }
            if !closed {
                return Err(format!("unterminated quoted string in '{token}'"));
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                field.push(c);
                chars.next();
            }
        }
        fields.push(field);
    }
    Ok(fields)
}

/// Parses a numeric field with a descriptive error.
pub(crate) fn number<T: std::str::FromStr>(field: &str, what: &str) -> FieldResult<T> {
    field
        .parse::<T>()
        .map_err(|_| format!("{what} '{field}' is not a valid number"))
}

/// Validates and upper-cases a hexadecimal string.
pub(crate) fn hex(value: &str, what: &str) -> FieldResult<String> {
    let value: String = value.split_whitespace().collect();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{what} must be a non-empty hexadecimal string"));
    }
    Ok(value.to_ascii_uppercase())
}
