// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Key and certificate rdata: DNSKEY, DS, CERT, SSHFP, TLSA.
//!
//! Hex payloads are upper-cased and base64 payloads have their whitespace
//! removed, matching how the remote service echoes them back.

use super::{hex, number, split_fields, FieldResult};
use crate::constants::DNSKEY_PROTOCOL;
use crate::recordset::RecordData;

/// CERT type mnemonics (RFC 4398), indexed by their numeric value minus one.
const CERT_TYPES: [&str; 8] = ["PKIX", "SPKI", "PGP", "IPKIX", "ISPKI", "IPGP", "ACPKIX", "IACPKIX"];

/// Strips whitespace and checks the base64 alphabet.
fn base64_payload(value: &str, what: &str) -> FieldResult<String> {
    let value: String = value.split_whitespace().collect();
    let valid = !value.is_empty()
        && value
            .trim_end_matches('=')
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/');
    if valid {
        Ok(value)
    } else {
        Err(format!("{what} must be base64"))
    }
}

/// Expected digest length in hex characters, where the algorithm defines one.
fn digest_hex_len(digest_type: u8) -> Option<usize> {
    match digest_type {
        1 => Some(40),
        2 | 3 => Some(64),
        4 => Some(96),
        _ => None,
    }
}

fn check_len(value: &str, expected: Option<usize>, what: &str) -> FieldResult<()> {
    match expected {
        Some(len) if value.len() != len => Err(format!(
            "{what} must be {len} hex characters, got {}",
            value.len()
        )),
        _ => Ok(()),
    }
}

fn cert_type(value: &str) -> FieldResult<String> {
    let upper = value.trim().to_ascii_uppercase();
    if CERT_TYPES.contains(&upper.as_str()) || upper == "URI" || upper == "OID" {
        return Ok(upper);
    }
    let numeric: u16 = number(&upper, "CERT type")?;
    // Prefer the mnemonic when the number has one
    match usize::from(numeric) {
        n @ 1..=8 => Ok(CERT_TYPES[n - 1].to_string()),
        253 => Ok("URI".to_string()),
        254 => Ok("OID".to_string()),
        _ => Ok(numeric.to_string()),
    }
}

pub(crate) fn encode_cert(
    kind: &str,
    keytag: u16,
    algorithm: u8,
    certificate: &str,
) -> FieldResult<String> {
    Ok(format!(
        "{} {keytag} {algorithm} {}",
        cert_type(kind)?,
        base64_payload(certificate, "CERT certificate")?
    ))
}

pub(crate) fn decode_cert(token: &str) -> FieldResult<RecordData> {
    let fields = split_fields(token)?;
    let [kind, keytag, algorithm, certificate @ ..] = fields.as_slice() else {
        return Err("CERT rdata must be '<type> <keytag> <algorithm> <certificate>'".to_string());
    };
    Ok(RecordData::CERT {
        cert_type: cert_type(kind)?,
        keytag: number(keytag, "CERT keytag")?,
        algorithm: number(algorithm, "CERT algorithm")?,
        certificate: base64_payload(&certificate.concat(), "CERT certificate")?,
    })
}

pub(crate) fn encode_dnskey(flags: u16, protocol: u8, algorithm: u8, key: &str) -> FieldResult<String> {
    if !matches!(flags, 0 | 256 | 257) {
        return Err(format!("DNSKEY flags must be 0, 256 or 257, got {flags}"));
    }
    if protocol != DNSKEY_PROTOCOL {
        return Err(format!("DNSKEY protocol must be {DNSKEY_PROTOCOL}, got {protocol}"));
    }
    Ok(format!(
        "{flags} {protocol} {algorithm} {}",
        base64_payload(key, "DNSKEY key")?
    ))
}

pub(crate) fn decode_dnskey(token: &str) -> FieldResult<RecordData> {
    let fields = split_fields(token)?;
    let [flags, protocol, algorithm, key @ ..] = fields.as_slice() else {
        return Err("DNSKEY rdata must be '<flags> <protocol> <algorithm> <key>'".to_string());
    };
    Ok(RecordData::DNSKEY {
        flags: number(flags, "DNSKEY flags")?,
        protocol: number(protocol, "DNSKEY protocol")?,
        algorithm: number(algorithm, "DNSKEY algorithm")?,
        key: base64_payload(&key.concat(), "DNSKEY key")?,
    })
}

pub(crate) fn encode_ds(keytag: u16, algorithm: u8, digest_type: u8, digest: &str) -> FieldResult<String> {
    let digest = hex(digest, "DS digest")?;
    check_len(&digest, digest_hex_len(digest_type), "DS digest")?;
    Ok(format!("{keytag} {algorithm} {digest_type} {digest}"))
}

pub(crate) fn decode_ds(token: &str) -> FieldResult<RecordData> {
    let fields = split_fields(token)?;
    let [keytag, algorithm, digest_type, digest @ ..] = fields.as_slice() else {
        return Err("DS rdata must be '<keytag> <algorithm> <digest-type> <digest>'".to_string());
    };
    Ok(RecordData::DS {
        keytag: number(keytag, "DS keytag")?,
        algorithm: number(algorithm, "DS algorithm")?,
        digest_type: number(digest_type, "DS digest type")?,
        digest: hex(&digest.concat(), "DS digest")?,
    })
}

pub(crate) fn encode_sshfp(algorithm: u8, fingerprint_type: u8, fingerprint: &str) -> FieldResult<String> {
    if !matches!(algorithm, 1..=4 | 6) {
        return Err(format!("SSHFP algorithm {algorithm} is not assigned"));
    }
    let expected = match fingerprint_type {
        1 => 40,
        2 => 64,
        other => return Err(format!("SSHFP fingerprint type must be 1 or 2, got {other}")),
    };
    let fingerprint = hex(fingerprint, "SSHFP fingerprint")?;
    check_len(&fingerprint, Some(expected), "SSHFP fingerprint")?;
    Ok(format!("{algorithm} {fingerprint_type} {fingerprint}"))
}

pub(crate) fn decode_sshfp(token: &str) -> FieldResult<RecordData> {
    let fields = split_fields(token)?;
    let [algorithm, fingerprint_type, fingerprint @ ..] = fields.as_slice() else {
        return Err("SSHFP rdata must be '<algorithm> <type> <fingerprint>'".to_string());
    };
    Ok(RecordData::SSHFP {
        algorithm: number(algorithm, "SSHFP algorithm")?,
        fingerprint_type: number(fingerprint_type, "SSHFP fingerprint type")?,
        fingerprint: hex(&fingerprint.concat(), "SSHFP fingerprint")?,
    })
}

pub(crate) fn encode_tlsa(usage: u8, selector: u8, match_type: u8, certificate: &str) -> FieldResult<String> {
    if usage > 3 {
        return Err(format!("TLSA usage must be 0-3, got {usage}"));
    }
    if selector > 1 {
        return Err(format!("TLSA selector must be 0 or 1, got {selector}"));
    }
    let expected = match match_type {
        0 => None,
        1 => Some(64),
        2 => Some(128),
        other => return Err(format!("TLSA matching type must be 0-2, got {other}")),
    };
    let certificate = hex(certificate, "TLSA certificate data")?;
    check_len(&certificate, expected, "TLSA certificate data")?;
    Ok(format!("{usage} {selector} {match_type} {certificate}"))
}

pub(crate) fn decode_tlsa(token: &str) -> FieldResult<RecordData> {
    let fields = split_fields(token)?;
    let [usage, selector, match_type, certificate @ ..] = fields.as_slice() else {
        return Err("TLSA rdata must be '<usage> <selector> <matching-type> <data>'".to_string());
    };
    Ok(RecordData::TLSA {
        usage: number(usage, "TLSA usage")?,
        selector: number(selector, "TLSA selector")?,
        match_type: number(match_type, "TLSA matching type")?,
        certificate: hex(&certificate.concat(), "TLSA certificate data")?,
    })
}

#[cfg(test)]
#[path = "security_tests.rs"]
mod security_tests;
