// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `caa.rs`

#[cfg(test)]
mod tests {
    use super::super::*;

    fn entry(flags: u8, tag: &str, value: &str) -> CaaEntry {
        CaaEntry {
            flags,
            tag: tag.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_encode_quotes_value() {
        let tokens = encode(&[entry(0, "issue", "letsencrypt.org")]).unwrap();
        assert_eq!(tokens, vec!["0 issue \"letsencrypt.org\""]);
    }

    #[test]
    fn test_tag_is_lowercased() {
        let tokens = encode(&[entry(128, "IssueWild", ";")]).unwrap();
        assert_eq!(tokens, vec!["128 issuewild \";\""]);
    }

    #[test]
    fn test_invalid_tag_is_rejected() {
        assert!(encode(&[entry(0, "is-sue", "ca.example")]).is_err());
        assert!(encode(&[entry(0, "", "ca.example")]).is_err());
    }

    #[test]
    fn test_decode_iodef() {
        let data = decode(&["0 iodef \"mailto:security@example.com\"".to_string()]).unwrap();
        assert_eq!(
            data,
            RecordData::CAA {
                target: vec![entry(0, "iodef", "mailto:security@example.com")]
            }
        );
    }
}
