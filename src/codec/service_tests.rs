// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `service.rs`

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_srv_bare_hosts_use_shared_fields() {
        let tokens = encode_srv(
            &["sip1.example.com".to_string()],
            Some(10),
            Some(60),
            Some(5060),
        )
        .unwrap();
        assert_eq!(tokens, vec!["10 60 5060 sip1.example.com."]);
    }

    #[test]
    fn test_srv_bare_host_without_port_is_rejected() {
        let err = encode_srv(&["sip1.example.com".to_string()], Some(10), Some(60), None);
        assert!(err.is_err());
    }

    #[test]
    fn test_srv_explicit_entries_decode_as_explicit() {
        let rdata = vec![
            "10 60 5060 sip1.example.com.".to_string(),
            "20 0 5060 sip2.example.com.".to_string(),
        ];
        let data = decode_srv(&rdata).unwrap();
        assert_eq!(
            data,
            RecordData::SRV {
                target: rdata.clone(),
                priority: None,
                weight: None,
                port: None,
            }
        );
    }

    #[test]
    fn test_srv_rejects_short_entry() {
        assert!(decode_srv(&["10 60 sip.example.com.".to_string()]).is_err());
    }

    #[test]
    fn test_naptr_round_trip() {
        let token = encode_naptr(100, 10, "u", "E2U+sip", "!^.*$!sip:info@example.com!", ".")
            .unwrap();
        assert_eq!(
            token,
            r#"100 10 "U" "E2U+sip" "!^.*$!sip:info@example.com!" ."#
        );
        assert_eq!(
            decode_naptr(&token).unwrap(),
            RecordData::NAPTR {
                order: 100,
                preference: 10,
                flags: "U".to_string(),
                service: "E2U+sip".to_string(),
                regexp: "!^.*$!sip:info@example.com!".to_string(),
                replacement: ".".to_string(),
            }
        );
    }

    #[test]
    fn test_naptr_rejects_non_alphanumeric_flags() {
        assert!(encode_naptr(1, 1, "u;", "x", "", ".").is_err());
    }
}
