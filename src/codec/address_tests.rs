// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `address.rs`

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_expand_ipv6_compressed() {
        let ip: Ipv6Addr = "1::1".parse().unwrap();
        assert_eq!(
            expand_ipv6(&ip),
            "0001:0000:0000:0000:0000:0000:0000:0001"
        );
    }

    #[test]
    fn test_encode_aaaa_is_notation_independent() {
        let compressed = encode_aaaa(&["2001:db8::ff00:42:8329".to_string()]).unwrap();
        let full = encode_aaaa(&["2001:0DB8:0000:0000:0000:FF00:0042:8329".to_string()]).unwrap();
        assert_eq!(compressed, full);
        assert_eq!(compressed[0], "2001:0db8:0000:0000:0000:ff00:0042:8329");
    }

    #[test]
    fn test_encode_aaaa_rejects_ipv4() {
        assert!(encode_aaaa(&["192.0.2.1".to_string()]).is_err());
    }

    #[test]
    fn test_encode_a_keeps_dotted_quad() {
        let tokens = encode_a(&[" 192.0.2.10 ".to_string()]).unwrap();
        assert_eq!(tokens, vec!["192.0.2.10".to_string()]);
    }

    #[test]
    fn test_encode_a_rejects_garbage() {
        let err = encode_a(&["300.1.1.1".to_string()]).unwrap_err();
        assert!(err.contains("not a valid IPv4 address"));
    }

    #[test]
    fn test_decode_aaaa_expands_remote_form() {
        let data = decode_aaaa(&["::1".to_string()]).unwrap();
        assert_eq!(
            data,
            RecordData::AAAA {
                target: vec!["0000:0000:0000:0000:0000:0000:0000:0001".to_string()]
            }
        );
    }
}
