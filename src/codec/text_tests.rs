// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `text.rs`

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_plain_value_is_quoted() {
        assert_eq!(encode_text_value("v=spf1 -all"), "\"v=spf1 -all\"");
    }

    #[test]
    fn test_pre_quoted_value_is_not_double_quoted() {
        assert_eq!(encode_text_value("\"v=spf1 -all\""), "\"v=spf1 -all\"");
    }

    #[test]
    fn test_embedded_quotes_escape_consistently() {
        let raw = encode_text_value(r#"say "hi""#);
        let escaped = encode_text_value(r#"say \"hi\""#);
        assert_eq!(raw, r#""say \"hi\"""#);
        assert_eq!(raw, escaped);
    }

    #[test]
    fn test_long_value_is_split_into_character_strings() {
        let value = "a".repeat(300);
        let token = encode_text_value(&value);
        let expected = format!("\"{}\" \"{}\"", "a".repeat(255), "a".repeat(45));
        assert_eq!(token, expected);

        let decoded = decode_text(&[token]).unwrap();
        assert_eq!(decoded, vec![value]);
    }

    #[test]
    fn test_split_respects_char_boundaries() {
        let value = format!("{}é", "a".repeat(254));
        let token = encode_text_value(&value);
        assert_eq!(decode_text(&[token]).unwrap(), vec![value]);
    }

    #[test]
    fn test_decode_unquoted_remote_value() {
        let decoded = decode_text(&["hello".to_string()]).unwrap();
        assert_eq!(decoded, vec!["hello".to_string()]);
    }

    #[test]
    fn test_decode_resolves_escaped_quotes() {
        let decoded = decode_text(&[r#""say \"hi\"""#.to_string()]).unwrap();
        assert_eq!(decoded, vec![r#"say "hi""#.to_string()]);
    }

    #[test]
    fn test_trailing_backslash_is_escaped() {
        let token = encode_text_value(r"path C:\");
        assert_eq!(token, r#""path C:\\""#);
        assert_eq!(decode_text(&[token]).unwrap(), vec![r"path C:\".to_string()]);
    }

    #[test]
    fn test_embedded_backslash_round_trips() {
        let token = encode_text_value(r"dir=C:\data");
        assert_eq!(token, r#""dir=C:\\data""#);
        assert_eq!(decode_text(&[token]).unwrap(), vec![r"dir=C:\data".to_string()]);
    }

    #[test]
    fn test_escaped_backslash_encodes_like_raw() {
        assert_eq!(
            encode_text_value(r"path C:\\"),
            encode_text_value(r"path C:\")
        );
    }

    #[test]
    fn test_hinfo_round_trip() {
        let token = encode_hinfo("INTEL-386", "Linux");
        assert_eq!(token, "\"INTEL-386\" \"Linux\"");
        assert_eq!(
            decode_hinfo(&token).unwrap(),
            RecordData::HINFO {
                hardware: "INTEL-386".to_string(),
                software: "Linux".to_string()
            }
        );
    }
}
