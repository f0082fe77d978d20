use eml_triage::*;

#[test]
fn test_plain_value_is_single_literal() {
    let tokens = decode_header("Hello World").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].bytes, b"Hello World");
    assert!(tokens[0].charset.is_none());
}

#[test]
fn test_plain_value_is_unfolded() {
    assert_eq!(
        decode_first("A long subject\r\n that was folded").unwrap(),
        "A long subject that was folded"
    );
}

#[test]
fn test_base64_word() {
    let tokens =
        decode_header("=?UTF-8?B?U3BhbSwgU3BhbSwgU3BhbSwgU3BhbSwgU3BhbQ==?=").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].charset.as_deref(), Some("utf-8"));
    assert_eq!(tokens[0].to_text(), "Spam, Spam, Spam, Spam, Spam");
}

#[test]
fn test_base64_word_without_padding() {
    assert_eq!(decode_first("=?utf-8?b?U3BhbQ?=").unwrap(), "Spam");
}

#[test]
fn test_q_word_with_latin1_charset() {
    assert_eq!(
        decode_first("=?iso-8859-1?Q?Caf=E9_au_lait?=").unwrap(),
        "Café au lait"
    );
}

#[test]
fn test_adjacent_words_are_merged() {
    let tokens = decode_header("=?UTF-8?Q?Spam?= =?UTF-8?Q?_and_eggs?=").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].to_text(), "Spam and eggs");
}

#[test]
fn test_folded_words_are_merged() {
    assert_eq!(
        decode_first("=?UTF-8?Q?Spam?=\r\n =?UTF-8?Q?Eggs?=").unwrap(),
        "SpamEggs"
    );
}

#[test]
fn test_different_charsets_stay_separate() {
    let tokens = decode_header("=?UTF-8?Q?Spam?= =?ISO-8859-1?Q?=E9?=").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].to_text(), "é");
}

#[test]
fn test_trailing_literal_is_separate_token() {
    let tokens = decode_header("=?UTF-8?B?U3BhbQ==?= and eggs").unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].to_text(), "Spam");
    assert_eq!(tokens[1].bytes, b" and eggs");
    assert!(tokens[1].charset.is_none());
}

#[test]
fn test_first_token_only() {
    assert_eq!(decode_first("=?UTF-8?B?U3BhbQ==?= and eggs").unwrap(), "Spam");
    assert_eq!(decode_first("Re: =?UTF-8?B?U3BhbQ==?=").unwrap(), "Re: ");
}

#[test]
fn test_unknown_charset_falls_back_to_utf8() {
    assert_eq!(decode_first("=?x-unknown?Q?Spam?=").unwrap(), "Spam");
}

#[test]
fn test_invalid_base64_word_is_decode_error() {
    let err = decode_header("=?UTF-8?B?U?=").unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn test_empty_value() {
    assert_eq!(decode_first("").unwrap(), "");
}
