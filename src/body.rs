//! Body payload extraction and transfer decoding

use crate::error::{Error, Result};
use crate::header::LENIENT_BASE64;
use base64::Engine;
use mailparse::ParsedMail;
use mailparse::body::Body;

/// Raw payload of a message: the body itself for a single-part message,
/// or the concatenation of every direct sub-part's payload.
///
/// Sub-parts are not transfer-decoded.
#[must_use]
pub fn raw_payload(parsed: &ParsedMail<'_>) -> Vec<u8> {
    if parsed.subparts.is_empty() {
        return encoded_body(parsed);
    }

    parsed.subparts.iter().flat_map(encoded_body).collect()
}

/// Decode a payload using the top-level transfer encoding.
///
/// Base64 is undone first when declared; quoted-printable decoding is then
/// applied unconditionally.
pub fn decode_payload(payload: &[u8], transfer_encoding: Option<&str>) -> Result<Vec<u8>> {
    if transfer_encoding == Some("base64") {
        Ok(decode_quoted_printable(&decode_base64(payload)?))
    } else {
        Ok(decode_quoted_printable(payload))
    }
}

/// Base64 decode, skipping line breaks and any other non-alphabet bytes
pub fn decode_base64(input: &[u8]) -> Result<Vec<u8>> {
    let filtered: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
        .collect();

    // padding only belongs at the end
    let end = filtered
        .iter()
        .position(|&b| b == b'=')
        .unwrap_or(filtered.len());

    LENIENT_BASE64
        .decode(&filtered[..end])
        .map_err(|e| Error::Decode(format!("base64: {e}")))
}

/// Quoted-printable decode.
///
/// Only `=XX` escapes and `=` soft line breaks are interpreted. Every other
/// byte, including 8-bit data, line endings and trailing whitespace, is
/// copied through, and a `=` that starts neither is kept as is.
#[must_use]
pub fn decode_quoted_printable(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        if input[i] != b'=' {
            out.push(input[i]);
            i += 1;
            continue;
        }

        let rest = &input[i + 1..];
        if rest.is_empty() {
            // soft break at end of input
            i += 1;
        } else if rest.starts_with(b"\n") {
            i += 2;
        } else if rest.starts_with(b"\r\n") {
            i += 3;
        } else if let Some(byte) = hex_pair(rest) {
            out.push(byte);
            i += 3;
        } else {
            out.push(b'=');
            i += 1;
        }
    }

    out
}

fn hex_pair(bytes: &[u8]) -> Option<u8> {
    let high = char::from(*bytes.first()?).to_digit(16)?;
    let low = char::from(*bytes.get(1)?).to_digit(16)?;
    u8::try_from(high * 16 + low).ok()
}

fn encoded_body(part: &ParsedMail<'_>) -> Vec<u8> {
    match part.get_body_encoded() {
        Body::Base64(body) | Body::QuotedPrintable(body) => body.get_raw().to_vec(),
        Body::SevenBit(body) | Body::EightBit(body) => body.get_raw().to_vec(),
        Body::Binary(body) => body.get_raw().to_vec(),
    }
}
