//! MIME encoded-word header decoding
//!
//! Splits a raw header value into runs of literal text and decoded
//! `=?charset?B|Q?data?=` words. Adjacent words sharing a charset are
//! merged, and whitespace between two encoded words is dropped, so
//! `=?UTF-8?Q?a?= =?UTF-8?Q?b?=` yields a single `"ab"` token.

use crate::body::decode_quoted_printable;
use crate::error::{Error, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use regex::Regex;
use tracing::warn;

static ENCODED_WORD_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"=\?([^?]*?)\?([qQbB])\?(.*?)\?=").unwrap()
});

/// Base64 engine tolerant of missing padding, as found in the wild
pub(crate) const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// One segment of a decoded header value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderToken {
    /// Decoded bytes of the segment
    pub bytes: Vec<u8>,

    /// Declared charset (lowercased), `None` for literal text
    pub charset: Option<String>,
}

impl HeaderToken {
    fn literal(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            charset: None,
        }
    }

    /// Convert the segment to text using its declared charset.
    ///
    /// Unknown charsets and literal text are read as UTF-8, replacing
    /// invalid sequences.
    #[must_use]
    pub fn to_text(&self) -> String {
        let Some(charset) = self.charset.as_deref() else {
            return String::from_utf8_lossy(&self.bytes).into_owned();
        };

        // RFC 2231 language suffix, e.g. "utf-8*en"
        let label = charset.split('*').next().unwrap_or(charset);
        if let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes()) {
            let (text, _, _) = encoding.decode(&self.bytes);
            text.into_owned()
        } else {
            warn!(charset, "Unknown charset, falling back to UTF-8 lossy");
            String::from_utf8_lossy(&self.bytes).into_owned()
        }
    }
}

enum Word<'a> {
    Literal(&'a str),
    Encoded {
        charset: String,
        base64: bool,
        data: &'a str,
    },
}

impl Word<'_> {
    const fn is_encoded(&self) -> bool {
        matches!(self, Self::Encoded { .. })
    }
}

/// Decode a raw header value into literal and encoded-word tokens.
///
/// A value without any encoded word is returned as a single literal token
/// with line folding removed.
pub fn decode_header(raw: &str) -> Result<Vec<HeaderToken>> {
    if !ENCODED_WORD_REGEX.is_match(raw) {
        let unfolded: String = raw.lines().collect();
        return Ok(vec![HeaderToken::literal(unfolded.trim())]);
    }

    let mut words = Vec::new();
    for line in raw.lines() {
        let mut cursor = 0;
        let mut first = true;
        for cap in ENCODED_WORD_REGEX.captures_iter(line) {
            let (Some(whole), Some(charset), Some(encoding), Some(data)) =
                (cap.get(0), cap.get(1), cap.get(2), cap.get(3))
            else {
                continue;
            };
            push_literal(&mut words, &line[cursor..whole.start()], &mut first);
            words.push(Word::Encoded {
                charset: charset.as_str().to_lowercase(),
                base64: encoding.as_str().eq_ignore_ascii_case("b"),
                data: data.as_str(),
            });
            cursor = whole.end();
        }
        push_literal(&mut words, &line[cursor..], &mut first);
    }

    // whitespace between two encoded words carries no content
    let mut kept: Vec<Word<'_>> = Vec::with_capacity(words.len());
    let mut iter = words.into_iter().peekable();
    while let Some(word) = iter.next() {
        let between_encoded = matches!(word, Word::Literal(text) if text.trim().is_empty())
            && kept.last().is_some_and(Word::is_encoded)
            && iter.peek().is_some_and(Word::is_encoded);
        if !between_encoded {
            kept.push(word);
        }
    }

    let mut tokens: Vec<HeaderToken> = Vec::new();
    for word in kept {
        let token = match word {
            Word::Literal(text) => HeaderToken::literal(text),
            Word::Encoded {
                charset,
                base64,
                data,
            } => HeaderToken {
                bytes: decode_word(base64, data)?,
                charset: Some(charset),
            },
        };
        match tokens.last_mut() {
            Some(last) if last.charset == token.charset => {
                if last.charset.is_none() {
                    last.bytes.push(b' ');
                }
                last.bytes.extend_from_slice(&token.bytes);
            }
            _ => tokens.push(token),
        }
    }

    Ok(tokens)
}

/// Decode a header value and keep only its first token as text
pub fn decode_first(raw: &str) -> Result<String> {
    Ok(decode_header(raw)?
        .first()
        .map(HeaderToken::to_text)
        .unwrap_or_default())
}

fn push_literal<'a>(words: &mut Vec<Word<'a>>, text: &'a str, first: &mut bool) {
    let text = if *first { text.trim_start() } else { text };
    *first = false;
    if !text.is_empty() {
        words.push(Word::Literal(text));
    }
}

fn decode_word(base64: bool, data: &str) -> Result<Vec<u8>> {
    if base64 {
        LENIENT_BASE64
            .decode(data)
            .map_err(|e| Error::Decode(format!("encoded-word {data:?}: {e}")))
    } else {
        Ok(decode_quoted_printable(data.replace('_', " ").as_bytes()))
    }
}
