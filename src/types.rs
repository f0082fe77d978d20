//! Core types for loaded messages

use crate::error::Result;
use mailparse::{MailAddr, MailHeaderMap, ParsedMail};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A loaded message.
///
/// Holds the raw bytes only; the header list and body part tree are
/// produced by the message parser each time they are needed. The bytes are
/// parsed once on construction, so a `RawMessage` always holds input the
/// parser accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    bytes: Vec<u8>,
}

impl RawMessage {
    /// Parse message text into a `RawMessage`
    pub fn parse(text: &str) -> Result<Self> {
        let bytes = text.as_bytes().to_vec();
        mailparse::parse_mail(&bytes)?;
        Ok(Self { bytes })
    }

    /// Header list and body part tree
    pub fn parsed(&self) -> Result<ParsedMail<'_>> {
        Ok(mailparse::parse_mail(&self.bytes)?)
    }

    /// Raw value of the first header named `name` (case-insensitive),
    /// encoded words left untouched
    pub fn header_raw(&self, name: &str) -> Result<Option<String>> {
        let parsed = self.parsed()?;
        Ok(parsed
            .headers
            .get_first_header(name)
            .map(|h| String::from_utf8_lossy(h.get_value_raw()).into_owned()))
    }

    /// Unfolded, decoded value of the first header named `name`
    pub fn header(&self, name: &str) -> Result<Option<String>> {
        Ok(self.parsed()?.headers.get_first_value(name))
    }

    /// Whether the body is split into sub-parts
    pub fn is_multipart(&self) -> Result<bool> {
        Ok(!self.parsed()?.subparts.is_empty())
    }

    /// Top-level `Content-Transfer-Encoding`, trimmed and lowercased
    pub fn transfer_encoding(&self) -> Result<Option<String>> {
        Ok(self
            .header("Content-Transfer-Encoding")?
            .map(|v| v.trim().to_lowercase()))
    }
}

/// Display name and address parsed from a `From`-style header value
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    /// Display name (e.g., "Spammer"), empty when absent
    pub name: String,

    /// Email address (e.g., "no-reply@spammer.com"), empty when unparseable
    pub email: String,
}

impl Address {
    /// Parse an address.
    ///
    /// Accepts `"Name" <local@domain>`, `Name <local@domain>`,
    /// `<local@domain>` and bare `local@domain`. Only the first address of a
    /// list is kept. Input the address parser rejects falls back to a plain
    /// `name <address>` split, and failing that the whole text is taken as
    /// the address, so `Spammer` yields an empty name and address `Spammer`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let Ok(list) = mailparse::addrparse(s) else {
            return Self::parse_fallback(s);
        };

        match list.first() {
            Some(MailAddr::Single(info)) => Self {
                name: info.display_name.clone().unwrap_or_default(),
                email: info.addr.clone(),
            },
            Some(MailAddr::Group(group)) => group
                .addrs
                .first()
                .map(|info| Self {
                    name: info.display_name.clone().unwrap_or_default(),
                    email: info.addr.clone(),
                })
                .unwrap_or_default(),
            None => Self::parse_fallback(s),
        }
    }

    fn parse_fallback(s: &str) -> Self {
        Self::parse_angle(s).unwrap_or_else(|| Self {
            name: String::new(),
            email: s.to_string(),
        })
    }

    fn parse_angle(s: &str) -> Option<Self> {
        let start = s.find('<')?;
        let end = start + s[start..].find('>')?;

        Some(Self {
            name: s[..start].trim().trim_matches('"').to_string(),
            email: s[start + 1..end].trim().to_string(),
        })
    }

    /// Part after the `@`, only when the address holds exactly one
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        domain_of(&self.email)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.email)
        } else {
            write!(f, "\"{}\" <{}>", self.name, self.email)
        }
    }
}

/// Part of `email` after its single `@`
#[must_use]
pub fn domain_of(email: &str) -> Option<&str> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(domain), None) => Some(domain),
        _ => None,
    }
}

/// Every derived field of a loaded message, for triage reports
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageSummary {
    /// File the message was loaded from
    pub path: Option<String>,

    /// `YYYY-MM-DD`
    pub date: Option<String>,

    /// `HH-MM-SS`
    pub time: Option<String>,

    pub subject: Option<String>,

    pub sender_name: Option<String>,

    pub sender_email: Option<String>,

    pub return_path: Option<String>,

    /// Links and image sources found in the body
    pub urls: Vec<String>,

    /// Hosts of `urls` plus sender and return-path domains
    pub hostnames: Vec<String>,
}

impl MessageSummary {
    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
