//! Message loading and field extraction

use crate::body::{decode_payload, raw_payload};
use crate::error::{Error, Result};
use crate::header::decode_first;
use crate::links::{collect_hostnames, extract_urls};
use crate::types::{Address, MessageSummary, RawMessage};
use chrono::NaiveDateTime;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Format of the `Date` header once the weekday and zone suffix are removed
const DATE_FORMAT: &str = "%d %b %Y %H:%M:%S";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

static ZONE_SUFFIX_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r" [+-].+$").unwrap());

/// Loads one message at a time and derives its fields on demand.
///
/// Every accessor recomputes its result from the loaded [`RawMessage`];
/// nothing derived is cached. Loading is atomic: a failed `load` or
/// `set_raw_from_text` leaves the previous message and path in place.
#[derive(Debug, Clone, Default)]
pub struct MessageParser {
    path: Option<PathBuf>,
    raw: Option<RawMessage>,
}

impl MessageParser {
    /// Create a parser with no message loaded
    #[must_use]
    pub const fn new() -> Self {
        Self {
            path: None,
            raw: None,
        }
    }

    /// Create a parser and load the message at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut parser = Self::new();
        parser.load(path)?;
        Ok(parser)
    }

    /// Read and parse the message file at `path`, replacing any loaded message
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument("path cannot be empty".into()));
        }

        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = RawMessage::parse(&text)?;

        debug!("Loaded {} ({} bytes)", path.display(), text.len());

        self.path = Some(path.to_path_buf());
        self.raw = Some(raw);
        Ok(())
    }

    /// Parse `text` as a message, replacing any loaded message and clearing
    /// the path
    pub fn set_raw_from_text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Err(Error::InvalidArgument("message text cannot be empty".into()));
        }

        let raw = RawMessage::parse(text)?;

        debug!("Loaded message from text ({} bytes)", text.len());

        self.path = None;
        self.raw = Some(raw);
        Ok(())
    }

    /// Path of the loaded message, `None` if it came from text
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The loaded message
    #[must_use]
    pub const fn raw_message(&self) -> Option<&RawMessage> {
        self.raw.as_ref()
    }

    /// Whether a message is loaded
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.raw.is_some()
    }

    /// Decoded body bytes.
    ///
    /// Multipart payloads are concatenated undecoded, then the top-level
    /// transfer encoding is applied to the whole.
    pub fn body(&self) -> Result<Vec<u8>> {
        let raw = self.loaded()?;
        let parsed = raw.parsed()?;
        let payload = raw_payload(&parsed);
        let encoding = raw.transfer_encoding()?;

        trace!(
            "Decoding {} payload bytes (multipart: {}, encoding: {:?})",
            payload.len(),
            !parsed.subparts.is_empty(),
            encoding
        );

        decode_payload(&payload, encoding.as_deref())
    }

    /// Timestamp from the `Date` header, zone offset discarded.
    ///
    /// The weekday must be a short English name but is not checked against
    /// the date itself.
    pub fn datetime(&self) -> Result<Option<NaiveDateTime>> {
        let Some(raw) = &self.raw else {
            return Ok(None);
        };

        let date = raw
            .header("Date")?
            .ok_or_else(|| Error::MissingHeader("Date".into()))?;
        let sanitized = ZONE_SUFFIX_REGEX.replace(date.trim(), "");

        let remainder = sanitized
            .split_once(", ")
            .filter(|(weekday, _)| WEEKDAYS.iter().any(|d| d.eq_ignore_ascii_case(weekday)))
            .map(|(_, remainder)| remainder)
            .ok_or_else(|| Error::InvalidDate(format!("{date}: expected a short weekday name")))?;

        NaiveDateTime::parse_from_str(remainder, DATE_FORMAT)
            .map(Some)
            .map_err(|e| Error::InvalidDate(format!("{date}: {e}")))
    }

    /// Date portion as `YYYY-MM-DD`
    pub fn date(&self) -> Result<Option<String>> {
        Ok(self
            .datetime()?
            .map(|dt| dt.date().format("%Y-%m-%d").to_string()))
    }

    /// Time portion as `HH-MM-SS`, safe for use in file names
    pub fn time(&self) -> Result<Option<String>> {
        Ok(self
            .datetime()?
            .map(|dt| dt.time().format("%H-%M-%S").to_string()))
    }

    /// First decoded token of the `Subject` header
    pub fn subject(&self) -> Result<Option<String>> {
        self.decoded_header("Subject")
    }

    /// Display name from the `From` header
    pub fn sender_name(&self) -> Result<Option<String>> {
        Ok(self.address("From")?.map(|a| a.name))
    }

    /// Address from the `From` header
    pub fn sender_email(&self) -> Result<Option<String>> {
        Ok(self.address("From")?.map(|a| a.email))
    }

    /// Address from the `Return-Path` header
    pub fn return_path(&self) -> Result<Option<String>> {
        Ok(self.address("Return-Path")?.map(|a| a.email))
    }

    /// Link targets and image sources in the body, deduplicated and sorted
    pub fn urls(&self) -> Result<Vec<String>> {
        let body = self.body()?;
        let html = String::from_utf8(body).map_err(|e| Error::Html(e.to_string()))?;
        let urls = extract_urls(&html)?;

        debug!("Found {} urls", urls.len());

        Ok(urls)
    }

    /// Hosts of every body URL plus the sender and return-path domains,
    /// deduplicated and sorted
    pub fn hostnames(&self) -> Result<Vec<String>> {
        let urls = self.urls()?;
        let sender = self.sender_email()?;
        let return_path = self.return_path()?;

        let hostnames = collect_hostnames(
            &urls,
            [sender.as_deref(), return_path.as_deref()]
                .into_iter()
                .flatten(),
        );

        debug!("Found {} hostnames", hostnames.len());

        Ok(hostnames)
    }

    /// Every derived field at once, `None` when nothing is loaded
    pub fn summary(&self) -> Result<Option<MessageSummary>> {
        if self.raw.is_none() {
            return Ok(None);
        }

        Ok(Some(MessageSummary {
            path: self.path.as_ref().map(|p| p.display().to_string()),
            date: self.date()?,
            time: self.time()?,
            subject: self.subject()?,
            sender_name: self.sender_name()?,
            sender_email: self.sender_email()?,
            return_path: self.return_path()?,
            urls: self.urls()?,
            hostnames: self.hostnames()?,
        }))
    }

    fn loaded(&self) -> Result<&RawMessage> {
        self.raw.as_ref().ok_or(Error::NotLoaded)
    }

    fn decoded_header(&self, name: &str) -> Result<Option<String>> {
        let Some(raw) = &self.raw else {
            return Ok(None);
        };

        raw.header_raw(name)?
            .map(|value| decode_first(&value))
            .transpose()
    }

    fn address(&self, name: &str) -> Result<Option<Address>> {
        Ok(self
            .decoded_header(name)?
            .map(|value| Address::parse(&value)))
    }
}
