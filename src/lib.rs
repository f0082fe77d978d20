// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Triage
//!
//! Loads a single raw email message (RFC 5322, optionally MIME multipart)
//! and exposes the fields useful when triaging spam or phishing samples.
//!
//! # Features
//!
//! - Encoded-word decoding of `Subject`, `From` and `Return-Path`
//! - Sender name/address and return path
//! - `Date` as a timestamp, plus path-safe date and time strings
//! - Body decoding (base64 and quoted-printable)
//! - Link and image URLs found in the HTML body
//! - Hostnames referenced by those URLs and by the sender addresses
//!
//! # Example
//!
//! ```rust
//! use eml_triage::MessageParser;
//!
//! let raw = "From: \"Spammer\" <no-reply@spammer.com>\r\n\
//!            Subject: =?UTF-8?B?SGVsbG8=?=\r\n\
//!            Date: Mon, 01 Jan 2020 00:00:00 +0000\r\n\
//!            \r\n\
//!            <a href=\"https://example.com/spam\">click</a>";
//!
//! let mut parser = MessageParser::new();
//! parser.set_raw_from_text(raw).unwrap();
//!
//! assert_eq!(parser.subject().unwrap().as_deref(), Some("Hello"));
//! assert_eq!(parser.date().unwrap().as_deref(), Some("2020-01-01"));
//! assert_eq!(parser.hostnames().unwrap(), ["example.com", "spammer.com"]);
//! ```

mod body;
mod error;
mod header;
mod links;
mod parser;
mod types;

pub use body::{decode_base64, decode_payload, decode_quoted_printable, raw_payload};
pub use error::{Error, Result};
pub use header::{HeaderToken, decode_first, decode_header};
pub use links::{collect_hostnames, extract_urls, netloc};
pub use parser::MessageParser;
pub use types::*;
