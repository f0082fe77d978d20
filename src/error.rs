//! Error types for message loading and field extraction

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a message or deriving its fields
#[derive(Error, Debug)]
pub enum Error {
    /// Empty path or message text handed to a loader
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The message file could not be opened or read as UTF-8 text
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The message parser rejected the raw text
    #[error("Failed to parse email structure: {0}")]
    Structure(#[from] mailparse::MailParseError),

    /// Missing required header
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Failed to decode the body transfer encoding
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// The body could not be handed to the HTML parser
    #[error("Failed to parse body as HTML: {0}")]
    Html(String),

    /// Summary export failed
    #[error("Failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Accessor called before any message was loaded
    #[error("No message loaded")]
    NotLoaded,
}

impl Error {
    /// True for errors caused by message content rather than caller input,
    /// I/O, export or parser state
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Structure(_)
                | Self::MissingHeader(_)
                | Self::InvalidDate(_)
                | Self::Decode(_)
                | Self::Html(_)
        )
    }
}

/// Result type for message operations
pub type Result<T> = std::result::Result<T, Error>;
