//! Error types for bl-replays
//!
//! This module provides the error hierarchy for the harvester:
//! - [`Error`] for everything that can go wrong during a run (config, HTTP, I/O, decode)
//! - [`ReplayError`] for malformed or truncated BSOR replay data

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bl-replays operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bl-replays
///
/// Each variant includes enough context to make a single log line useful.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.base_url")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level network error (connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status code
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// Status code returned by the server
        status: u16,
        /// Requested URL
        url: String,
    },

    /// JSON body did not match the expected shape
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid TOML configuration file
    #[error("invalid config file {path}: {source}")]
    ConfigFile {
        /// Path of the offending file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// Replay bytes could not be decoded
    #[error("replay decode error: {0}")]
    Replay(#[from] ReplayError),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a [`Error::Config`] tied to a specific key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

/// Errors raised while decoding a BSOR replay
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// File does not start with the BSOR magic number
    #[error("bad magic number {found:#010x}")]
    BadMagic {
        /// The value found where the magic was expected
        found: u32,
    },

    /// Format version this decoder does not understand
    #[error("unsupported replay version {0}")]
    UnsupportedVersion(u8),

    /// Ran out of bytes in the middle of a value
    #[error("unexpected end of data at offset {offset} (needed {needed} more bytes)")]
    UnexpectedEof {
        /// Offset at which the read started
        offset: usize,
        /// Number of bytes the read required
        needed: usize,
    },

    /// A length or count prefix was negative
    #[error("negative {what} count {count} at offset {offset}")]
    NegativeCount {
        /// What was being counted (e.g., "notes")
        what: &'static str,
        /// The raw count value
        count: i32,
        /// Offset of the count prefix
        offset: usize,
    },

    /// Unknown section identifier
    #[error("unknown section id {id} at offset {offset}")]
    UnknownSection {
        /// The section identifier byte
        id: u8,
        /// Offset of the section identifier
        offset: usize,
    },
}
