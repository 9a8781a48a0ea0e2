//! Error types for the user-pool crate.
//!
//! This module defines semantic error enums for reference-data loading, pool
//! generation, and output writing, following the project's error handling
//! conventions with `thiserror`.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while generating users.
///
/// Every variant aborts the current build; none are recovered internally
/// apart from the bounded email retry that produces
/// [`GenerationError::EmailSpaceExhausted`] once it gives up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The secure randomness source could not supply bytes.
    #[error("entropy source unavailable: {message}")]
    EntropySourceUnavailable {
        /// Description of the underlying failure.
        message: String,
    },

    /// The word pool used for names contains no entries.
    #[error("word pool contains no entries for name generation")]
    EmptyWordPool,

    /// The domain pool used for emails contains no entries.
    #[error("domain pool contains no entries for email generation")]
    EmptyDomainPool,

    /// Every email candidate for a name collided with an existing address.
    #[error("no unused email address for '{name}' after {attempts} attempts")]
    EmailSpaceExhausted {
        /// Name the email was being derived from.
        name: String,
        /// Number of candidates tried before giving up.
        attempts: usize,
    },

    /// The requested pool is larger than buffered mode allows.
    #[error("pool size {requested} exceeds the buffered record limit of {limit}")]
    PoolSizeExceedsBufferLimit {
        /// Number of records requested.
        requested: usize,
        /// Configured buffered record limit.
        limit: usize,
    },

    /// A configuration value is outside its accepted range.
    #[error("invalid configuration for {field}: {message}")]
    InvalidConfiguration {
        /// Name of the offending configuration field.
        field: &'static str,
        /// Description of the constraint that was violated.
        message: String,
    },
}

/// Errors that can occur when loading word or domain lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceDataError {
    /// A reference list file could not be read.
    #[error("failed to read reference list at '{path}': {message}")]
    ReadFailure {
        /// Path to the list file.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// A reference list is not a JSON array of strings.
    #[error("invalid reference list JSON in {source_name}: {message}")]
    ParseFailure {
        /// File path or built-in list name the JSON came from.
        source_name: String,
        /// Description of the parse error.
        message: String,
    },
}

/// Errors that can occur while writing or reading generated output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputError {
    /// The destination could not be opened or written.
    #[error("failed to write output at '{path}': {message}")]
    WriteFailure {
        /// Destination path.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// A record or pool could not be serialized.
    #[error("failed to serialize users: {message}")]
    Serialization {
        /// Serializer error message.
        message: String,
    },

    /// A streamed output file could not be reassembled into records.
    #[error("malformed user stream: {message}")]
    MalformedStream {
        /// Parser error message.
        message: String,
    },
}
