//! Codec errors for build log reading and writing
//!
//! Three layers, from the inside out:
//! - [`FieldError`]: a single field could not be decoded from a record payload.
//!   Always scoped to one record, so the reader can recover from it.
//! - [`ReadError`]: a `read()` call failed. Every variant except the ones the
//!   lenient modes absorb leaves the reader unusable.
//! - [`WriteError`]: a `write()` call failed. Sink failures poison the writer.
//!
//! Each variant carries enough context (byte position, record kind, lengths)
//! to locate the problem in a log without a debugger.

use binlog_types::EventKind;
use std::io;
use thiserror::Error;

use crate::framing::RecordKind;

/// Failure decoding one field of a record payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The decoder needed more bytes than the record declared
    #[error("End of payload reading {field}: need {need} bytes at offset {offset}, payload has {payload_len}")]
    EndOfPayload {
        field: &'static str,
        offset: usize,
        need: usize,
        payload_len: usize,
    },

    /// The bytes are present but do not form a valid value
    #[error("Invalid {field} at offset {offset}: {reason}")]
    Format {
        field: &'static str,
        offset: usize,
        reason: String,
    },
}

impl FieldError {
    pub fn end_of_payload(field: &'static str, offset: usize, need: usize, payload_len: usize) -> Self {
        Self::EndOfPayload {
            field,
            offset,
            need,
            payload_len,
        }
    }

    pub fn format(field: &'static str, offset: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            field,
            offset,
            reason: reason.into(),
        }
    }

    /// Short class name used in recoverable-error diagnostics.
    pub fn class(&self) -> &'static str {
        match self {
            FieldError::EndOfPayload { .. } => "EndOfPayload",
            FieldError::Format { .. } => "Format",
        }
    }

    pub fn is_end_of_payload(&self) -> bool {
        matches!(self, FieldError::EndOfPayload { .. })
    }
}

/// Result type for field decoding
pub type FieldResult<T> = std::result::Result<T, FieldError>;

/// Errors returned by [`crate::BinaryLogReader`].
#[derive(Debug, Error)]
pub enum ReadError {
    /// The stream ended before a complete record; the log is incomplete
    #[error("Unexpected end of stream at byte {position} while reading {context}")]
    UnexpectedEndOfStream { position: u64, context: String },

    /// The underlying source failed
    #[error("I/O error at byte {position}: {source}")]
    Io {
        position: u64,
        #[source]
        source: io::Error,
    },

    /// A record header could not be parsed (e.g. an over-long varint)
    #[error("Invalid record header at byte {position}: {reason}")]
    InvalidHeader { position: u64, reason: String },

    /// Record kind not in this reader's table and unknown kinds are not skipped
    #[error("Unknown event type {kind} at byte {position} ({length} byte payload); enable skip_unknown_events to read logs from newer writers")]
    UnknownEventType { kind: RecordKind, length: u32, position: u64 },

    /// A known record had trailing bytes this reader does not understand
    #[error("Unknown data in {kind} record at byte {position}: {unread} of {declared} payload bytes not understood; enable skip_unknown_event_parts to ignore them")]
    UnknownEventData {
        kind: EventKind,
        position: u64,
        declared: u32,
        unread: usize,
    },

    /// A known record could not be decoded
    #[error("Malformed {kind} record at byte {position}: {source}")]
    MalformedRecord {
        kind: EventKind,
        position: u64,
        #[source]
        source: FieldError,
    },

    /// Declared record length exceeds the configured limit
    #[error("Record too large: {kind} record at byte {position} declares {length} bytes, limit is {limit} (likely a corrupted length prefix)")]
    RecordTooLarge {
        kind: RecordKind,
        position: u64,
        length: u32,
        limit: u32,
    },

    /// The stream header names a format this reader cannot read
    #[error("Unsupported log format version {version} (minimum reader version {minimum_reader_version}): supported versions are {supported}")]
    UnsupportedFormatVersion {
        version: u32,
        minimum_reader_version: u32,
        supported: String,
    },

    /// The reader configuration is not usable
    #[error("Invalid reader configuration: {0}")]
    Config(#[from] ConfigError),

    /// An earlier fatal error invalidated this reader
    #[error("Reader is unusable after an earlier fatal error")]
    ReaderPoisoned,
}

impl ReadError {
    pub fn unexpected_end_of_stream(position: u64, context: impl Into<String>) -> Self {
        Self::UnexpectedEndOfStream {
            position,
            context: context.into(),
        }
    }

    /// Map an I/O failure, classifying short reads as end-of-stream.
    pub fn from_io(error: io::Error, position: u64, context: &str) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => Self::unexpected_end_of_stream(position, context),
            io::ErrorKind::InvalidData => Self::InvalidHeader {
                position,
                reason: error.to_string(),
            },
            _ => Self::Io {
                position,
                source: error,
            },
        }
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ReadError::UnexpectedEndOfStream { .. })
    }
}

/// Result type for reader operations
pub type ReadResult<T> = std::result::Result<T, ReadError>;

/// Errors returned by [`crate::BinaryLogWriter`].
#[derive(Debug, Error)]
pub enum WriteError {
    /// The sink failed; the writer must be discarded
    #[error("I/O error writing {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Reading the source of a blob failed; nothing was written
    #[error("Failed to read {kind} blob source: {source}")]
    BlobSource {
        kind: EventKind,
        #[source]
        source: io::Error,
    },

    /// The kind is newer than the format version the writer emits
    #[error("{kind} records require format version {required}, writer emits version {version}")]
    KindNotSupported {
        kind: EventKind,
        required: u32,
        version: u32,
    },

    /// Blob payloads are only allowed under blob kinds
    #[error("{kind} is not a blob kind")]
    InvalidBlobKind { kind: EventKind },

    /// Structured events have their own `write()` path
    #[error("{kind} records cannot be written directly")]
    ReservedKind { kind: EventKind },

    /// The payload does not fit the 32-bit length prefix
    #[error("Record too large: {kind} payload is {length} bytes, limit is {limit}")]
    RecordTooLarge {
        kind: RecordKind,
        length: u64,
        limit: u64,
    },

    /// The writer configuration is not usable
    #[error("Invalid writer configuration: {0}")]
    Config(#[from] ConfigError),

    /// An earlier sink failure or `finish()` invalidated this writer
    #[error("Writer is unusable after an earlier I/O failure")]
    WriterFailed,
}

impl WriteError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for writer operations
pub type WriteResult<T> = std::result::Result<T, WriteError>;

/// Configuration loading and validation errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        Self::Parse(error.to_string())
    }
}
