//! # Binary Build Log Codec
//!
//! ## Purpose
//!
//! The rules layer of the binary build log: how build events are laid out as
//! bytes, how records are framed, which format versions may carry which
//! fields, and how a reader copes with logs from other versions.
//!
//! - [`BinaryLogWriter`]: serializes events and blobs into framed records
//! - [`BinaryLogReader`]: reconstructs them, strictly or leniently
//! - [`FormatVersion`]: the per-stream gate on kinds and fields
//! - [`RecoverableReadError`]: what a lenient reader reports when it skips data
//!
//! ## Architecture Role
//!
//! ```text
//! binlog-types → [binlog-codec] → byte stream (file, pipe)
//!      ↑               ↓
//! BuildEvent      Writer: layout + framing
//! EventKind       Reader: framing + layout + compatibility policy
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Event definitions (belong in `binlog-types`)
//! - File handling, logger registration or any CLI surface; callers pass in
//!   any `std::io::Read` / `std::io::Write`
//!
//! ## Quick Start
//!
//! ```rust
//! use binlog_codec::{BinaryLogReader, BinaryLogWriter, ReaderConfig, WriterConfig};
//! use binlog_types::{BuildEvent, MessageEvent, MessageImportance};
//!
//! let event = BuildEvent::Message(MessageEvent::new("Restoring", MessageImportance::Normal));
//!
//! let mut writer = BinaryLogWriter::create(Vec::new(), WriterConfig::default())?;
//! writer.write(&event)?;
//! let bytes = writer.finish()?;
//!
//! let mut reader = BinaryLogReader::open(&bytes[..], ReaderConfig::lenient())?;
//! reader.on_recoverable_error(|e| eprintln!("{e}"));
//! let record = reader.read()?.expect("one record");
//! assert_eq!(record.as_event(), Some(&event));
//! assert!(reader.read()?.is_none());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod buffers;
pub mod compat;
pub mod config;
pub mod error;
pub mod framing;
pub mod layout;
pub mod payload;
pub mod reader;
pub mod varint;
pub mod version;
pub mod writer;

pub use buffers::PayloadBuffer;
pub use compat::{ReaderErrorType, RecoverableErrorHandler, RecoverableReadError};
pub use config::{CodecConfig, ReaderConfig, WriterConfig, DEFAULT_MAX_RECORD_LENGTH};
pub use error::{
    ConfigError, FieldError, FieldResult, ReadError, ReadResult, WriteError, WriteResult,
};
pub use framing::{Blob, LogRecord, RawRecord, RecordHeader, RecordKind, StreamHeader};
pub use layout::{EventDecoder, EventEncoder};
pub use payload::PayloadReader;
pub use reader::{BinaryLogReader, ReaderStats, Records};
pub use version::FormatVersion;
pub use writer::BinaryLogWriter;
