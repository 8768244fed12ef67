//! # Format Version Gate
//!
//! A log's format version decides which record kinds and which fields inside
//! a record may appear. Writers never emit anything newer than the version
//! they were configured with; readers never try to decode anything newer than
//! the version of the stream they are reading.
//!
//! The gate is a configuration-time contract, not a per-record negotiation:
//! the unanticipated case (a writer newer than any version this crate knows)
//! is handled by the reader's lenient modes instead.

use binlog_types::EventKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{ReadError, ReadResult};
use crate::framing::StreamHeader;

/// Monotonically increasing log format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatVersion(pub u32);

impl FormatVersion {
    /// Version written by this crate
    pub const CURRENT: FormatVersion = FormatVersion(20);
    /// Oldest version this crate can read
    pub const MINIMUM_SUPPORTED: FormatVersion = FormatVersion(1);

    /// Build event contexts carry an evaluation id
    pub const EVALUATION_ID: FormatVersion = FormatVersion(2);
    /// Task start records carry the task's line and column
    pub const TASK_LOCATION: FormatVersion = FormatVersion(8);
    /// Skipped targets carry the condition, skip reason and original context
    pub const TARGET_SKIPPED_DETAILS: FormatVersion = FormatVersion(14);
    /// Task start records carry the assembly location of the task
    pub const TASK_ASSEMBLY_LOCATION: FormatVersion = FormatVersion(19);

    #[inline]
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether a field introduced at `gate` is present at this version.
    #[inline]
    pub fn supports(self, gate: FormatVersion) -> bool {
        self >= gate
    }

    /// Whether records of `kind` may appear at this version.
    #[inline]
    pub fn supports_kind(self, kind: EventKind) -> bool {
        self.0 >= kind.introduced_in()
    }

    /// Whether this crate can read or write this version at all.
    pub fn is_supported(self) -> bool {
        (Self::MINIMUM_SUPPORTED..=Self::CURRENT).contains(&self)
    }

    /// Pick the version to decode a stream with.
    ///
    /// Streams newer than [`Self::CURRENT`] are read as `CURRENT` unless the
    /// writer declared that readers older than some later version cannot
    /// understand them.
    pub fn negotiate(header: &StreamHeader) -> ReadResult<FormatVersion> {
        let stream = FormatVersion(header.format_version);
        let minimum_reader = FormatVersion(header.minimum_reader_version);

        if stream < Self::MINIMUM_SUPPORTED || minimum_reader > Self::CURRENT {
            return Err(ReadError::UnsupportedFormatVersion {
                version: header.format_version,
                minimum_reader_version: header.minimum_reader_version,
                supported: format!("{}..={}", Self::MINIMUM_SUPPORTED, Self::CURRENT),
            });
        }

        let negotiated = stream.min(Self::CURRENT);
        debug!(
            stream_version = stream.0,
            minimum_reader_version = minimum_reader.0,
            negotiated = negotiated.0,
            "Negotiated log format version"
        );
        Ok(negotiated)
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl From<u32> for FormatVersion {
    fn from(version: u32) -> Self {
        Self(version)
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
