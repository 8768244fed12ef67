//! # Record Framing
//!
//! Every record on the wire is:
//!
//! ```text
//! ┌──────────────┬────────────────┬──────────────────────┐
//! │ kind: varint │ length: varint │ payload: length bytes│
//! └──────────────┴────────────────┴──────────────────────┘
//! ```
//!
//! The declared length is the only thing a reader trusts to find the next
//! record, so anything it cannot interpret can still be stepped over. A log
//! may start with an optional [`StreamHeader`] carrying its format version.

use binlog_types::{BuildEvent, EventKind};
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::io::{self, Read};

use crate::varint;

/// Kind and declared payload length of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub kind: u32,
    pub length: u32,
}

impl RecordHeader {
    /// Largest encoded header.
    pub const MAX_SIZE: usize = 2 * varint::MAX_LEN_32;

    pub fn new(kind: u32, length: u32) -> Self {
        Self { kind, length }
    }

    pub fn encoded_len(&self) -> usize {
        varint::encoded_len(u64::from(self.kind)) + varint::encoded_len(u64::from(self.length))
    }

    pub fn encode_into(&self, out: &mut BytesMut) {
        varint::put_u32(out, self.kind);
        varint::put_u32(out, self.length);
    }

    /// Read a header from a stream. Short input surfaces as `UnexpectedEof`.
    pub fn read_from(src: &mut impl Read) -> io::Result<Self> {
        let kind = varint::read_u32(src)?;
        let length = varint::read_u32(src)?;
        Ok(Self { kind, length })
    }
}

/// Versioning preamble written once at the start of a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Format version the writer emitted
    pub format_version: u32,
    /// Oldest reader version able to make sense of the stream
    pub minimum_reader_version: u32,
}

impl StreamHeader {
    /// Two little-endian `u32`s.
    pub const SIZE: usize = 8;

    pub fn encode_into(&self, out: &mut BytesMut) {
        out.put_u32_le(self.format_version);
        out.put_u32_le(self.minimum_reader_version);
    }

    pub fn read_from(src: &mut impl Read) -> io::Result<Self> {
        let mut raw = [0u8; Self::SIZE];
        src.read_exact(&mut raw)?;
        Ok(Self {
            format_version: u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            minimum_reader_version: u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
        })
    }
}

/// Kind of a record as seen by a particular reader.
///
/// `Unknown` carries the raw ordinal of a kind this reader has no decoder
/// for: reserved ordinals, kinds from newer writers, or kinds newer than the
/// format version being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Known(EventKind),
    Unknown(u32),
}

impl RecordKind {
    pub fn from_ordinal(ordinal: u32) -> Self {
        match EventKind::from_ordinal(ordinal) {
            Some(kind) => RecordKind::Known(kind),
            None => RecordKind::Unknown(ordinal),
        }
    }

    pub fn ordinal(self) -> u32 {
        match self {
            RecordKind::Known(kind) => kind.ordinal(),
            RecordKind::Unknown(ordinal) => ordinal,
        }
    }

    pub fn known(self) -> Option<EventKind> {
        match self {
            RecordKind::Known(kind) => Some(kind),
            RecordKind::Unknown(_) => None,
        }
    }
}

impl From<EventKind> for RecordKind {
    fn from(kind: EventKind) -> Self {
        RecordKind::Known(kind)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Known(kind) => write!(f, "{kind}"),
            RecordKind::Unknown(ordinal) => write!(f, "unknown kind {ordinal}"),
        }
    }
}

/// A record with its payload left undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub kind: RecordKind,
    pub payload: Bytes,
}

impl RawRecord {
    pub fn new(kind: impl Into<RecordKind>, payload: impl Into<Bytes>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
        }
    }

    /// Record with an arbitrary ordinal, known or not.
    pub fn with_ordinal(ordinal: u32, payload: impl Into<Bytes>) -> Self {
        Self::new(RecordKind::from_ordinal(ordinal), payload)
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Opaque payload stored under a blob kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub kind: EventKind,
    pub data: Bytes,
}

/// One item returned by the reader.
#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    Event(BuildEvent),
    Blob(Blob),
}

impl LogRecord {
    pub fn kind(&self) -> EventKind {
        match self {
            LogRecord::Event(event) => event.kind(),
            LogRecord::Blob(blob) => blob.kind,
        }
    }

    pub fn as_event(&self) -> Option<&BuildEvent> {
        match self {
            LogRecord::Event(event) => Some(event),
            LogRecord::Blob(_) => None,
        }
    }

    pub fn into_event(self) -> Option<BuildEvent> {
        match self {
            LogRecord::Event(event) => Some(event),
            LogRecord::Blob(_) => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            LogRecord::Event(_) => None,
            LogRecord::Blob(blob) => Some(blob),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_header_layout() {
        let header = RecordHeader::new(EventKind::TargetStarted.ordinal(), 300);
        let mut out = BytesMut::new();
        header.encode_into(&mut out);
        assert_eq!(&out[..], &hex!("05 ac 02"));
        assert_eq!(header.encoded_len(), 3);

        let mut src: &[u8] = &out;
        assert_eq!(RecordHeader::read_from(&mut src).unwrap(), header);
    }

    #[test]
    fn test_header_cut_after_kind_is_eof() {
        let mut src: &[u8] = &hex!("05");
        let err = RecordHeader::read_from(&mut src).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_stream_header_is_little_endian() {
        let header = StreamHeader {
            format_version: 20,
            minimum_reader_version: 18,
        };
        let mut out = BytesMut::new();
        header.encode_into(&mut out);
        assert_eq!(&out[..], &hex!("14 00 00 00 12 00 00 00"));
        let mut src: &[u8] = &out;
        assert_eq!(StreamHeader::read_from(&mut src).unwrap(), header);
    }

    #[test]
    fn test_record_kind_classification() {
        assert_eq!(RecordKind::from_ordinal(11), RecordKind::Known(EventKind::Message));
        assert_eq!(RecordKind::from_ordinal(23), RecordKind::Unknown(23));
        assert_eq!(RecordKind::from_ordinal(200).ordinal(), 200);
        assert_eq!(RecordKind::Unknown(200).to_string(), "unknown kind 200");
        assert_eq!(RecordKind::Known(EventKind::Warning).to_string(), "Warning");
    }
}
