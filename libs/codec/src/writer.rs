//! # Binary Log Writer
//!
//! Serializes build events into framed records on any [`Write`] sink.
//!
//! ## Crash Consistency
//!
//! Each record (header and payload) is assembled in memory and handed to the
//! sink in a single `write_all`. Once a call returns `Ok`, everything written
//! so far is a sequence of complete records, so a reader stopping at any call
//! boundary sees only whole records. The stream is only terminated by
//! [`BinaryLogWriter::finish`]; a log without its terminator reads as
//! incomplete.
//!
//! ## Failure
//!
//! A failing sink poisons the writer: the bytes already handed over are in an
//! unknown state, so every later call returns [`WriteError::WriterFailed`].
//! Errors detected before any byte is emitted (an unsupported kind, a
//! failing blob source) leave the writer usable.

use binlog_types::{BuildEvent, EventKind};
use bytes::BytesMut;
use std::io::{Read, Write};
use tracing::{debug, error};

use crate::buffers::PayloadBuffer;
use crate::config::WriterConfig;
use crate::error::{WriteError, WriteResult};
use crate::framing::{RawRecord, RecordHeader, RecordKind, StreamHeader};
use crate::layout::EventEncoder;
use crate::version::FormatVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Open,
    Failed,
}

/// Writes build events to a byte sink.
pub struct BinaryLogWriter<W: Write> {
    sink: W,
    config: WriterConfig,
    payload: PayloadBuffer,
    frame: BytesMut,
    state: WriterState,
    position: u64,
    records_written: u64,
}

impl<W: Write> BinaryLogWriter<W> {
    /// Writer for a stream whose format version travels out of band.
    ///
    /// No stream header is written; the reader must be constructed with the
    /// same version through
    /// [`BinaryLogReader::with_version`](crate::BinaryLogReader::with_version).
    pub fn new(sink: W, config: WriterConfig) -> WriteResult<Self> {
        config.validate()?;
        Ok(Self {
            sink,
            config,
            payload: PayloadBuffer::with_capacity(1024),
            frame: BytesMut::with_capacity(1024 + RecordHeader::MAX_SIZE),
            state: WriterState::Open,
            position: 0,
            records_written: 0,
        })
    }

    /// Writer for a self-describing stream: a [`StreamHeader`] carrying the
    /// configured versions is written first.
    pub fn create(sink: W, config: WriterConfig) -> WriteResult<Self> {
        let mut writer = Self::new(sink, config)?;
        let header = StreamHeader {
            format_version: writer.config.format_version.get(),
            minimum_reader_version: writer.config.minimum_reader_version.get(),
        };
        writer.frame.clear();
        header.encode_into(&mut writer.frame);
        writer.emit_frame("stream header")?;
        debug!(
            format_version = header.format_version,
            minimum_reader_version = header.minimum_reader_version,
            "Wrote stream header"
        );
        Ok(writer)
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn format_version(&self) -> FormatVersion {
        self.config.format_version
    }

    /// Bytes handed to the sink so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Records written so far, excluding the stream header.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Serialize one event as a record.
    pub fn write(&mut self, event: &BuildEvent) -> WriteResult<()> {
        self.ensure_open()?;
        let kind = event.kind();
        self.ensure_kind_supported(kind)?;

        self.payload.clear();
        EventEncoder::new(&mut self.payload, self.config.format_version)
            .log_environment(self.config.log_all_environment_variables)
            .encode(event);

        let payload = std::mem::take(&mut self.payload);
        let result = self.emit(RecordKind::Known(kind), payload.as_ref());
        self.payload = payload;
        result
    }

    /// Copy a blob from `source` into a record of a blob kind.
    ///
    /// The source is read to its end before anything is written, so a failing
    /// source leaves both the stream and the writer untouched.
    pub fn write_blob(&mut self, kind: EventKind, mut source: impl Read) -> WriteResult<()> {
        self.ensure_open()?;
        self.ensure_blob_kind(kind)?;
        let mut data = Vec::new();
        source
            .read_to_end(&mut data)
            .map_err(|source| WriteError::BlobSource { kind, source })?;
        self.write_blob_bytes(kind, &data)
    }

    pub fn write_blob_bytes(&mut self, kind: EventKind, data: &[u8]) -> WriteResult<()> {
        self.ensure_open()?;
        self.ensure_blob_kind(kind)?;
        self.emit(RecordKind::Known(kind), data)
    }

    /// Write a record whose payload is already encoded, e.g. when copying
    /// records between logs. Unknown kinds are passed through unchanged.
    pub fn write_raw(&mut self, record: &RawRecord) -> WriteResult<()> {
        self.ensure_open()?;
        if let RecordKind::Known(kind) = record.kind {
            if kind == EventKind::EndOfFile {
                return Err(WriteError::ReservedKind { kind });
            }
            self.ensure_kind_supported(kind)?;
        }
        self.emit(record.kind, &record.payload)
    }

    pub fn flush(&mut self) -> WriteResult<()> {
        self.ensure_open()?;
        if let Err(e) = self.sink.flush() {
            return Err(self.fail("flush", e));
        }
        Ok(())
    }

    /// Terminate the stream, flush, and hand back the sink.
    pub fn finish(mut self) -> WriteResult<W> {
        self.ensure_open()?;
        self.emit(RecordKind::Known(EventKind::EndOfFile), &[])?;
        self.flush()?;
        debug!(
            records = self.records_written,
            bytes = self.position,
            "Finished binary log"
        );
        Ok(self.sink)
    }

    fn ensure_open(&self) -> WriteResult<()> {
        match self.state {
            WriterState::Open => Ok(()),
            WriterState::Failed => Err(WriteError::WriterFailed),
        }
    }

    fn ensure_kind_supported(&self, kind: EventKind) -> WriteResult<()> {
        let version = self.config.format_version;
        if version.supports_kind(kind) {
            Ok(())
        } else {
            Err(WriteError::KindNotSupported {
                kind,
                required: kind.introduced_in(),
                version: version.get(),
            })
        }
    }

    fn ensure_blob_kind(&self, kind: EventKind) -> WriteResult<()> {
        if !kind.is_blob() {
            return Err(WriteError::InvalidBlobKind { kind });
        }
        self.ensure_kind_supported(kind)
    }

    fn emit(&mut self, kind: RecordKind, payload: &[u8]) -> WriteResult<()> {
        let limit = self.config.max_record_length;
        let length = u32::try_from(payload.len())
            .ok()
            .filter(|length| *length <= limit)
            .ok_or(WriteError::RecordTooLarge {
                kind,
                length: payload.len() as u64,
                limit: u64::from(limit),
            })?;

        let header = RecordHeader::new(kind.ordinal(), length);
        self.frame.clear();
        self.frame.reserve(header.encoded_len() + payload.len());
        header.encode_into(&mut self.frame);
        self.frame.extend_from_slice(payload);

        self.emit_frame("record")?;
        self.records_written += 1;
        Ok(())
    }

    fn emit_frame(&mut self, context: &str) -> WriteResult<()> {
        if let Err(e) = self.sink.write_all(&self.frame) {
            return Err(self.fail(context, e));
        }
        self.position += self.frame.len() as u64;
        Ok(())
    }

    fn fail(&mut self, context: &str, source: std::io::Error) -> WriteError {
        error!(
            "Binary log sink failed writing {} at byte {}: {}",
            context, self.position, source
        );
        self.state = WriterState::Failed;
        WriteError::io(format!("{context} at byte {}", self.position), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binlog_types::{BuildFinished, EventFields, TaskItem, TargetFinished};
    use std::io;

    /// Sink accepting a fixed number of bytes, then failing.
    struct LimitedSink {
        written: Vec<u8>,
        capacity: usize,
    }

    impl Write for LimitedSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() + buf.len() > self.capacity {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingSource;

    impl Read for FailingSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "source gone"))
        }
    }

    fn finished(succeeded: bool) -> BuildEvent {
        BuildEvent::BuildFinished(BuildFinished {
            fields: EventFields::with_message("done"),
            succeeded,
        })
    }

    #[test]
    fn test_records_are_framed() {
        let mut writer = BinaryLogWriter::new(Vec::new(), WriterConfig::default()).unwrap();
        writer.write(&finished(true)).unwrap();
        assert_eq!(writer.records_written(), 1);

        let bytes = writer.finish().unwrap();
        assert_eq!(bytes[0], EventKind::BuildFinished.ordinal() as u8);
        assert_eq!(bytes[1] as usize, bytes.len() - 2 - 2);
        // terminator
        assert_eq!(&bytes[bytes.len() - 2..], &[0u8, 0]);
    }

    #[test]
    fn test_create_writes_stream_header() {
        let config = WriterConfig::default().with_format_version(FormatVersion::new(14));
        let writer = BinaryLogWriter::create(Vec::new(), config).unwrap();
        assert_eq!(writer.position(), StreamHeader::SIZE as u64);
        assert_eq!(writer.records_written(), 0);
        assert_eq!(&writer.get_ref()[..4], &14u32.to_le_bytes());
    }

    #[test]
    fn test_kind_newer_than_version_is_rejected_without_output() {
        let config = WriterConfig::default().with_format_version(FormatVersion::new(12));
        let mut writer = BinaryLogWriter::new(Vec::new(), config).unwrap();
        let event = BuildEvent::BuildCanceled(Default::default());
        let err = writer.write(&event).unwrap_err();
        assert!(matches!(
            err,
            WriteError::KindNotSupported { kind: EventKind::BuildCanceled, required: 19, version: 12 }
        ));
        assert_eq!(writer.position(), 0);
        writer.write(&finished(false)).unwrap();
    }

    #[test]
    fn test_blob_kind_checks() {
        let mut writer = BinaryLogWriter::new(Vec::new(), WriterConfig::default()).unwrap();
        let err = writer.write_blob_bytes(EventKind::Message, b"abc").unwrap_err();
        assert!(matches!(err, WriteError::InvalidBlobKind { .. }));

        let err = writer
            .write_blob(EventKind::ProjectImportArchive, FailingSource)
            .unwrap_err();
        assert!(matches!(err, WriteError::BlobSource { .. }));
        assert_eq!(writer.position(), 0);

        writer
            .write_blob(EventKind::ProjectImportArchive, &b"zip"[..])
            .unwrap();
        assert_eq!(writer.records_written(), 1);
    }

    #[test]
    fn test_terminator_cannot_be_written_raw() {
        let mut writer = BinaryLogWriter::new(Vec::new(), WriterConfig::default()).unwrap();
        let err = writer
            .write_raw(&RawRecord::new(EventKind::EndOfFile, Vec::new()))
            .unwrap_err();
        assert!(matches!(err, WriteError::ReservedKind { .. }));
        writer.write_raw(&RawRecord::with_ordinal(200, vec![1u8, 2, 3])).unwrap();
        assert_eq!(writer.get_ref().as_slice(), &[0xC8u8, 0x01, 3, 1, 2, 3]);
    }

    #[test]
    fn test_sink_failure_poisons_writer() {
        let sink = LimitedSink {
            written: Vec::new(),
            capacity: 16,
        };
        let mut writer = BinaryLogWriter::new(sink, WriterConfig::default()).unwrap();
        let event = BuildEvent::TargetFinished(TargetFinished {
            fields: EventFields::with_message("a long enough message to overflow"),
            target_outputs: vec![TaskItem::new("out.dll")],
            ..Default::default()
        });
        let err = writer.write(&event).unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
        assert!(matches!(writer.write(&finished(true)), Err(WriteError::WriterFailed)));
        assert!(matches!(writer.flush(), Err(WriteError::WriterFailed)));
        assert!(matches!(writer.finish(), Err(WriteError::WriterFailed)));
    }

    #[test]
    fn test_record_length_limit_is_enforced_before_output() {
        let config = WriterConfig::default().with_max_record_length(16);
        let mut writer = BinaryLogWriter::new(Vec::new(), config).unwrap();

        let err = writer
            .write_blob_bytes(EventKind::ProjectImportArchive, &[7u8; 17])
            .unwrap_err();
        assert!(matches!(err, WriteError::RecordTooLarge { length: 17, limit: 16, .. }));
        let err = writer
            .write_raw(&RawRecord::with_ordinal(200, vec![0u8; 17]))
            .unwrap_err();
        assert!(matches!(err, WriteError::RecordTooLarge { .. }));
        assert_eq!(writer.position(), 0);

        // Not poisoned; a record at the limit still goes out
        writer
            .write_blob_bytes(EventKind::ProjectImportArchive, &[7u8; 16])
            .unwrap();
        assert_eq!(writer.records_written(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = WriterConfig::default().with_format_version(FormatVersion::new(0));
        assert!(matches!(
            BinaryLogWriter::new(Vec::new(), config),
            Err(WriteError::Config(_))
        ));
    }
}
