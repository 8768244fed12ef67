//! # Binary Log Reader
//!
//! Reconstructs build events from a framed record stream and applies the
//! compatibility policy configured in [`ReaderConfig`].
//!
//! ## Per-call State Machine
//!
//! ```text
//! AwaitingHeader → HeaderRead ─┬─ known kind ──→ decode ─┬─ exact ────────→ EventReturned
//!                              │                         ├─ tail left ────→ EventReturned (+ UnknownEventData)
//!                              │                         └─ decode failed → skip record (+ UnknownFormatOfEventData) ↺
//!                              ├─ unknown kind → skip record (+ UnknownEventType) ↺
//!                              └─ terminator ──→ EndOfStream
//! ```
//!
//! Every recovery resumes at the boundary given by the record's declared
//! length: the full payload is pulled from the source before it is decoded,
//! so how far the decoder got never moves the cursor. Recoveries happen only
//! in the lenient modes; in strict mode each of them is a fatal error.
//!
//! ## Fatal Errors
//!
//! Running out of input anywhere (header, payload, or before the terminator)
//! means the log is incomplete and is never reported as recoverable. Any
//! fatal error poisons the reader; later calls return
//! [`ReadError::ReaderPoisoned`].

use binlog_types::EventKind;
use bytes::Bytes;
use std::io::{self, Read};
use tracing::{debug, error, warn};

use crate::compat::{RecoverableErrorHandler, RecoverableReadError};
use crate::config::ReaderConfig;
use crate::error::{ReadError, ReadResult};
use crate::framing::{Blob, LogRecord, RawRecord, RecordHeader, RecordKind, StreamHeader};
use crate::layout::EventDecoder;
use crate::version::FormatVersion;

/// Counters kept by a reader over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Record headers read, including skipped records and the terminator
    pub records_read: u64,
    /// Structured events returned
    pub events: u64,
    /// Blob records returned
    pub blobs: u64,
    /// Records stepped over by a lenient mode
    pub skipped_records: u64,
    /// Recoverable errors reported
    pub recoverable_errors: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Reading,
    Finished,
    Poisoned,
}

/// Byte source that tracks how much has been consumed.
struct CountingReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

/// Reads build events from a byte source.
///
/// `'h` bounds the recoverable-error handler, which may borrow local state.
pub struct BinaryLogReader<'h, R: Read> {
    source: CountingReader<R>,
    version: FormatVersion,
    config: ReaderConfig,
    handler: Option<RecoverableErrorHandler<'h>>,
    state: ReaderState,
    payload: Vec<u8>,
    stats: ReaderStats,
}

impl<'h, R: Read> BinaryLogReader<'h, R> {
    /// Reader for a stream without a header, at a version supplied by the
    /// host.
    pub fn with_version(
        source: R,
        version: impl Into<FormatVersion>,
        config: ReaderConfig,
    ) -> ReadResult<Self> {
        config.validate()?;
        let version = version.into();
        if !version.is_supported() {
            return Err(ReadError::UnsupportedFormatVersion {
                version: version.get(),
                minimum_reader_version: version.get(),
                supported: format!(
                    "{}..={}",
                    FormatVersion::MINIMUM_SUPPORTED,
                    FormatVersion::CURRENT
                ),
            });
        }
        Ok(Self {
            source: CountingReader {
                inner: source,
                position: 0,
            },
            version,
            config,
            handler: None,
            state: ReaderState::Reading,
            payload: Vec::new(),
            stats: ReaderStats::default(),
        })
    }

    /// Reader for a stream that starts with a [`StreamHeader`]; the version
    /// is negotiated from it.
    pub fn open(source: R, config: ReaderConfig) -> ReadResult<Self> {
        config.validate()?;
        let mut source = CountingReader {
            inner: source,
            position: 0,
        };
        let header = StreamHeader::read_from(&mut source)
            .map_err(|e| ReadError::from_io(e, source.position, "stream header"))?;
        let version = FormatVersion::negotiate(&header)?;

        Ok(Self {
            source,
            version,
            config,
            handler: None,
            state: ReaderState::Reading,
            payload: Vec::new(),
            stats: ReaderStats::default(),
        })
    }

    /// Subscribe to recoverable errors. Replaces any earlier handler.
    pub fn on_recoverable_error<F>(&mut self, handler: F)
    where
        F: FnMut(&RecoverableReadError) + Send + 'h,
    {
        self.handler = Some(Box::new(handler));
    }

    pub fn format_version(&self) -> FormatVersion {
        self.version
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Bytes consumed from the source, including any stream header.
    pub fn position(&self) -> u64 {
        self.source.position
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Whether the terminator has been read.
    pub fn is_finished(&self) -> bool {
        self.state == ReaderState::Finished
    }

    pub fn into_inner(self) -> R {
        self.source.inner
    }

    /// Next event or blob, or `None` once the terminator has been read.
    pub fn read(&mut self) -> ReadResult<Option<LogRecord>> {
        self.ensure_readable()?;
        let result = self.read_record();
        self.settle(result)
    }

    /// Next record with its payload undecoded, or `None` once the terminator
    /// has been read. No compatibility policy applies: unknown kinds are
    /// returned like any other record.
    pub fn read_raw(&mut self) -> ReadResult<Option<RawRecord>> {
        self.ensure_readable()?;
        let result = self.read_raw_record();
        self.settle(result)
    }

    /// Iterate over the remaining records. Stops after the first error.
    pub fn records(&mut self) -> Records<'_, 'h, R> {
        Records {
            reader: self,
            done: false,
        }
    }

    fn ensure_readable(&self) -> ReadResult<()> {
        match self.state {
            ReaderState::Poisoned => Err(ReadError::ReaderPoisoned),
            ReaderState::Reading | ReaderState::Finished => Ok(()),
        }
    }

    fn settle<T>(&mut self, result: ReadResult<Option<T>>) -> ReadResult<Option<T>> {
        if let Err(e) = &result {
            error!(
                "Binary log reader failed at byte {}: {}",
                self.source.position, e
            );
            self.state = ReaderState::Poisoned;
        }
        result
    }

    fn read_record(&mut self) -> ReadResult<Option<LogRecord>> {
        loop {
            let Some((position, header, kind)) = self.next_header()? else {
                return Ok(None);
            };

            let kind = match kind {
                RecordKind::Known(kind) => kind,
                RecordKind::Unknown(ordinal) => {
                    if !self.config.skip_unknown_events {
                        return Err(ReadError::UnknownEventType {
                            kind,
                            length: header.length,
                            position,
                        });
                    }
                    self.skip_payload(header.length)?;
                    self.stats.skipped_records += 1;
                    debug!(ordinal, length = header.length, position, "Skipped unknown record");
                    self.report(RecoverableReadError::unknown_event_type(
                        ordinal,
                        position,
                        header.length,
                    ));
                    continue;
                }
            };

            self.fill_payload(position, kind.into(), header.length)?;

            if kind.is_blob() {
                self.stats.blobs += 1;
                return Ok(Some(LogRecord::Blob(Blob {
                    kind,
                    data: Bytes::copy_from_slice(&self.payload),
                })));
            }

            let mut decoder = EventDecoder::new(&self.payload, self.version);
            let (event, anomaly) = match decoder.decode(kind) {
                Ok(event) if decoder.unread().is_empty() => (Some(event), None),
                Ok(event) => {
                    let unread = decoder.unread();
                    if !self.config.skip_unknown_event_parts {
                        return Err(ReadError::UnknownEventData {
                            kind,
                            position,
                            declared: header.length,
                            unread: unread.len(),
                        });
                    }
                    let anomaly = RecoverableReadError::unknown_event_data(
                        kind.into(),
                        position,
                        header.length,
                        unread,
                    );
                    (Some(event), Some(anomaly))
                }
                Err(source) => {
                    if !self.config.skip_unknown_event_parts {
                        return Err(ReadError::MalformedRecord {
                            kind,
                            position,
                            source,
                        });
                    }
                    let anomaly = RecoverableReadError::unknown_format_of_event_data(
                        kind.into(),
                        position,
                        &self.payload,
                        &source,
                    );
                    (None, Some(anomaly))
                }
            };

            if let Some(anomaly) = anomaly {
                self.report(anomaly);
            }
            match event {
                Some(event) => {
                    self.stats.events += 1;
                    return Ok(Some(LogRecord::Event(event)));
                }
                None => {
                    self.stats.skipped_records += 1;
                    continue;
                }
            }
        }
    }

    fn read_raw_record(&mut self) -> ReadResult<Option<RawRecord>> {
        let Some((position, header, kind)) = self.next_header()? else {
            return Ok(None);
        };
        self.fill_payload(position, kind, header.length)?;
        Ok(Some(RawRecord {
            kind,
            payload: Bytes::copy_from_slice(&self.payload),
        }))
    }

    /// Read and classify the next record header. Consumes the terminator and
    /// returns `None` for it.
    fn next_header(&mut self) -> ReadResult<Option<(u64, RecordHeader, RecordKind)>> {
        if self.state == ReaderState::Finished {
            return Ok(None);
        }

        let position = self.source.position;
        let header = RecordHeader::read_from(&mut self.source)
            .map_err(|e| ReadError::from_io(e, self.source.position, "record header"))?;
        self.stats.records_read += 1;
        let kind = self.classify(header.kind);

        if kind == RecordKind::Known(EventKind::EndOfFile) {
            self.skip_payload(header.length)?;
            self.state = ReaderState::Finished;
            debug!(
                position = self.source.position,
                records = self.stats.records_read,
                "Reached end of binary log"
            );
            return Ok(None);
        }

        Ok(Some((position, header, kind)))
    }

    /// Kinds newer than the stream's version are as foreign as unregistered
    /// ordinals.
    fn classify(&self, ordinal: u32) -> RecordKind {
        match EventKind::from_ordinal(ordinal) {
            Some(kind) if self.version.supports_kind(kind) => RecordKind::Known(kind),
            _ => RecordKind::Unknown(ordinal),
        }
    }

    /// Buffer a payload for decoding. Only buffered payloads are held to
    /// `max_record_length`; skipped ones stream through.
    fn fill_payload(&mut self, position: u64, kind: RecordKind, length: u32) -> ReadResult<()> {
        if length > self.config.max_record_length {
            return Err(ReadError::RecordTooLarge {
                kind,
                position,
                length,
                limit: self.config.max_record_length,
            });
        }
        self.payload.clear();
        let expected = u64::from(length);
        let mut limited = (&mut self.source).take(expected);
        let result = limited.read_to_end(&mut self.payload);
        let read = result.map_err(|e| ReadError::from_io(e, self.source.position, "record payload"))?;
        if (read as u64) < expected {
            return Err(ReadError::unexpected_end_of_stream(
                self.source.position,
                format!("record payload ({read} of {length} bytes)"),
            ));
        }
        Ok(())
    }

    fn skip_payload(&mut self, length: u32) -> ReadResult<()> {
        let expected = u64::from(length);
        let mut limited = (&mut self.source).take(expected);
        let result = io::copy(&mut limited, &mut io::sink());
        let skipped = result.map_err(|e| ReadError::from_io(e, self.source.position, "record payload"))?;
        if skipped < expected {
            return Err(ReadError::unexpected_end_of_stream(
                self.source.position,
                format!("skipped record payload ({skipped} of {length} bytes)"),
            ));
        }
        Ok(())
    }

    fn report(&mut self, anomaly: RecoverableReadError) {
        self.stats.recoverable_errors += 1;
        warn!(
            error_type = %anomaly.error_type,
            record_kind = %anomaly.record_kind,
            position = anomaly.position,
            "{}",
            anomaly.formatted_message
        );
        if let Some(handler) = self.handler.as_mut() {
            handler(&anomaly);
        }
    }
}

/// Iterator over a reader's remaining records.
pub struct Records<'r, 'h, R: Read> {
    reader: &'r mut BinaryLogReader<'h, R>,
    done: bool,
}

impl<R: Read> Iterator for Records<'_, '_, R> {
    type Item = ReadResult<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
