//! # Recoverable Read Errors
//!
//! Anything a lenient reader steps over is reported here before the read
//! continues. Hosts subscribe with
//! [`BinaryLogReader::on_recoverable_error`](crate::BinaryLogReader::on_recoverable_error);
//! the callback runs inline on the reader's thread, so it must not block.

use std::fmt;

use crate::error::FieldError;
use crate::framing::RecordKind;

/// Number of payload bytes shown in diagnostics.
const PREVIEW_BYTES: usize = 16;

/// Class of anomaly a lenient reader recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderErrorType {
    /// Record kind not understood; the whole record was skipped
    UnknownEventType,
    /// Known record with trailing bytes; the event was returned without them
    UnknownEventData,
    /// Known record whose payload could not be decoded; no event was returned
    UnknownFormatOfEventData,
}

impl fmt::Display for ReaderErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReaderErrorType::UnknownEventType => "UnknownEventType",
            ReaderErrorType::UnknownEventData => "UnknownEventData",
            ReaderErrorType::UnknownFormatOfEventData => "UnknownFormatOfEventData",
        })
    }
}

/// One recovered anomaly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableReadError {
    pub error_type: ReaderErrorType,
    pub record_kind: RecordKind,
    pub formatted_message: String,
    /// Stream offset of the record header
    pub position: u64,
    /// Declared payload length of the record
    pub declared_length: u32,
}

impl RecoverableReadError {
    pub fn unknown_event_type(ordinal: u32, position: u64, declared_length: u32) -> Self {
        Self {
            error_type: ReaderErrorType::UnknownEventType,
            record_kind: RecordKind::Unknown(ordinal),
            formatted_message: format!(
                "Skipped record of unknown kind {ordinal} at byte {position} ({declared_length} bytes)"
            ),
            position,
            declared_length,
        }
    }

    pub fn unknown_event_data(
        kind: RecordKind,
        position: u64,
        declared_length: u32,
        unread: &[u8],
    ) -> Self {
        Self {
            error_type: ReaderErrorType::UnknownEventData,
            record_kind: kind,
            formatted_message: format!(
                "{kind} record at byte {position}: ignored {} trailing bytes of {declared_length} [{}]",
                unread.len(),
                preview(unread)
            ),
            position,
            declared_length,
        }
    }

    pub fn unknown_format_of_event_data(
        kind: RecordKind,
        position: u64,
        payload: &[u8],
        error: &FieldError,
    ) -> Self {
        let declared_length = u32::try_from(payload.len()).unwrap_or(u32::MAX);
        Self {
            error_type: ReaderErrorType::UnknownFormatOfEventData,
            record_kind: kind,
            formatted_message: format!(
                "{kind} record at byte {position} could not be decoded ({}: {error}); skipped {declared_length} bytes [{}]",
                error.class(),
                preview(payload)
            ),
            position,
            declared_length,
        }
    }
}

impl fmt::Display for RecoverableReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.formatted_message)
    }
}

/// Callback invoked for every recoverable error. It may borrow from the
/// caller for `'h`, the lifetime of the reader it is registered on.
pub type RecoverableErrorHandler<'h> = Box<dyn FnMut(&RecoverableReadError) + Send + 'h>;

fn preview(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(PREVIEW_BYTES)];
    if bytes.len() > PREVIEW_BYTES {
        format!("{}...", hex::encode(shown))
    } else {
        hex::encode(shown)
    }
}
