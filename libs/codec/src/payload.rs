//! # Payload Reader - Field Decoding
//!
//! Cursor over one record's payload. The mirror image of
//! [`PayloadBuffer`](crate::buffers::PayloadBuffer): every method consumes one
//! primitive and returns a [`FieldResult`], naming the field it was decoding so
//! a failure can be located without re-running the decode.
//!
//! The reader never looks past the slice it was given. Running off its end is
//! [`FieldError::EndOfPayload`]; bytes that are present but invalid are
//! [`FieldError::Format`]. Both stay scoped to the current record.

use binlog_types::{Metadata, Timestamp};
use std::collections::BTreeMap;

use crate::buffers::{ABSENT, PRESENT};
use crate::error::{FieldError, FieldResult};
use crate::varint::{self, SliceDecode};

/// Decoding cursor over a record payload.
#[derive(Debug, Clone)]
pub struct PayloadReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PayloadReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left in the payload.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, field: &'static str, n: usize) -> FieldResult<&'a [u8]> {
        if n > self.remaining() {
            return Err(FieldError::end_of_payload(field, self.pos, n, self.data.len()));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn byte(&mut self, field: &'static str) -> FieldResult<u8> {
        Ok(self.take(field, 1)?[0])
    }

    pub fn bool(&mut self, field: &'static str) -> FieldResult<bool> {
        let offset = self.pos;
        match self.byte(field)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(FieldError::format(
                field,
                offset,
                format!("boolean byte must be 0 or 1, found {other:#04x}"),
            )),
        }
    }

    pub fn u32(&mut self, field: &'static str) -> FieldResult<u32> {
        match varint::decode_u32(&self.data[self.pos..]) {
            SliceDecode::Value(value, used) => {
                self.pos += used;
                Ok(value)
            }
            SliceDecode::Truncated => Err(FieldError::end_of_payload(
                field,
                self.pos,
                self.remaining() + 1,
                self.data.len(),
            )),
            SliceDecode::Overflow => Err(FieldError::format(
                field,
                self.pos,
                "7-bit encoded integer exceeds 32 bits",
            )),
        }
    }

    pub fn u64(&mut self, field: &'static str) -> FieldResult<u64> {
        match varint::decode_u64(&self.data[self.pos..]) {
            SliceDecode::Value(value, used) => {
                self.pos += used;
                Ok(value)
            }
            SliceDecode::Truncated => Err(FieldError::end_of_payload(
                field,
                self.pos,
                self.remaining() + 1,
                self.data.len(),
            )),
            SliceDecode::Overflow => Err(FieldError::format(
                field,
                self.pos,
                "7-bit encoded integer exceeds 64 bits",
            )),
        }
    }

    #[inline]
    pub fn i32(&mut self, field: &'static str) -> FieldResult<i32> {
        self.u32(field).map(|v| v as i32)
    }

    pub fn i64_fixed(&mut self, field: &'static str) -> FieldResult<i64> {
        let bytes = self.take(field, 8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(i64::from_le_bytes(raw))
    }

    #[inline]
    pub fn timestamp(&mut self, field: &'static str) -> FieldResult<Timestamp> {
        self.i64_fixed(field).map(Timestamp::from_ticks)
    }

    pub fn guid(&mut self, field: &'static str) -> FieldResult<[u8; 16]> {
        let bytes = self.take(field, 16)?;
        let mut guid = [0u8; 16];
        guid.copy_from_slice(bytes);
        Ok(guid)
    }

    /// Small enumeration; an ordinal the target type does not define is a
    /// format error.
    pub fn enum_value<E: TryFrom<u32>>(&mut self, field: &'static str) -> FieldResult<E> {
        let offset = self.pos;
        let ordinal = self.u32(field)?;
        E::try_from(ordinal)
            .map_err(|_| FieldError::format(field, offset, format!("unknown ordinal {ordinal}")))
    }

    /// Byte length prefix; must fit in what is left of the payload.
    pub fn len_prefix(&mut self, field: &'static str) -> FieldResult<usize> {
        let offset = self.pos;
        let len = self.u64(field)?;
        match usize::try_from(len) {
            Ok(len) if len <= self.remaining() => Ok(len),
            _ => Err(FieldError::end_of_payload(
                field,
                offset,
                usize::try_from(len).unwrap_or(usize::MAX),
                self.data.len(),
            )),
        }
    }

    /// Element count for a collection.
    ///
    /// Every element takes at least one byte, so a count larger than the rest
    /// of the payload cannot be genuine. Rejecting it up front keeps a garbled
    /// count from driving a huge allocation.
    pub fn count(&mut self, field: &'static str) -> FieldResult<usize> {
        let offset = self.pos;
        let count = self.u64(field)?;
        match usize::try_from(count) {
            Ok(count) if count <= self.remaining() => Ok(count),
            _ => Err(FieldError::format(
                field,
                offset,
                format!("count {count} exceeds the {} bytes left in the record", self.remaining()),
            )),
        }
    }

    pub fn str(&mut self, field: &'static str) -> FieldResult<String> {
        let len = self.len_prefix(field)?;
        let offset = self.pos;
        let bytes = self.take(field, len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| FieldError::format(field, offset, format!("invalid UTF-8: {e}")))
    }

    /// Presence byte; `true` when a value follows.
    pub fn presence(&mut self, field: &'static str) -> FieldResult<bool> {
        let offset = self.pos;
        match self.byte(field)? {
            ABSENT => Ok(false),
            PRESENT => Ok(true),
            other => Err(FieldError::format(
                field,
                offset,
                format!("presence marker must be 0 or 1, found {other:#04x}"),
            )),
        }
    }

    pub fn opt_str(&mut self, field: &'static str) -> FieldResult<Option<String>> {
        if self.presence(field)? {
            self.str(field).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn string_list(&mut self, field: &'static str) -> FieldResult<Vec<String>> {
        let count = self.count(field)?;
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(self.str(field)?);
        }
        Ok(values)
    }

    /// Key/value map. A repeated key is a format error, since the writer only
    /// ever emits unique keys.
    pub fn metadata(&mut self, field: &'static str) -> FieldResult<Metadata> {
        let count = self.count(field)?;
        let mut values = Metadata::new();
        for _ in 0..count {
            let offset = self.pos;
            let key = self.str(field)?;
            let value = self.str(field)?;
            if values.insert(key, value).is_some() {
                return Err(FieldError::format(field, offset, "duplicate key"));
            }
        }
        Ok(values)
    }

    pub fn opt_metadata(&mut self, field: &'static str) -> FieldResult<Option<Metadata>> {
        if self.presence(field)? {
            self.metadata(field).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn durations(&mut self, field: &'static str) -> FieldResult<BTreeMap<String, i64>> {
        let count = self.count(field)?;
        let mut values = BTreeMap::new();
        for _ in 0..count {
            let offset = self.pos;
            let key = self.str(field)?;
            let ticks = self.i64_fixed(field)?;
            if values.insert(key, ticks).is_some() {
                return Err(FieldError::format(field, offset, "duplicate key"));
            }
        }
        Ok(values)
    }

    /// Unread tail of the payload, without consuming it.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}
