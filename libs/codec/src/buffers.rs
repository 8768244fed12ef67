//! # Payload Buffer - Field Encoding
//!
//! In-memory buffer one record payload is serialized into before it is framed.
//! Every method appends exactly one primitive in its wire representation:
//!
//! | Primitive        | Encoding                                              |
//! |------------------|-------------------------------------------------------|
//! | `u32`, `u64`     | 7-bit varint                                          |
//! | `i32`            | 7-bit varint of the `u32` bit pattern                 |
//! | `bool`           | one byte, `0` or `1`                                  |
//! | timestamp, `i64` | 8 bytes little-endian                                 |
//! | string           | varint byte length + UTF-8                            |
//! | optional value   | presence byte (`0` absent, `1` present) + value       |
//! | map / list       | varint count + entries                                |
//! | GUID             | 16 raw bytes                                          |
//!
//! Optional strings use the presence byte so that `None` and `Some("")`
//! remain different values after a round trip.

use binlog_types::{Metadata, Timestamp};
use bytes::{BufMut, BytesMut};
use std::collections::BTreeMap;

use crate::varint;

pub(crate) const ABSENT: u8 = 0;
pub(crate) const PRESENT: u8 = 1;

/// Growable buffer for one record payload.
#[derive(Debug, Default)]
pub struct PayloadBuffer {
    buf: BytesMut,
}

impl AsRef<[u8]> for PayloadBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl PayloadBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Reset for the next record, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    #[inline]
    pub fn byte(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    #[inline]
    pub fn bool(&mut self, value: bool) {
        self.byte(u8::from(value));
    }

    #[inline]
    pub fn u32(&mut self, value: u32) {
        varint::put_u32(&mut self.buf, value);
    }

    #[inline]
    pub fn u64(&mut self, value: u64) {
        varint::put_u64(&mut self.buf, value);
    }

    /// Signed 32-bit value, encoded through its unsigned bit pattern.
    #[inline]
    pub fn i32(&mut self, value: i32) {
        self.u32(value as u32);
    }

    /// Fixed-width signed 64-bit value.
    #[inline]
    pub fn i64_fixed(&mut self, value: i64) {
        self.buf.put_i64_le(value);
    }

    #[inline]
    pub fn timestamp(&mut self, value: Timestamp) {
        self.i64_fixed(value.ticks());
    }

    #[inline]
    pub fn guid(&mut self, value: &[u8; 16]) {
        self.buf.put_slice(value);
    }

    /// Small enumeration, written as its underlying integer.
    #[inline]
    pub fn enum_value<E: Into<u32>>(&mut self, value: E) {
        self.u32(value.into());
    }

    /// Length counts, collection sizes.
    #[inline]
    pub fn len_prefix(&mut self, len: usize) {
        self.u64(len as u64);
    }

    /// Required string.
    pub fn str(&mut self, value: &str) {
        self.buf.reserve(varint::MAX_LEN_64 + value.len());
        self.len_prefix(value.len());
        self.buf.put_slice(value.as_bytes());
    }

    /// Nullable string with a presence byte.
    pub fn opt_str(&mut self, value: Option<&str>) {
        match value {
            Some(s) => {
                self.byte(PRESENT);
                self.str(s);
            }
            None => self.byte(ABSENT),
        }
    }

    /// Presence byte only; the caller writes the value when `present`.
    #[inline]
    pub fn presence(&mut self, present: bool) -> bool {
        self.byte(if present { PRESENT } else { ABSENT });
        present
    }

    pub fn string_list(&mut self, values: &[String]) {
        self.len_prefix(values.len());
        for value in values {
            self.str(value);
        }
    }

    /// Key/value pairs in key order.
    pub fn metadata(&mut self, values: &Metadata) {
        self.len_prefix(values.len());
        for (key, value) in values {
            self.str(key);
            self.str(value);
        }
    }

    pub fn opt_metadata(&mut self, values: Option<&Metadata>) {
        if let Some(values) = values {
            self.byte(PRESENT);
            self.metadata(values);
        } else {
            self.byte(ABSENT);
        }
    }

    /// Name to tick-duration mapping.
    pub fn durations(&mut self, values: &BTreeMap<String, i64>) {
        self.len_prefix(values.len());
        for (key, ticks) in values {
            self.str(key);
            self.i64_fixed(*ticks);
        }
    }
}
