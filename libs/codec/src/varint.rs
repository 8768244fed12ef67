//! 7-bit variable-length integers.
//!
//! Little-endian groups of seven bits, high bit set on every byte but the
//! last. A 32-bit value takes at most 5 bytes and a 64-bit value at most 10;
//! encodings longer than that, or whose final byte carries bits beyond the
//! target width, are rejected.

use bytes::BufMut;
use std::io::{self, Read};

/// Maximum encoded length of a 32-bit value.
pub const MAX_LEN_32: usize = 5;

/// Maximum encoded length of a 64-bit value.
pub const MAX_LEN_64: usize = 10;

/// Append `value` to `out`.
#[inline]
pub fn put_u64(out: &mut impl BufMut, mut value: u64) {
    while value >= 0x80 {
        out.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    out.put_u8(value as u8);
}

#[inline]
pub fn put_u32(out: &mut impl BufMut, value: u32) {
    put_u64(out, u64::from(value));
}

/// Number of bytes `value` occupies once encoded.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Outcome of decoding a varint from a byte slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceDecode<T> {
    /// Value and the number of bytes it used
    Value(T, usize),
    /// The slice ended mid-value
    Truncated,
    /// Too many continuation bytes or bits beyond the target width
    Overflow,
}

/// Decode a 32-bit varint from the start of `bytes`.
pub fn decode_u32(bytes: &[u8]) -> SliceDecode<u32> {
    match decode(bytes, MAX_LEN_32) {
        SliceDecode::Value(v, n) => match u32::try_from(v) {
            Ok(v) => SliceDecode::Value(v, n),
            Err(_) => SliceDecode::Overflow,
        },
        SliceDecode::Truncated => SliceDecode::Truncated,
        SliceDecode::Overflow => SliceDecode::Overflow,
    }
}

/// Decode a 64-bit varint from the start of `bytes`.
pub fn decode_u64(bytes: &[u8]) -> SliceDecode<u64> {
    decode(bytes, MAX_LEN_64)
}

fn decode(bytes: &[u8], max_len: usize) -> SliceDecode<u64> {
    let mut result: u64 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if i == max_len {
            return SliceDecode::Overflow;
        }
        let group = u64::from(b & 0x7F);
        let shift = 7 * i as u32;
        if shift == 63 && group > 1 {
            return SliceDecode::Overflow;
        }
        result |= group << shift;
        if b & 0x80 == 0 {
            return SliceDecode::Value(result, i + 1);
        }
    }
    if bytes.len() >= max_len {
        SliceDecode::Overflow
    } else {
        SliceDecode::Truncated
    }
}

/// Read a 32-bit varint from a stream one byte at a time.
///
/// A short stream surfaces as `UnexpectedEof`, a malformed value as
/// `InvalidData`.
pub fn read_u32(src: &mut impl Read) -> io::Result<u32> {
    let mut result: u64 = 0;
    let mut byte = [0u8; 1];
    for i in 0..MAX_LEN_32 {
        src.read_exact(&mut byte)?;
        result |= u64::from(byte[0] & 0x7F) << (7 * i);
        if byte[0] & 0x80 == 0 {
            return u32::try_from(result).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "varint exceeds 32 bits")
            });
        }
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        "varint longer than 5 bytes",
    ))
}
