//! XZ multibyte integer (MBI) codec: little-endian base-128 varints.

use crate::error::{Error, Result};

/// Maximum number of data bytes an XZ multibyte integer can occupy.
///
/// A `u64` needs at most `ceil(64 / 7) = 10` groups, but the XZ format caps
/// values at 63 bits, so 9 bytes suffice for every value this crate encodes.
pub const MAX_MBI_BYTES: usize = 9;

/// Encode `value` as a little-endian base-128 varint.
///
/// Each byte carries 7 bits of the value, low bits first; the high bit of a
/// byte is set when another byte follows.
pub fn encode(mut value: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(MAX_MBI_BYTES);
    while value >= 0x80 {
        data.push((value as u8 | 0x80) & 0xFF);
        value >>= 7;
    }
    data.push(value as u8);
    data
}

/// Decode a multibyte integer from the start of `data`.
///
/// Returns `(bytes_consumed, value)`. Fails with [`Error::InvalidMbi`] if
/// `data` is exhausted before a byte with a cleared continuation bit is
/// found.
pub fn decode(data: &[u8]) -> Result<(usize, u64)> {
    let mut value: u64 = 0;
    for (size, &byte) in data.iter().enumerate() {
        value |= u64::from(byte & 0x7F) << (size * 7);
        if byte & 0x80 == 0 {
            return Ok((size + 1, value));
        }
    }
    Err(Error::InvalidMbi)
}
