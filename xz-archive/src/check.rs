//! Wire-format check kind (spec §4.1, §6.2) mapped onto
//! [`lzma_safe::encoder::options::check::IntegrityCheck`].
//!
//! The XZ wire format allows `check_kind` values `0x00..=0x0F`, but only
//! four are backed by a real algorithm; the rest are reserved. A block or
//! stream carrying a reserved value can still be parsed (spec never rejects
//! unknown-but-in-range check kinds at the framing layer) but cannot be fed
//! to the codec, so the conversion used by the block engine is fallible.

use lzma_safe::encoder::options::check::IntegrityCheck;

use crate::error::{Error, Result};

pub const CHECK_NONE: u8 = 0x00;
pub const CHECK_CRC32: u8 = 0x01;
pub const CHECK_CRC64: u8 = 0x04;
pub const CHECK_SHA256: u8 = 0x0A;

/// Default check kind for newly created streams, matching `xz.file.DEFAULT_CHECK`.
pub const DEFAULT_CHECK: u8 = CHECK_CRC64;

/// Convert a wire check-kind byte to the codec's [`IntegrityCheck`].
///
/// Fails [`Error::Unsupported`] for any value in `0x00..=0x0F` that isn't
/// one of the four algorithms the codec implements.
pub fn to_integrity_check(check_kind: u8) -> Result<IntegrityCheck> {
    match check_kind {
        CHECK_NONE => Ok(IntegrityCheck::None),
        CHECK_CRC32 => Ok(IntegrityCheck::Crc32),
        CHECK_CRC64 => Ok(IntegrityCheck::Crc64),
        CHECK_SHA256 => Ok(IntegrityCheck::Sha256),
        0x00..=0x0F => Err(Error::Unsupported),
        _ => Err(Error::FooterCheck),
    }
}

/// Convert a codec [`IntegrityCheck`] back to its wire check-kind byte.
pub fn from_integrity_check(check: IntegrityCheck) -> u8 {
    match check {
        IntegrityCheck::None => CHECK_NONE,
        IntegrityCheck::Crc32 => CHECK_CRC32,
        IntegrityCheck::Crc64 => CHECK_CRC64,
        IntegrityCheck::Sha256 => CHECK_SHA256,
    }
}

#[cfg(test)]
mod tests;
