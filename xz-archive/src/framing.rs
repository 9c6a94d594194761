//! XZ container framing codec: stream header, index, and stream footer
//! (spec §4.1). Grounded on `xz.common` (original_source), reproducing its
//! byte-for-byte layout and its validation order.

use crate::crc32;
use crate::error::{Error, Result};
use crate::mbi;

/// Magic bytes at the start of every XZ stream header.
pub const HEADER_MAGIC: [u8; 6] = [0xFD, b'7', b'z', b'X', b'Z', 0x00];

/// Magic bytes at the end of every XZ stream footer.
pub const FOOTER_MAGIC: [u8; 2] = [b'Y', b'Z'];

/// Size in bytes of a stream header.
pub const HEADER_SIZE: usize = 12;

/// Size in bytes of a stream footer.
pub const FOOTER_SIZE: usize = 12;

/// Round `value` up to the nearest multiple of 4.
pub fn round_up4(value: u64) -> u64 {
    let remainder = value % 4;
    if remainder == 0 {
        value
    } else {
        value - remainder + 4
    }
}

/// The 0..3 zero bytes needed to round `value` up to a multiple of 4.
fn padding_for(value: usize) -> Vec<u8> {
    vec![0_u8; round_up4(value as u64) as usize - value]
}

fn check_check_kind(check_kind: u8, err: Error) -> Result<()> {
    if check_kind > 0x0F {
        Err(err)
    } else {
        Ok(())
    }
}

/// Build a 12-byte XZ stream header for `check_kind`.
///
/// Fails with [`Error::FooterCheck`] if `check_kind` is out of `0..=0x0F`
/// (the header and footer share the same range check in the original;
/// spec §4.1 names the header-side failure `HEADER_FLAGS`, but construction
/// validates the same way emission of the index/footer does).
pub fn create_header(check_kind: u8) -> Result<[u8; HEADER_SIZE]> {
    check_check_kind(check_kind, Error::HeaderFlags)?;
    let flags = [0_u8, check_kind];
    let crc = crc32::checksum_le_bytes(&flags);

    let mut out = [0_u8; HEADER_SIZE];
    out[0..6].copy_from_slice(&HEADER_MAGIC);
    out[6..8].copy_from_slice(&flags);
    out[8..12].copy_from_slice(&crc);
    Ok(out)
}

/// Parse a 12-byte XZ stream header, returning its check kind.
pub fn parse_header(header: &[u8]) -> Result<u8> {
    if header.len() != HEADER_SIZE {
        return Err(Error::HeaderLength);
    }
    if header[0..6] != HEADER_MAGIC {
        return Err(Error::HeaderMagic);
    }
    let flags = &header[6..8];
    if crc32::checksum_le_bytes(flags) != header[8..12] {
        return Err(Error::HeaderCrc32);
    }
    let (flag_first_byte, check_kind) = (flags[0], flags[1]);
    if flag_first_byte != 0 || check_kind > 0x0F {
        return Err(Error::HeaderFlags);
    }
    Ok(check_kind)
}

/// Encode the index body (indicator byte, record count, records, padding,
/// CRC32) for `records`.
fn encode_index(records: &[(u64, u64)]) -> Vec<u8> {
    let mut index = vec![0_u8];
    index.extend(mbi::encode(records.len() as u64));
    for &(unpadded_size, uncompressed_size) in records {
        index.extend(mbi::encode(unpadded_size));
        index.extend(mbi::encode(uncompressed_size));
    }
    index.extend(padding_for(index.len()));
    let crc = crc32::checksum_le_bytes(&index);
    index.extend(crc);
    index
}

/// Encode a 12-byte stream footer for `check_kind` whose index was
/// `index_len` bytes long.
fn encode_footer(check_kind: u8, index_len: usize) -> [u8; FOOTER_SIZE] {
    let backward_size = (index_len as u32 / 4) - 1;
    let mut body = [0_u8; 6];
    body[0..4].copy_from_slice(&backward_size.to_le_bytes());
    body[4] = 0;
    body[5] = check_kind;

    let mut out = [0_u8; FOOTER_SIZE];
    out[0..4].copy_from_slice(&crc32::checksum_le_bytes(&body));
    out[4..10].copy_from_slice(&body);
    out[10..12].copy_from_slice(&FOOTER_MAGIC);
    out
}

/// Build the `index ‖ footer` tail for a stream with `check_kind` and the
/// given `(unpadded_size, uncompressed_size)` block records.
///
/// Fails with [`Error::FooterCheck`] if `check_kind` is out of `0..=0x0F`.
pub fn create_index_footer(check_kind: u8, records: &[(u64, u64)]) -> Result<Vec<u8>> {
    check_check_kind(check_kind, Error::FooterCheck)?;
    let mut index = encode_index(records);
    let footer = encode_footer(check_kind, index.len());
    index.extend(footer);
    Ok(index)
}

/// Parse an XZ index body into its `(unpadded_size, uncompressed_size)`
/// records.
pub fn parse_index(index: &[u8]) -> Result<Vec<(u64, u64)>> {
    if index.len() < 8 || index.len() % 4 != 0 {
        return Err(Error::IndexLength);
    }
    if index[0] != 0 {
        return Err(Error::IndexIndicator);
    }
    let body = &index[..index.len() - 4];
    if crc32::checksum_le_bytes(body) != index[index.len() - 4..] {
        return Err(Error::IndexCrc32);
    }

    let (size, nb_records) = mbi::decode(&index[1..])?;
    let mut rest = &index[1 + size..index.len() - 4];

    let mut records = Vec::with_capacity(nb_records as usize);
    for _ in 0..nb_records {
        if rest.is_empty() {
            return Err(Error::IndexSize);
        }
        let (size, unpadded_size) = mbi::decode(rest)?;
        if unpadded_size == 0 {
            return Err(Error::IndexRecordUnpaddedSize);
        }
        rest = &rest[size..];

        if rest.is_empty() {
            return Err(Error::IndexSize);
        }
        let (size, uncompressed_size) = mbi::decode(rest)?;
        if uncompressed_size == 0 {
            return Err(Error::IndexRecordUncompressedSize);
        }
        rest = &rest[size..];

        records.push((unpadded_size, uncompressed_size));
    }

    if rest.iter().any(|&b| b != 0) {
        return Err(Error::IndexPadding);
    }
    Ok(records)
}

/// Parse a 12-byte XZ stream footer, returning `(check_kind,
/// backward_size_bytes)` where `backward_size_bytes` is the byte length of
/// the preceding index.
pub fn parse_footer(footer: &[u8]) -> Result<(u8, u64)> {
    if footer.len() != FOOTER_SIZE {
        return Err(Error::FooterLength);
    }
    if footer[10..12] != FOOTER_MAGIC {
        return Err(Error::FooterMagic);
    }
    let body = &footer[4..10];
    if crc32::checksum_le_bytes(body) != footer[0..4] {
        return Err(Error::FooterCrc32);
    }
    let backward_size = u32::from_le_bytes([body[0], body[1], body[2], body[3]]);
    let (flag_first_byte, check_kind) = (body[4], body[5]);
    let backward_size_bytes = (u64::from(backward_size) + 1) * 4;
    if flag_first_byte != 0 || check_kind > 0x0F {
        return Err(Error::FooterFlags);
    }
    Ok((check_kind, backward_size_bytes))
}
