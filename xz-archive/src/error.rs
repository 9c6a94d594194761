//! Error types and result handling for XZ archive operations.

use thiserror::Error;

pub use lzma_safe::Error as BackendError;

/// Result alias using the crate-level [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Domain error taxonomy for the XZ container parser, region abstraction and
/// block engine (spec §6.3).
#[derive(Debug, Error)]
pub enum Error {
    /// A multibyte integer ended before its terminating (high-bit-clear) byte.
    #[error("invalid mbi")]
    InvalidMbi,

    /// Stream header is not exactly 12 bytes.
    #[error("header length")]
    HeaderLength,

    /// Stream header does not start with the XZ magic.
    #[error("header magic")]
    HeaderMagic,

    /// Stream header's CRC32 does not match its flags.
    #[error("header crc32")]
    HeaderCrc32,

    /// Stream header's first flag byte is non-zero, or the check kind is out of range.
    #[error("header flags")]
    HeaderFlags,

    /// Index is shorter than 8 bytes, or not a multiple of 4.
    #[error("index length")]
    IndexLength,

    /// Index's leading indicator byte is non-zero.
    #[error("index indicator")]
    IndexIndicator,

    /// Index's trailing CRC32 does not match its body.
    #[error("index crc32")]
    IndexCrc32,

    /// Index ended before the declared number of records was read.
    #[error("index size")]
    IndexSize,

    /// A record's `unpadded_size` field decoded to zero.
    #[error("index record unpadded size")]
    IndexRecordUnpaddedSize,

    /// A record's `uncompressed_size` field decoded to zero.
    #[error("index record uncompressed size")]
    IndexRecordUncompressedSize,

    /// Bytes after the records, before the CRC, were not all zero.
    #[error("index padding")]
    IndexPadding,

    /// Stream footer is not exactly 12 bytes.
    #[error("footer length")]
    FooterLength,

    /// Stream footer does not end with the XZ footer magic.
    #[error("footer magic")]
    FooterMagic,

    /// Stream footer's CRC32 does not match its body.
    #[error("footer crc32")]
    FooterCrc32,

    /// Stream footer's flag byte is non-zero, or the check kind is out of range.
    #[error("footer flags")]
    FooterFlags,

    /// Check kind passed to index/footer emission was not in `0..=0x0F`.
    #[error("footer check")]
    FooterCheck,

    /// A stream's header and footer disagree on the integrity check kind.
    #[error("stream: inconsistent check value")]
    StreamCheckMismatch,

    /// The archive file's size is not a multiple of 4 while scanning backward.
    #[error("file: invalid size")]
    FileInvalidSize,

    /// A read-only open found no streams in the file.
    #[error("file: no streams")]
    FileNoStreams,

    /// The block's synthetic compressed stream ran out of bytes mid-decompression.
    #[error("block: data eof")]
    BlockDataEof,

    /// `read` was called on a block decompressor that already reported EOF.
    #[error("block: decompressor eof")]
    BlockDecompressorEof,

    /// Flushing a fresh block compressor with empty input did not emit an XZ header.
    #[error("block: compressor did not emit a stream header")]
    BlockCompressorHeader,

    /// The block compressor's own footer disagreed with the stream's check kind.
    #[error("block: compressor footer check mismatch")]
    BlockCompressorFooterCheck,

    /// The block compressor's own index did not contain exactly one record.
    #[error("block: compressor index must contain exactly one record")]
    BlockCompressorIndexRecords,

    /// The block compressor's own index disagreed with the number of bytes written.
    #[error("block: compressor uncompressed size mismatch")]
    BlockCompressorUncompressedSize,

    /// Corrupted block payload: the codec produced bytes past `uncompressed_size`.
    #[error("block: produced more data than declared by the block size")]
    BlockOverrun,

    /// A write was attempted somewhere other than the end of a region.
    #[error("unsupported operation: write in the middle of a region")]
    WriteInMiddle,

    /// An operation requiring write access was attempted on a non-writable region.
    #[error("unsupported operation: not writable")]
    NotWritable,

    /// An operation requiring read access was attempted on a non-readable region.
    #[error("unsupported operation: not readable")]
    NotReadable,

    /// A request outside what this implementation supports: `fileno()` on a
    /// region with no underlying OS descriptor, an out-of-range check kind,
    /// or shrinking an archive/region below its current length.
    #[error("unsupported operation")]
    Unsupported,

    /// `seek` produced a negative absolute position.
    #[error("invalid seek position")]
    InvalidSeek,

    /// `seek`'s `whence` argument was not one of SET/CUR/END.
    #[error("unsupported whence value")]
    InvalidWhence,

    /// An open-mode string was malformed (repeated or unknown letters).
    #[error("invalid mode: {0}")]
    InvalidMode(String),

    /// `x`/`x+` mode was requested but the target already has content.
    #[error("file already exists")]
    AlreadyExists,

    /// An operation was attempted on an archive/stream/block after it was closed.
    #[error("I/O operation on closed region")]
    Closed,

    /// Failure returned by the underlying liblzma codec, wrapped with context
    /// so callers can tell framing corruption (caught by this crate) apart
    /// from payload corruption (caught by the codec).
    #[error("block: error while decompressing: {0}")]
    Codec(#[source] BackendError),

    /// I/O failure on the underlying seekable file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        Error::Codec(err)
    }
}
