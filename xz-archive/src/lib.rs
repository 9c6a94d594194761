//! # xz-archive
//!
//! Seekable, random-access reading and append-only writing of the XZ
//! container format: multiple streams, each a run of independently
//! decodable blocks, addressable by uncompressed content offset.
//!
//! Unlike a streaming XZ decoder, this crate indexes a whole archive up
//! front and lets callers `seek`/`read`/`write` into it like a regular
//! file, fetching and caching only the blocks a given read touches.
//!
//! ## Quick start
//!
//! ```no_run
//! use xz_archive::{Archive, ArchiveOptions};
//!
//! # fn main() -> xz_archive::Result<()> {
//! let mut archive = Archive::open("data.xz", "w+", ArchiveOptions::default())?;
//! archive.write(b"hello, archive")?;
//! archive.seek(0, xz_archive::Whence::Start)?;
//! let content = archive.read_to_end()?;
//! assert_eq!(content, b"hello, archive");
//! archive.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`framing`]: stream header/index/footer byte layout (no compression).
//! - [`region`]: the `Region` trait and its `Static`/`Proxy`/`Combiner`
//!   implementors, the uniform seekable byte view everything else builds on.
//! - [`block`]: a single block's random-access decompressor and
//!   block-at-a-time compressor, plus its read-cache strategies.
//! - [`stream`] / [`archive`]: the header+blocks+index+footer grouping and
//!   the public file-like entry point, respectively.

mod block;
mod check;
mod crc32;
mod floor_map;
mod framing;
mod mbi;
mod mode;
mod options;
mod region;

pub mod archive;
pub mod stream;

mod error;

pub use archive::{Archive, CloseOutcome};
pub use block::cache::{BlockCacheStrategy, BlockId, KeepStrategy, RollingStrategy};
pub use check::{CHECK_CRC32, CHECK_CRC64, CHECK_NONE, CHECK_SHA256, DEFAULT_CHECK};
pub use error::{BackendError, Error, Result};
pub use mode::OpenMode;
pub use options::ArchiveOptions;
pub use region::Whence;
pub use stream::Stream;

pub use lzma_safe::encoder::options::filter::FilterConfig;
pub use lzma_safe::encoder::options::present::Compression;
