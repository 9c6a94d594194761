//! Uniform seekable, length-bounded byte region (spec §4.2).
//!
//! Grounded on `xz.io.IOAbstract` and its three concrete subclasses
//! (`IOStatic`, `IOProxy`, `IOCombiner`). The original expresses this as a
//! class hierarchy with template-method overrides (`_read`, `_write_after`,
//! `_make_tail`); here it is a trait plus one struct per variant, matching
//! spec §9's guidance to prefer a sum-of-variants shape over inheritance.

mod combiner;
mod file_region;
mod proxy;
mod static_region;

pub use combiner::Combiner;
pub use file_region::FileRegion;
pub use proxy::ProxyRegion;
pub use static_region::StaticRegion;

use crate::error::{Error, Result};

/// Reference point for [`Region::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}

/// A length-bounded byte-addressable view with cursor semantics.
///
/// Reads never return more than `len() - position()` bytes. Writes are
/// permitted only when `position() >= len()`; a gap between the two is
/// zero-filled first. `truncate` zero-extends on growth.
pub trait Region {
    /// Current end of the region, in bytes.
    fn len(&self) -> u64;

    /// Whether the region currently has zero length.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current cursor position.
    fn position(&self) -> u64;

    /// Move the cursor. Resulting negative positions fail
    /// [`Error::InvalidSeek`]; positions past `len()` are allowed.
    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64>;

    /// Read up to `buf.len()` bytes, returning the number read. May return
    /// fewer than requested even before the end of the region.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Read exactly `buf.len()` bytes unless the region runs out first, in
    /// which case the short read fills a prefix of `buf` and the returned
    /// count reflects it.
    fn read_exact_or_to_end(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    /// Append `data` at the current cursor. Fails [`Error::WriteInMiddle`]
    /// if the cursor is before `len()`.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Set `len()` to `size`, zero-extending if it grows. The cursor is
    /// left unchanged.
    fn truncate(&mut self, size: u64) -> Result<()>;

    fn readable(&self) -> bool;
    fn writable(&self) -> bool;
    fn seekable(&self) -> bool {
        true
    }

    /// OS file descriptor backing this region, if any.
    fn fileno(&self) -> Result<std::os::fd::RawFd> {
        Err(Error::Unsupported)
    }

    /// Idempotent close; runs any pending write-finalization on first call.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Region for Box<dyn Region> {
    fn len(&self) -> u64 {
        (**self).len()
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        (**self).seek(offset, whence)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write(data)
    }

    fn truncate(&mut self, size: u64) -> Result<()> {
        (**self).truncate(size)
    }

    fn readable(&self) -> bool {
        (**self).readable()
    }

    fn writable(&self) -> bool {
        (**self).writable()
    }

    fn fileno(&self) -> Result<std::os::fd::RawFd> {
        (**self).fileno()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// Translate a `seek` request into an absolute position, given the
/// region's current `cursor` and `len`.
pub(crate) fn resolve_seek(cursor: u64, len: u64, offset: i64, whence: Whence) -> Result<u64> {
    let base: i64 = match whence {
        Whence::Start => 0,
        Whence::Current => i64::try_from(cursor).map_err(|_| Error::InvalidSeek)?,
        Whence::End => i64::try_from(len).map_err(|_| Error::InvalidSeek)?,
    };
    let resolved = base.checked_add(offset).ok_or(Error::InvalidSeek)?;
    if resolved < 0 {
        return Err(Error::InvalidSeek);
    }
    Ok(resolved as u64)
}
