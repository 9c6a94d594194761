//! A `[start, end)` window over a parent region (`xz.io.IOProxy`).
//!
//! Several proxies commonly share the same parent (every block in a stream
//! proxies the same underlying file), so the parent is reference-counted
//! and every operation explicitly seeks it first — there is no assumption
//! that the parent's cursor is where this proxy left it.

use std::cell::RefCell;
use std::rc::Rc;

use super::{resolve_seek, Region, Whence};
use crate::error::Result;

#[derive(Clone)]
pub struct ProxyRegion {
    parent: Rc<RefCell<dyn Region>>,
    start: u64,
    length: u64,
    cursor: u64,
}

impl ProxyRegion {
    /// A window `[start, start + length)` over `parent`.
    pub fn new(parent: Rc<RefCell<dyn Region>>, start: u64, length: u64) -> Self {
        Self {
            parent,
            start,
            length,
            cursor: 0,
        }
    }

    fn seek_parent_to(&self, local_pos: u64) -> Result<()> {
        let absolute = i64::try_from(self.start + local_pos).map_err(|_| crate::error::Error::InvalidSeek)?;
        self.parent.borrow_mut().seek(absolute, Whence::Start)?;
        Ok(())
    }
}

impl Region for ProxyRegion {
    fn len(&self) -> u64 {
        self.length
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.cursor = resolve_seek(self.cursor, self.length, offset, whence)?;
        Ok(self.cursor)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.cursor >= self.length {
            return Ok(0);
        }
        let available = (self.length - self.cursor) as usize;
        let want = buf.len().min(available);
        self.seek_parent_to(self.cursor)?;
        let n = self.parent.borrow_mut().read(&mut buf[..want])?;
        self.cursor += n as u64;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.cursor < self.length {
            return Err(crate::error::Error::WriteInMiddle);
        }
        if self.cursor > self.length {
            let gap = vec![0_u8; (self.cursor - self.length) as usize];
            self.seek_parent_to(self.length)?;
            self.parent.borrow_mut().write(&gap)?;
            self.length = self.cursor;
        }
        self.seek_parent_to(self.length)?;
        let n = self.parent.borrow_mut().write(data)?;
        self.length += n as u64;
        self.cursor = self.length;
        Ok(n)
    }

    fn truncate(&mut self, size: u64) -> Result<()> {
        self.parent.borrow_mut().truncate(self.start + size)?;
        self.length = size;
        Ok(())
    }

    fn readable(&self) -> bool {
        self.parent.borrow().readable()
    }

    fn writable(&self) -> bool {
        self.parent.borrow().writable()
    }

    fn fileno(&self) -> Result<std::os::fd::RawFd> {
        self.parent.borrow().fileno()
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
