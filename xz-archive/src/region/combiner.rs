//! Ordered concatenation of child regions, routed by cumulative offset
//! (`xz.io.IOCombiner`).
//!
//! The block engine's synthesized single-block stream (spec §4.4, step 2)
//! is the one place this crate instantiates `Combiner` directly: a
//! read-only `Static ‖ Proxy ‖ Static` view fed to the LZMA decoder. The
//! higher-level `Stream`/`Archive` aggregates route reads and writes the
//! same way but keep their own domain types rather than storing `Block`s
//! and `Stream`s behind this generic (see `DESIGN.md`).

use super::{resolve_seek, Region, Whence};
use crate::error::{Error, Result};
use crate::floor_map::FloorMap;

/// Creates the next child region to append when a write needs a fresh
/// tail (`xz.io.IOCombiner._make_tail`).
pub type MakeTail<C> = Box<dyn FnMut() -> Result<C>>;

pub struct Combiner<C: Region> {
    children: FloorMap<C>,
    length: u64,
    cursor: u64,
    make_tail: MakeTail<C>,
}

impl<C: Region> Combiner<C> {
    pub fn new(make_tail: MakeTail<C>) -> Self {
        Self {
            children: FloorMap::new(),
            length: 0,
            cursor: 0,
            make_tail,
        }
    }

    /// Append `child` as the new tail, starting at the current length.
    pub fn append(&mut self, child: C) {
        let start = self.length;
        self.length += child.len();
        self.children.insert(start, child);
    }

    /// Children in offset order, paired with their starting offset.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &C)> {
        self.children.iter()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn last_child(&self) -> Option<(u64, &C)> {
        self.children.last_key().map(|k| (k, self.children.last_value().expect("key present")))
    }

    fn append_bytes(&mut self, data: &[u8]) -> Result<usize> {
        let needs_new_tail = match self.children.last_value() {
            None => true,
            Some(child) => !child.writable(),
        };
        if needs_new_tail {
            let start = self.length;
            let child = (self.make_tail)()?;
            self.children.insert(start, child);
        }
        let child = self
            .children
            .last_value_mut()
            .expect("tail was just inserted");
        child.seek(0, Whence::End)?;
        let n = child.write(data)?;
        self.length += n as u64;
        self.cursor = self.length;
        Ok(n)
    }

    /// Drop the trailing child if it is empty, as required on close so no
    /// empty block/stream is ever persisted.
    pub fn drop_empty_tail(&mut self) -> Result<()> {
        if let Some(start) = self.children.last_key() {
            let is_empty = self
                .children
                .last_value()
                .map(|c| c.len() == 0)
                .unwrap_or(false);
            if is_empty {
                if let Some(mut child) = self.children.remove(start) {
                    child.close()?;
                }
                self.length = start;
            }
        }
        Ok(())
    }
}

impl<C: Region> Region for Combiner<C> {
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
        let (start, child) = match self.children.floor_mut(self.cursor) {
            Some(x) => x,
            None => return Ok(0),
        };
        let local = self.cursor - start;
        child.seek(i64::try_from(local).map_err(|_| Error::InvalidSeek)?, Whence::Start)?;
        let available = (self.length - self.cursor) as usize;
        let want = buf.len().min(available);
        let n = child.read(&mut buf[..want])?;
        self.cursor += n as u64;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.cursor < self.length {
            return Err(Error::WriteInMiddle);
        }
        if self.cursor > self.length {
            let gap = vec![0_u8; (self.cursor - self.length) as usize];
            self.append_bytes(&gap)?;
        }
        self.append_bytes(data)
    }

    fn truncate(&mut self, size: u64) -> Result<()> {
        if size >= self.length {
            let gap = size - self.length;
            if gap > 0 {
                let saved_cursor = self.cursor;
                self.cursor = self.length;
                self.append_bytes(&vec![0_u8; gap as usize])?;
                self.cursor = saved_cursor;
            }
            return Ok(());
        }

        match self.children.floor_mut(size) {
            Some((start, child)) => {
                child.truncate(size - start)?;
                self.children.split_off_from(start + 1);
            }
            None => self.children.split_off_from(0),
        }
        self.length = size;
        Ok(())
    }

    fn readable(&self) -> bool {
        true
    }

    fn writable(&self) -> bool {
        true
    }

    fn close(&mut self) -> Result<()> {
        self.drop_empty_tail()
    }
}

#[cfg(test)]
mod tests;
