//! Fixed, read-only, in-memory region (`xz.io.IOStatic`).

use super::{resolve_seek, Region, Whence};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct StaticRegion {
    data: Vec<u8>,
    cursor: u64,
}

impl StaticRegion {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, cursor: 0 }
    }
}

impl Region for StaticRegion {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.cursor = resolve_seek(self.cursor, self.len(), offset, whence)?;
        Ok(self.cursor)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let len = self.len();
        if self.cursor >= len {
            return Ok(0);
        }
        let available = (len - self.cursor) as usize;
        let n = buf.len().min(available);
        let start = self.cursor as usize;
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.cursor += n as u64;
        Ok(n)
    }

    fn write(&mut self, _data: &[u8]) -> Result<usize> {
        Err(Error::NotWritable)
    }

    fn truncate(&mut self, _size: u64) -> Result<()> {
        Err(Error::NotWritable)
    }

    fn readable(&self) -> bool {
        true
    }

    fn writable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests;
