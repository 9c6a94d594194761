//! A region backed directly by an OS file handle.
//!
//! The Python original opens files through the builtin `open()` and relies
//! on its buffered-IO semantics; here the same role is played by a shared
//! [`std::fs::File`], explicitly seeked before every operation since many
//! proxies address the same handle and may have left its cursor elsewhere.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use super::{resolve_seek, Region, Whence};
use crate::error::Result;

pub struct FileRegion {
    file: File,
    cursor: u64,
    readable: bool,
    writable: bool,
}

impl FileRegion {
    pub fn new(file: File, readable: bool, writable: bool) -> Self {
        Self {
            file,
            cursor: 0,
            readable,
            writable,
        }
    }
}

impl Region for FileRegion {
    fn len(&self) -> u64 {
        self.file.metadata().map(|m| m.len()).unwrap_or(0)
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let target = resolve_seek(self.cursor, self.len(), offset, whence)?;
        self.file.seek(SeekFrom::Start(target))?;
        self.cursor = target;
        Ok(self.cursor)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.file.read(buf)?;
        self.cursor += n as u64;
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let n = self.file.write(data)?;
        self.cursor += n as u64;
        Ok(n)
    }

    fn truncate(&mut self, size: u64) -> Result<()> {
        self.file.set_len(size)?;
        Ok(())
    }

    fn readable(&self) -> bool {
        self.readable
    }

    fn writable(&self) -> bool {
        self.writable
    }

    #[cfg(unix)]
    fn fileno(&self) -> Result<std::os::fd::RawFd> {
        use std::os::fd::AsRawFd;
        Ok(self.file.as_raw_fd())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
