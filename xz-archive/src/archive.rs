//! The public, file-like entry point: a seekable sequence of streams
//! (spec §4.7, §6.2), grounded on `xz.file.XZFile`.

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::path::Path;
use std::rc::Rc;

use lzma_safe::encoder::options::filter::FilterConfig;
use lzma_safe::encoder::options::present::Compression;

use crate::error::{Error, Result};
use crate::floor_map::FloorMap;
use crate::mode::{self, OpenMode};
use crate::options::ArchiveOptions;
use crate::region::{resolve_seek, FileRegion, Region, Whence};
use crate::stream::Stream;

/// `preset`/`filters` live locally until a stream exists, then delegate to
/// the last one (spec §9, §4.7); grounded on `xz.utils.AttrProxy`.
#[derive(Debug, Clone, Default)]
struct ProxyProperty<T> {
    local: Option<T>,
}

impl<T: Clone> ProxyProperty<T> {
    fn get(&self, delegate: Option<T>) -> Option<T> {
        delegate.or_else(|| self.local.clone())
    }
}

/// The outcome of [`Archive::close`]. Closing an archive that was opened
/// for writing but never received any data is not an error (spec §4.7,
/// §7); it is distinguished here rather than logged, since a library has
/// no business writing to stdout/stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// At least one byte of content was ever written.
    Closed,
    /// The archive was opened writable and closed without ever writing
    /// anything; the target was left empty rather than holding a partial
    /// XZ stream.
    EmptyArchive,
}

/// A seekable, random-access XZ container: an ordered run of streams, each
/// an ordered run of blocks.
pub struct Archive {
    file: Rc<RefCell<dyn Region>>,
    mode: OpenMode,
    check: u8,
    preset: ProxyProperty<Compression>,
    filters: ProxyProperty<Vec<FilterConfig>>,
    cache_strategy_factory: Box<dyn Fn() -> Box<dyn crate::block::cache::BlockCacheStrategy>>,
    streams: FloorMap<Stream>,
    cursor: u64,
    wrote_anything: bool,
    close_outcome: Option<CloseOutcome>,
}

impl Archive {
    /// Open `path` under `mode` (spec §4.7's mode-string table).
    pub fn open<P: AsRef<Path>>(path: P, mode: &str, options: ArchiveOptions) -> Result<Self> {
        let parsed = mode::parse(mode)?;
        let path = path.as_ref();
        if parsed.must_not_exist && path.exists() {
            return Err(Error::AlreadyExists);
        }
        let file = OpenOptions::new()
            .read(true)
            .write(parsed.writable)
            .create(parsed.writable)
            .truncate(false)
            .open(path)?;
        let region: Rc<RefCell<dyn Region>> =
            Rc::new(RefCell::new(FileRegion::new(file, true, true)));
        Self::open_region(region, parsed, options)
    }

    /// Open an already-open seekable file handle under `mode`.
    pub fn open_file(file: std::fs::File, mode: &str, options: ArchiveOptions) -> Result<Self> {
        let parsed = mode::parse(mode)?;
        let region: Rc<RefCell<dyn Region>> =
            Rc::new(RefCell::new(FileRegion::new(file, true, true)));
        Self::open_region(region, parsed, options)
    }

    fn open_region(file: Rc<RefCell<dyn Region>>, parsed: OpenMode, options: ArchiveOptions) -> Result<Self> {
        if parsed.truncate {
            file.borrow_mut().truncate(0)?;
        }

        let ArchiveOptions {
            check,
            preset,
            filters,
            block_cache_strategy,
        } = options;

        let mut archive = Self {
            file,
            mode: parsed,
            check,
            preset: ProxyProperty {
                local: preset,
            },
            filters: ProxyProperty {
                local: filters,
            },
            cache_strategy_factory: block_cache_strategy,
            streams: FloorMap::new(),
            cursor: 0,
            wrote_anything: false,
            close_outcome: None,
        };

        if !parsed.truncate {
            archive.parse_existing_streams()?;
        }
        if parsed.readable && !parsed.writable && archive.streams.is_empty() {
            return Err(Error::FileNoStreams);
        }
        Ok(archive)
    }

    /// Scan streams backward from EOF (spec §4.7), skipping zero-padding,
    /// and install them keyed by cumulative content offset.
    fn parse_existing_streams(&mut self) -> Result<()> {
        let mut cursor = self.file.borrow().len();
        let mut parsed = Vec::new();

        while cursor > 0 {
            if cursor % 4 != 0 {
                return Err(Error::FileInvalidSize);
            }
            self.file
                .borrow_mut()
                .seek(i64::try_from(cursor).map_err(|_| Error::InvalidSeek)?, Whence::Start)?;
            self.file.borrow_mut().seek(-4, Whence::Current)?;
            let mut word = [0_u8; 4];
            self.file.borrow_mut().read_exact_or_to_end(&mut word)?;
            if word == [0_u8; 4] {
                cursor -= 4;
                continue;
            }
            let cache_strategy = (self.cache_strategy_factory)();
            let (stream, header_start) = Stream::parse(&self.file, cursor, cache_strategy)?;
            parsed.push(stream);
            cursor = header_start;
        }

        parsed.reverse();
        let mut content_offset = 0_u64;
        for stream in parsed {
            let len = stream.len();
            self.streams.insert(content_offset, stream);
            content_offset += len;
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.close_outcome.is_some() {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    pub fn readable(&self) -> bool {
        self.mode.readable
    }

    pub fn writable(&self) -> bool {
        self.mode.writable
    }

    pub fn seekable(&self) -> bool {
        true
    }

    pub fn fileno(&self) -> Result<std::os::fd::RawFd> {
        self.file.borrow().fileno()
    }

    /// Total uncompressed content length across every stream.
    pub fn len(&self) -> u64 {
        match self.streams.last_key() {
            Some(key) => key + self.streams.last_value().map(Stream::len).unwrap_or(0),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tell(&self) -> u64 {
        self.cursor
    }

    pub fn check(&self) -> u8 {
        self.check
    }

    /// Archive-local; consulted only when a new stream is created.
    pub fn set_check(&mut self, check: u8) {
        self.check = check;
    }

    pub fn preset(&self) -> Option<Compression> {
        self.preset.get(self.streams.last_value().and_then(Stream::preset))
    }

    pub fn set_preset(&mut self, preset: Compression) {
        match self.streams.last_value_mut() {
            Some(s) => s.set_preset(Some(preset)),
            None => self.preset.local = Some(preset),
        }
    }

    pub fn filters(&self) -> Option<Vec<FilterConfig>> {
        self.filters
            .get(self.streams.last_value().and_then(|s| s.filters().map(|f| f.to_vec())))
    }

    pub fn set_filters(&mut self, filters: Vec<FilterConfig>) {
        if let Some(s) = self.streams.last_value_mut() {
            s.set_filters(Some(filters));
        } else {
            self.filters.local = Some(filters);
        }
    }

    /// Offsets, in file content order, at which each stream begins.
    pub fn stream_boundaries(&self) -> Vec<u64> {
        self.streams.iter().map(|(k, _)| k).collect()
    }

    /// Offsets of every block across every stream, flattened in order.
    pub fn block_boundaries(&self) -> Vec<u64> {
        self.streams
            .iter()
            .flat_map(|(stream_start, stream)| {
                stream
                    .block_boundaries()
                    .into_iter()
                    .map(move |block_start| stream_start + block_start)
            })
            .collect()
    }

    pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.ensure_open()?;
        self.cursor = resolve_seek(self.cursor, self.len(), offset, whence)?;
        Ok(self.cursor)
    }

    fn read_at(&mut self, p: u64, buf: &mut [u8]) -> Result<usize> {
        if p >= self.len() {
            return Ok(0);
        }
        let Some((start, stream)) = self.streams.floor_mut(p) else {
            return Ok(0);
        };
        stream.read_at(p - start, buf)
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        if !self.mode.readable {
            return Err(Error::NotReadable);
        }
        let n = self.read_at(self.cursor, buf)?;
        self.cursor += n as u64;
        Ok(n)
    }

    /// Read every remaining byte from the current cursor.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let remaining = self.len().saturating_sub(self.cursor);
        let mut out = vec![0_u8; remaining as usize];
        let n = self.read(&mut out)?;
        out.truncate(n);
        Ok(out)
    }

    fn create_new_stream(&mut self) -> Result<()> {
        let start = self.file.borrow().len();
        let content_key = self.len();
        let preset = self.preset();
        let filters = self.filters();
        let cache_strategy = (self.cache_strategy_factory)();
        let stream = Stream::new_empty(&self.file, start, self.check, preset, filters, cache_strategy);
        self.streams.insert(content_key, stream);
        Ok(())
    }

    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.ensure_open()?;
        if !self.mode.writable {
            return Err(Error::NotWritable);
        }
        if self.streams.is_empty() {
            self.create_new_stream()?;
        }
        let written = self
            .streams
            .last_value_mut()
            .expect("just ensured")
            .write(data)?;
        if written > 0 {
            self.wrote_anything = true;
        }
        self.cursor += written as u64;
        Ok(written)
    }

    /// Force a new stream iff the current one is non-empty.
    pub fn change_stream(&mut self) -> Result<()> {
        self.ensure_open()?;
        match self.streams.last_value_mut() {
            None => Ok(()),
            Some(s) if s.is_empty() => Ok(()),
            Some(s) => {
                s.finalize_write()?;
                self.drop_last_stream_if_empty();
                self.create_new_stream()
            }
        }
    }

    /// Remove the last stream entry if `finalize_write()` left it holding no
    /// blocks, so no phantom empty stream lingers in `self.streams` (mirrors
    /// `Stream::finalize_write`'s own discard of a trailing empty block).
    fn drop_last_stream_if_empty(&mut self) {
        let is_empty = self.streams.last_value().map(Stream::is_empty).unwrap_or(false);
        if is_empty {
            if let Some(key) = self.streams.last_key() {
                self.streams.remove(key);
            }
        }
    }

    /// Force a new block in the current stream iff its current block is
    /// non-empty; a no-op if there is no current stream.
    pub fn change_block(&mut self) -> Result<()> {
        self.ensure_open()?;
        if let Some(s) = self.streams.last_value_mut() {
            s.change_block()?;
        }
        Ok(())
    }

    /// Grow the archive's content length to `size` with zero bytes. The
    /// cursor is left unchanged. Shrinking is not supported: a previously
    /// committed block's compressed payload cannot be un-written without
    /// re-encoding it, which this system never does implicitly.
    pub fn truncate(&mut self, size: u64) -> Result<()> {
        self.ensure_open()?;
        if !self.mode.writable {
            return Err(Error::NotWritable);
        }
        let current = self.len();
        if size < current {
            return Err(Error::Unsupported);
        }
        if size > current {
            let zeros = vec![0_u8; (size - current) as usize];
            self.write(&zeros)?;
        }
        Ok(())
    }

    /// Flush any pending write and release resources. Idempotent: repeated
    /// calls return the outcome of the first, real close.
    pub fn close(&mut self) -> Result<CloseOutcome> {
        if let Some(outcome) = self.close_outcome {
            return Ok(outcome);
        }
        if self.mode.writable {
            if let Some(s) = self.streams.last_value_mut() {
                s.finalize_write()?;
            }
            self.drop_last_stream_if_empty();
        }
        self.file.borrow_mut().close()?;
        let outcome = if self.mode.writable && !self.wrote_anything {
            CloseOutcome::EmptyArchive
        } else {
            CloseOutcome::Closed
        };
        self.close_outcome = Some(outcome);
        Ok(outcome)
    }
}

impl Drop for Archive {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
