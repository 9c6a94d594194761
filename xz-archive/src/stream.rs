//! A self-delimiting group of blocks: one header, one index, one footer
//! (spec §4.6), grounded on `xz.stream.XZStream`.

use std::cell::RefCell;
use std::rc::Rc;

use lzma_safe::encoder::options::filter::FilterConfig;
use lzma_safe::encoder::options::present::Compression;

use crate::block::cache::{BlockCacheStrategy, BlockId};
use crate::block::Block;
use crate::error::{Error, Result};
use crate::floor_map::FloorMap;
use crate::framing;
use crate::region::{ProxyRegion, Region, Whence};

/// One XZ stream: a header, an ordered run of blocks, and an index+footer.
pub struct Stream {
    region: Rc<RefCell<dyn Region>>,
    check_kind: u8,
    preset: Option<Compression>,
    filters: Option<Vec<FilterConfig>>,
    blocks: FloorMap<Rc<RefCell<Block>>>,
    cache_strategy: Box<dyn BlockCacheStrategy>,
}

impl Stream {
    /// Parse a stream backward from `file`, whose cursor is positioned at
    /// the candidate stream's footer end. Returns the stream plus the
    /// absolute offset of its header, so the caller can keep scanning.
    pub fn parse(
        file: &Rc<RefCell<dyn Region>>,
        footer_end: u64,
        cache_strategy: Box<dyn BlockCacheStrategy>,
    ) -> Result<(Self, u64)> {
        file.borrow_mut()
            .seek(i64::try_from(footer_end).map_err(|_| Error::InvalidSeek)?, Whence::Start)?;

        file.borrow_mut().seek(-12, Whence::Current)?;
        let mut footer_buf = [0_u8; framing::FOOTER_SIZE];
        file.borrow_mut().read_exact_or_to_end(&mut footer_buf)?;
        let (footer_check, backward_size_bytes) = framing::parse_footer(&footer_buf)?;

        let rewind = i64::try_from(12 + backward_size_bytes).map_err(|_| Error::InvalidSeek)?;
        file.borrow_mut().seek(-rewind, Whence::Current)?;
        let index_start = file.borrow().position();
        let mut index_buf = vec![0_u8; backward_size_bytes as usize];
        file.borrow_mut().read_exact_or_to_end(&mut index_buf)?;
        let records = framing::parse_index(&index_buf)?;

        let blocks_len: u64 = records.iter().map(|&(unpadded, _)| framing::round_up4(unpadded)).sum();
        let block_start = index_start
            .checked_sub(blocks_len)
            .ok_or(Error::FileInvalidSize)?;

        let mut blocks = FloorMap::new();
        let mut running = block_start;
        let mut content_offset = 0_u64;
        for &(unpadded_size, uncompressed_size) in &records {
            let span = framing::round_up4(unpadded_size);
            let block_region: Rc<RefCell<dyn Region>> =
                Rc::new(RefCell::new(ProxyRegion::new(Rc::clone(file), running, span)));
            let block = Block::from_parsed(block_region, footer_check, unpadded_size, uncompressed_size)?;
            blocks.insert(content_offset, Rc::new(RefCell::new(block)));
            running += span;
            content_offset += uncompressed_size;
        }

        let header_start = block_start
            .checked_sub(framing::HEADER_SIZE as u64)
            .ok_or(Error::FileInvalidSize)?;
        file.borrow_mut()
            .seek(i64::try_from(header_start).map_err(|_| Error::InvalidSeek)?, Whence::Start)?;
        let mut header_buf = [0_u8; framing::HEADER_SIZE];
        file.borrow_mut().read_exact_or_to_end(&mut header_buf)?;
        let header_check = framing::parse_header(&header_buf)?;
        if header_check != footer_check {
            return Err(Error::StreamCheckMismatch);
        }

        file.borrow_mut()
            .seek(i64::try_from(header_start).map_err(|_| Error::InvalidSeek)?, Whence::Start)?;

        let region: Rc<RefCell<dyn Region>> = Rc::new(RefCell::new(ProxyRegion::new(
            Rc::clone(file),
            header_start,
            footer_end - header_start,
        )));

        Ok((
            Self {
                region,
                check_kind: footer_check,
                preset: None,
                filters: None,
                blocks,
                cache_strategy,
            },
            header_start,
        ))
    }

    /// A fresh, empty, writable stream over a zero-length window starting
    /// at `start` in `file`.
    pub fn new_empty(
        file: &Rc<RefCell<dyn Region>>,
        start: u64,
        check_kind: u8,
        preset: Option<Compression>,
        filters: Option<Vec<FilterConfig>>,
        cache_strategy: Box<dyn BlockCacheStrategy>,
    ) -> Self {
        Self {
            region: Rc::new(RefCell::new(ProxyRegion::new(Rc::clone(file), start, 0))),
            check_kind,
            preset,
            filters,
            blocks: FloorMap::new(),
            cache_strategy,
        }
    }

    pub fn check_kind(&self) -> u8 {
        self.check_kind
    }

    pub fn preset(&self) -> Option<Compression> {
        self.preset
    }

    pub fn set_preset(&mut self, preset: Option<Compression>) {
        self.preset = preset;
    }

    pub fn filters(&self) -> Option<&[FilterConfig]> {
        self.filters.as_deref()
    }

    pub fn set_filters(&mut self, filters: Option<Vec<FilterConfig>>) {
        self.filters = filters;
    }

    /// Content length: sum of every block's uncompressed size.
    pub fn len(&self) -> u64 {
        match self.blocks.last_key() {
            Some(key) => key + self.blocks.last_value().map(|b| b.borrow().len()).unwrap_or(0),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// On-disk length of this stream's region so far.
    pub fn region_len(&self) -> u64 {
        self.region.borrow().len()
    }

    /// Offsets, relative to this stream's start, at which each block begins.
    pub fn block_boundaries(&self) -> Vec<u64> {
        self.blocks.iter().map(|(k, _)| k).collect()
    }

    fn blocks_end_pos(&self) -> u64 {
        framing::HEADER_SIZE as u64
            + self
                .blocks
                .iter()
                .map(|(_, b)| framing::round_up4(b.borrow().unpadded_size()))
                .sum::<u64>()
    }

    fn make_tail_block(&mut self) -> Result<Rc<RefCell<Block>>> {
        let blocks_end = self.blocks_end_pos();
        self.region.borrow_mut().truncate(blocks_end)?;
        let block_region: Rc<RefCell<dyn Region>> = Rc::new(RefCell::new(ProxyRegion::new(
            Rc::clone(&self.region),
            blocks_end,
            0,
        )));
        Ok(Rc::new(RefCell::new(Block::new_empty(
            block_region,
            self.check_kind,
            self.preset,
            self.filters.clone(),
        ))))
    }

    /// Force a new block iff the current one is non-empty; otherwise a
    /// no-op, and a no-op on an entirely empty stream.
    pub fn change_block(&mut self) -> Result<()> {
        let Some(last) = self.blocks.last_value() else {
            return Ok(());
        };
        if last.borrow().is_empty() {
            return Ok(());
        }
        let start = self.len();
        let new_block = self.make_tail_block()?;
        self.blocks.insert(start, new_block);
        Ok(())
    }

    /// Random-access read of uncompressed content at stream-relative offset `p`.
    pub fn read_at(&mut self, p: u64, buf: &mut [u8]) -> Result<usize> {
        if p >= self.len() {
            return Ok(0);
        }
        let Some((start, block)) = self.blocks.floor(p).map(|(k, v)| (k, Rc::clone(v))) else {
            return Ok(0);
        };
        let local = p - start;
        let available = block.borrow().len().saturating_sub(local);
        let want = (buf.len() as u64).min(available) as usize;
        let n = block.borrow_mut().read_at(local, &mut buf[..want])?;

        let id = block.borrow().id();
        if block.borrow().last_read_recreated_decompressor() {
            if let Some(evict_id) = self.cache_strategy.on_create(id) {
                self.evict(evict_id);
            }
        } else {
            self.cache_strategy.on_read(id);
        }
        Ok(n)
    }

    fn evict(&mut self, id: BlockId) {
        for (_, block) in self.blocks.iter() {
            if block.borrow().id() == id {
                block.borrow_mut().clear();
                break;
            }
        }
        self.cache_strategy.on_delete(id);
    }

    /// Append `data` to the stream, writing the header first if this is the
    /// stream's very first write, and creating a new tail block whenever
    /// the current one isn't writable.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.blocks.is_empty() {
            self.region.borrow_mut().truncate(0)?;
            let header = framing::create_header(self.check_kind)?;
            self.region.borrow_mut().seek(0, Whence::End)?;
            self.region.borrow_mut().write(&header)?;
        }
        let needs_new_block = match self.blocks.last_value() {
            None => true,
            Some(b) => !b.borrow().writable(),
        };
        if needs_new_block {
            let start = self.len();
            let new_block = self.make_tail_block()?;
            self.blocks.insert(start, new_block);
        }
        let block = Rc::clone(self.blocks.last_value().expect("just ensured"));
        block.borrow_mut().write(data)
    }

    /// Flush the current block (if any), drop a trailing empty block that
    /// was never written to, and rewrite the index+footer from whatever
    /// blocks remain. Leaves the stream with zero blocks, and its region
    /// truncated back to empty, if it never received any data (mirroring
    /// `Combiner::drop_empty_tail`'s unconditional discard).
    pub fn finalize_write(&mut self) -> Result<()> {
        if let Some(last) = self.blocks.last_value() {
            last.borrow_mut().finalize_write()?;
        }
        if let Some(last_key) = self.blocks.last_key() {
            let last_is_empty = self
                .blocks
                .last_value()
                .map(|b| b.borrow().is_empty())
                .unwrap_or(false);
            if last_is_empty {
                self.blocks.remove(last_key);
            }
        }
        if self.blocks.is_empty() {
            self.region.borrow_mut().truncate(0)?;
            return Ok(());
        }
        let blocks_end = self.blocks_end_pos();
        self.region.borrow_mut().truncate(blocks_end)?;
        let records: Vec<(u64, u64)> = self
            .blocks
            .iter()
            .map(|(_, b)| {
                let b = b.borrow();
                (b.unpadded_size(), b.len())
            })
            .collect();
        let tail = framing::create_index_footer(self.check_kind, &records)?;
        self.region.borrow_mut().seek(0, Whence::End)?;
        self.region.borrow_mut().write(&tail)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
