//! A single XZ block: random-access decompression plus block-at-a-time
//! compression (spec §4.4), grounded on `xz.block.XZBlock`.

pub mod cache;

use std::cell::RefCell;
use std::rc::Rc;

use lzma_safe::decoder::options::Flags as DecoderFlags;
use lzma_safe::decoder::Decoder;
use lzma_safe::encoder::options::filter::FilterConfig;
use lzma_safe::encoder::options::present::Compression;
use lzma_safe::encoder::options::Options as EncoderOptions;
use lzma_safe::encoder::Encoder;
use lzma_safe::Action;
use lzma_safe::Stream as LzmaStream;

use crate::error::{Error, Result};
use crate::framing;
use crate::region::{Combiner, ProxyRegion, Region, StaticRegion, Whence};

use cache::BlockId;

/// Chunk size used both to pull compressed bytes out of the synthesized
/// stream while decoding, and as the scratch output buffer while encoding.
const READ_CHUNK: usize = 8192;

struct Decompressor {
    synthetic: Combiner<Box<dyn Region>>,
    decoder: Decoder,
    p_dec: u64,
    pending_input: Vec<u8>,
    pending_offset: usize,
}

struct Writer {
    encoder: Encoder,
    uncompressed_written: u64,
}

/// A block's in-memory, on-disk, and compressor/decompressor state.
pub struct Block {
    id: BlockId,
    region: Rc<RefCell<dyn Region>>,
    check_kind: u8,
    unpadded_size: u64,
    uncompressed_size: u64,
    preset: Option<Compression>,
    filters: Option<Vec<FilterConfig>>,
    decomp: Option<Decompressor>,
    writer: Option<Writer>,
    last_read_recreated_decompressor: bool,
}

impl Block {
    /// Construct a block over a parsed `(check_kind, unpadded_size,
    /// uncompressed_size)` record whose compressed bytes live in `region`.
    pub fn from_parsed(
        region: Rc<RefCell<dyn Region>>,
        check_kind: u8,
        unpadded_size: u64,
        uncompressed_size: u64,
    ) -> Result<Self> {
        if unpadded_size == 0 {
            return Err(Error::IndexRecordUnpaddedSize);
        }
        if uncompressed_size == 0 {
            return Err(Error::IndexRecordUncompressedSize);
        }
        Ok(Self {
            id: BlockId::new(),
            region,
            check_kind,
            unpadded_size,
            uncompressed_size,
            preset: None,
            filters: None,
            decomp: None,
            writer: None,
            last_read_recreated_decompressor: false,
        })
    }

    /// Construct a fresh, empty, writable block.
    pub fn new_empty(
        region: Rc<RefCell<dyn Region>>,
        check_kind: u8,
        preset: Option<Compression>,
        filters: Option<Vec<FilterConfig>>,
    ) -> Self {
        Self {
            id: BlockId::new(),
            region,
            check_kind,
            unpadded_size: 0,
            uncompressed_size: 0,
            preset,
            filters,
            decomp: None,
            writer: None,
            last_read_recreated_decompressor: false,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn check_kind(&self) -> u8 {
        self.check_kind
    }

    pub fn unpadded_size(&self) -> u64 {
        self.unpadded_size
    }

    /// Content length: bytes produced by decompression.
    pub fn len(&self) -> u64 {
        self.uncompressed_size
    }

    pub fn is_empty(&self) -> bool {
        self.uncompressed_size == 0
    }

    /// Iff the block is empty or currently has an active writer.
    pub fn writable(&self) -> bool {
        self.writer.is_some() || self.uncompressed_size == 0
    }

    /// Drop the live decompressor, if any. Transparent to future reads,
    /// which simply re-create it. Used by the block cache's eviction.
    pub fn clear(&mut self) {
        self.decomp = None;
    }

    /// Whether the most recent [`Block::read_at`] call had to (re)create the
    /// decompressor, for the owning stream's cache-strategy bookkeeping.
    pub fn last_read_recreated_decompressor(&self) -> bool {
        self.last_read_recreated_decompressor
    }

    fn build_synthetic(&self) -> Result<Combiner<Box<dyn Region>>> {
        let header = framing::create_header(self.check_kind)?;
        let tail = framing::create_index_footer(
            self.check_kind,
            &[(self.unpadded_size, self.uncompressed_size)],
        )?;
        let span = self.region.borrow().len();
        let mut combiner: Combiner<Box<dyn Region>> =
            Combiner::new(Box::new(|| Err(Error::NotWritable)));
        combiner.append(Box::new(StaticRegion::new(header.to_vec())));
        combiner.append(Box::new(ProxyRegion::new(Rc::clone(&self.region), 0, span)));
        combiner.append(Box::new(StaticRegion::new(tail)));
        Ok(combiner)
    }

    fn reset_decompressor(&mut self) -> Result<()> {
        let synthetic = self.build_synthetic()?;
        let decoder = LzmaStream::default().decoder(u64::MAX, DecoderFlags::empty())?;
        self.decomp = Some(Decompressor {
            synthetic,
            decoder,
            p_dec: 0,
            pending_input: Vec::new(),
            pending_offset: 0,
        });
        Ok(())
    }

    /// Drive the decompressor until `want` more bytes have been produced
    /// into `out` (or the decompressor has finished), honoring the refill
    /// and end-of-block rules of spec §4.4 steps 3-4.
    fn drive(&mut self, out: &mut [u8]) -> Result<usize> {
        let decomp = self.decomp.as_mut().expect("decompressor initialized");
        let mut produced = 0;
        while produced < out.len() {
            if decomp.decoder.is_finished() {
                return Err(Error::BlockDecompressorEof);
            }
            if decomp.pending_offset >= decomp.pending_input.len() {
                let mut chunk = vec![0_u8; READ_CHUNK];
                let n = decomp.synthetic.read(&mut chunk)?;
                if n == 0 {
                    return Err(Error::BlockDataEof);
                }
                chunk.truncate(n);
                decomp.pending_input = chunk;
                decomp.pending_offset = 0;
            }
            let feed_new = decomp.pending_offset == 0;
            let input: &[u8] = if feed_new {
                &decomp.pending_input[..]
            } else {
                &[]
            };
            let (bytes_read, bytes_written) =
                decomp.decoder.process(input, &mut out[produced..], Action::Run)?;
            decomp.pending_offset += bytes_read;
            produced += bytes_written;
            if bytes_read == 0 && bytes_written == 0 && decomp.decoder.is_finished() {
                break;
            }
        }
        decomp.p_dec += produced as u64;
        Ok(produced)
    }

    /// Random-access read of `buf.len()` uncompressed bytes starting at
    /// uncompressed offset `p`.
    pub fn read_at(&mut self, p: u64, buf: &mut [u8]) -> Result<usize> {
        if self.writer.is_some() {
            return Err(Error::NotReadable);
        }
        let available = self.uncompressed_size.saturating_sub(p);
        let want = buf.len().min(available as usize);
        if want == 0 {
            return Ok(0);
        }

        let needs_reset = match &self.decomp {
            None => true,
            Some(d) => p < d.p_dec,
        };
        self.last_read_recreated_decompressor = needs_reset;
        if needs_reset {
            self.reset_decompressor()?;
        }

        let p_dec = self.decomp.as_ref().expect("just reset").p_dec;
        let skip = (p - p_dec) as usize;
        let mut scratch = vec![0_u8; skip + want];
        let produced = self.drive(&mut scratch)?;
        let available_after_skip = produced.saturating_sub(skip);
        let n = available_after_skip.min(want);
        buf[..n].copy_from_slice(&scratch[skip..skip + n]);

        if self.decomp.as_ref().expect("checked above").p_dec == self.uncompressed_size {
            self.validate_end_of_block()?;
        }
        Ok(n)
    }

    fn validate_end_of_block(&mut self) -> Result<()> {
        let mut extra = [0_u8; 1];
        match self.drive(&mut extra) {
            Ok(0) => Ok(()),
            Ok(_) => Err(Error::BlockOverrun),
            Err(Error::BlockDecompressorEof) => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn ensure_writer(&mut self) -> Result<()> {
        if self.writer.is_some() {
            return Ok(());
        }
        let level = self.preset.unwrap_or(Compression::Level6);
        let check = crate::check::to_integrity_check(self.check_kind)?;
        let stream = LzmaStream::default();
        let encoder = match &self.filters {
            Some(filters) if !filters.is_empty() => Encoder::new_mt(
                EncoderOptions {
                    level,
                    check,
                    filters: filters.clone(),
                    ..Default::default()
                },
                stream,
            )?,
            _ => Encoder::new(level, check, stream)?,
        };

        self.writer = Some(Writer {
            encoder,
            uncompressed_written: 0,
        });

        let header = self.pump_output(Action::Run, &[])?;
        let expected = framing::create_header(self.check_kind)?;
        if header != expected {
            return Err(Error::BlockCompressorHeader);
        }
        Ok(())
    }

    fn pump_output(&mut self, action: Action, input: &[u8]) -> Result<Vec<u8>> {
        let writer = self.writer.as_mut().expect("writer initialized");
        let mut produced = Vec::new();
        let mut remaining = input;
        loop {
            let mut scratch = vec![0_u8; READ_CHUNK];
            let (bytes_read, bytes_written) = writer.encoder.process(remaining, &mut scratch, action)?;
            produced.extend_from_slice(&scratch[..bytes_written]);
            remaining = &remaining[bytes_read..];
            let done_for_this_call = remaining.is_empty() && bytes_written == 0;
            if action == Action::Finish {
                if writer.encoder.is_finished() {
                    break;
                }
            } else if done_for_this_call {
                break;
            }
        }
        Ok(produced)
    }

    /// Append `data` to the block, driving the compressor.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        if !self.writable() {
            return Err(Error::NotWritable);
        }
        self.ensure_writer()?;
        let produced = self.pump_output(Action::Run, data)?;
        if !produced.is_empty() {
            self.region.borrow_mut().write(&produced)?;
        }
        let writer = self.writer.as_mut().expect("just ensured");
        writer.uncompressed_written += data.len() as u64;
        self.uncompressed_size = writer.uncompressed_written;
        Ok(data.len())
    }

    /// Flush the compressor, validate its trailer, and finalize the block.
    /// Invoked by the owning stream's write-finalize hook.
    pub fn finalize_write(&mut self) -> Result<()> {
        if self.writer.is_none() {
            return Ok(());
        }
        let tail = self.pump_output(Action::Finish, &[])?;
        let writer = self.writer.take().expect("checked above");

        if tail.len() < framing::FOOTER_SIZE {
            return Err(Error::FooterLength);
        }
        let footer_start = tail.len() - framing::FOOTER_SIZE;
        let (footer_check, backward_size_bytes) = framing::parse_footer(&tail[footer_start..])?;
        if footer_check != self.check_kind {
            return Err(Error::BlockCompressorFooterCheck);
        }
        let index_start = footer_start
            .checked_sub(backward_size_bytes as usize)
            .ok_or(Error::IndexLength)?;
        let records = framing::parse_index(&tail[index_start..footer_start])?;
        if records.len() != 1 {
            return Err(Error::BlockCompressorIndexRecords);
        }
        let (unpadded_size, uncompressed_size) = records[0];
        if uncompressed_size != writer.uncompressed_written {
            return Err(Error::BlockCompressorUncompressedSize);
        }

        let payload = &tail[..index_start];
        if !payload.is_empty() {
            self.region.borrow_mut().write(payload)?;
        }
        self.unpadded_size = unpadded_size;
        self.uncompressed_size = uncompressed_size;
        Ok(())
    }

    /// Permitted only on an empty block; pads it to `size` zero bytes,
    /// forcing header emission through a freshly created compressor.
    pub fn truncate(&mut self, size: u64) -> Result<()> {
        if !self.writable() {
            return Err(Error::NotWritable);
        }
        let zeros = vec![0_u8; size as usize];
        self.write(&zeros)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
