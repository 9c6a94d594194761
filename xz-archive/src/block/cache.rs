//! Block read cache strategies (spec §4.5), grounded on
//! `xz.strategy.KeepBlockReadStrategy` / `RollingBlockReadStrategy`.
//!
//! The Python original holds live block references and calls `.clear()`
//! directly on the evicted one. Here the strategy only tracks identity and
//! timestamps and *reports* which block to evict; the owning [`crate::stream::Stream`]
//! performs the actual eviction and reports it back via `on_delete`, since a
//! strategy object has no business reaching into another type's state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

static NEXT_BLOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle identifying a block for cache bookkeeping, standing in
/// for the Python original's use of `id(block)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(u64);

impl BlockId {
    pub fn new() -> Self {
        Self(NEXT_BLOCK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds how many blocks may keep a live decompressor at once.
pub trait BlockCacheStrategy {
    /// A decompressor was created for `id`. Returns the id of a block that
    /// should now be evicted, if the cache is over capacity.
    fn on_create(&mut self, id: BlockId) -> Option<BlockId>;

    /// `id`'s decompressor was just used to satisfy a read.
    fn on_read(&mut self, id: BlockId);

    /// `id`'s decompressor was dropped (evicted or the block itself closed).
    fn on_delete(&mut self, id: BlockId);
}

/// Never evicts.
#[derive(Debug, Default)]
pub struct KeepStrategy;

impl BlockCacheStrategy for KeepStrategy {
    fn on_create(&mut self, _id: BlockId) -> Option<BlockId> {
        None
    }

    fn on_read(&mut self, _id: BlockId) {}

    fn on_delete(&mut self, _id: BlockId) {}
}

/// Evicts the least-recently-used block once more than `cap` blocks have a
/// live decompressor.
#[derive(Debug)]
pub struct RollingStrategy {
    cap: usize,
    last_used: HashMap<BlockId, Instant>,
}

impl RollingStrategy {
    pub const DEFAULT_CAP: usize = 8;

    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            last_used: HashMap::new(),
        }
    }
}

impl Default for RollingStrategy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAP)
    }
}

impl BlockCacheStrategy for RollingStrategy {
    fn on_create(&mut self, id: BlockId) -> Option<BlockId> {
        self.last_used.insert(id, Instant::now());
        if self.last_used.len() <= self.cap {
            return None;
        }
        self.last_used
            .iter()
            .min_by_key(|(_, &stamp)| stamp)
            .map(|(&id, _)| id)
    }

    fn on_read(&mut self, id: BlockId) {
        self.last_used.insert(id, Instant::now());
    }

    fn on_delete(&mut self, id: BlockId) {
        self.last_used.remove(&id);
    }
}
