//! Open-time configuration for an [`crate::archive::Archive`].
//!
//! Builder shape grounded on `lzma_safe::encoder::options::Options`: a
//! `Default` plus chainable `with_*` setters that consume and return
//! `self`.

use lzma_safe::encoder::options::filter::FilterConfig;
use lzma_safe::encoder::options::present::Compression;

use crate::block::cache::BlockCacheStrategy;
use crate::block::cache::RollingStrategy;
use crate::check::DEFAULT_CHECK;

/// Compression settings applied to streams created while writing, plus the
/// block-read caching policy applied to streams while reading.
pub struct ArchiveOptions {
    pub(crate) check: u8,
    pub(crate) preset: Option<Compression>,
    pub(crate) filters: Option<Vec<FilterConfig>>,
    pub(crate) block_cache_strategy: Box<dyn Fn() -> Box<dyn BlockCacheStrategy>>,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            check: DEFAULT_CHECK,
            preset: None,
            filters: None,
            block_cache_strategy: Box::new(|| Box::new(RollingStrategy::default())),
        }
    }
}

impl std::fmt::Debug for ArchiveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveOptions")
            .field("check", &self.check)
            .field("preset", &self.preset.is_some())
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

impl ArchiveOptions {
    /// Set the check kind used for streams created while writing.
    #[must_use]
    pub fn with_check(mut self, check: u8) -> Self {
        self.check = check;
        self
    }

    /// Set the compression preset, overriding any filter chain's default
    /// encoder settings.
    #[must_use]
    pub fn with_preset(mut self, preset: Compression) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Replace the filter chain applied to streams created while writing.
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<FilterConfig>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Provide a factory for the cache strategy applied to each parsed
    /// stream's blocks.
    #[must_use]
    pub fn with_block_cache_strategy<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn BlockCacheStrategy> + 'static,
    {
        self.block_cache_strategy = Box::new(factory);
        self
    }
}

#[cfg(test)]
mod tests;
