use lzma_safe::encoder::options::filter::{FilterConfig, FilterType};
use lzma_safe::encoder::options::present::Compression;

use super::*;

#[test]
fn default_matches_crc64_with_no_preset_or_filters() {
    let options = ArchiveOptions::default();
    assert_eq!(options.check, DEFAULT_CHECK);
    assert!(options.preset.is_none());
    assert!(options.filters.is_none());
}

#[test]
fn builder_chains_overrides() {
    let options = ArchiveOptions::default()
        .with_check(0x01)
        .with_preset(Compression::Level9)
        .with_filters(vec![FilterConfig {
            filter_type: FilterType::Lzma2,
            options: None,
        }]);

    assert_eq!(options.check, 0x01);
    assert!(matches!(options.preset, Some(Compression::Level9)));
    assert_eq!(options.filters.unwrap().len(), 1);
}

#[test]
fn block_cache_strategy_factory_is_invoked_lazily() {
    let options = ArchiveOptions::default();
    let strategy = (options.block_cache_strategy)();
    // Just confirm it produces a usable strategy object.
    drop(strategy);
}
