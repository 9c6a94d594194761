use super::*;
use crate::block::cache::{KeepStrategy, RollingStrategy};
use crate::check::CHECK_CRC32;
use crate::region::FileRegion;

fn fresh_file() -> Rc<RefCell<dyn Region>> {
    Rc::new(RefCell::new(FileRegion::new(tempfile::tempfile().unwrap(), true, true)))
}

#[test]
fn write_then_parse_round_trips() {
    let file = fresh_file();
    let mut stream = Stream::new_empty(&file, 0, CHECK_CRC32, None, None, Box::new(KeepStrategy));
    let payload = b"hello stream world, repeated ".repeat(32);
    stream.write(&payload).unwrap();
    stream.finalize_write().unwrap();

    let footer_end = stream.region_len();
    let (mut parsed, header_start) = Stream::parse(&file, footer_end, Box::new(KeepStrategy)).unwrap();
    assert_eq!(header_start, 0);
    assert_eq!(parsed.check_kind(), CHECK_CRC32);
    assert_eq!(parsed.len(), payload.len() as u64);

    let mut out = vec![0_u8; payload.len()];
    let n = parsed.read_at(0, &mut out).unwrap();
    assert_eq!(n, payload.len());
    assert_eq!(out, payload);
}

#[test]
fn change_block_splits_content_across_two_blocks() {
    let file = fresh_file();
    let mut stream = Stream::new_empty(&file, 0, CHECK_CRC32, None, None, Box::new(KeepStrategy));
    stream.write(b"first-block-data").unwrap();
    stream.change_block().unwrap();
    stream.write(b"second-block-data-longer").unwrap();
    stream.finalize_write().unwrap();

    assert_eq!(stream.block_boundaries(), vec![0, "first-block-data".len() as u64]);

    let mut out = vec![0_u8; "second-block-data-longer".len()];
    let start = "first-block-data".len() as u64;
    stream.read_at(start, &mut out).unwrap();
    assert_eq!(out, b"second-block-data-longer");
}

#[test]
fn change_block_is_a_no_op_on_an_empty_stream() {
    let file = fresh_file();
    let mut stream = Stream::new_empty(&file, 0, CHECK_CRC32, None, None, Box::new(KeepStrategy));
    stream.change_block().unwrap();
    assert!(stream.block_boundaries().is_empty());
    assert_eq!(stream.len(), 0);
}

#[test]
fn finalize_write_drops_a_trailing_block_that_was_never_written() {
    let file = fresh_file();
    let mut stream = Stream::new_empty(&file, 0, CHECK_CRC32, None, None, Box::new(KeepStrategy));
    stream.write(b"only-real-block").unwrap();
    stream.change_block().unwrap();
    // change_block() created a fresh tail block, but nothing is ever written to it.
    assert_eq!(stream.block_boundaries().len(), 2);
    stream.finalize_write().unwrap();
    assert_eq!(stream.block_boundaries().len(), 1);
    assert_eq!(stream.len(), "only-real-block".len() as u64);
}

#[test]
fn finalize_write_on_a_single_untouched_block_leaves_the_stream_empty() {
    let file = fresh_file();
    let mut stream = Stream::new_empty(&file, 0, CHECK_CRC32, None, None, Box::new(KeepStrategy));
    stream.write(b"").unwrap();
    assert_eq!(stream.block_boundaries().len(), 1);
    stream.finalize_write().unwrap();
    assert!(stream.block_boundaries().is_empty());
    assert_eq!(stream.len(), 0);
    assert_eq!(stream.region_len(), 0);
}

#[test]
fn backward_seek_read_survives_rolling_cache_eviction() {
    let file = fresh_file();
    let mut stream = Stream::new_empty(&file, 0, CHECK_CRC32, None, None, Box::new(RollingStrategy::new(1)));
    stream.write(b"one-block-payload").unwrap();
    stream.change_block().unwrap();
    stream.write(b"two-block-payload").unwrap();
    stream.finalize_write().unwrap();

    let mut first = vec![0_u8; "one-block-payload".len()];
    stream.read_at(0, &mut first).unwrap();
    assert_eq!(first, b"one-block-payload");

    // reading the second block's decompressor creation evicts the first
    // block's decompressor under a cap of 1; a subsequent read from the
    // first block must still succeed by recreating it.
    let second_start = "one-block-payload".len() as u64;
    let mut second = vec![0_u8; "two-block-payload".len()];
    stream.read_at(second_start, &mut second).unwrap();
    assert_eq!(second, b"two-block-payload");

    let mut first_again = vec![0_u8; "one-block-payload".len()];
    stream.read_at(0, &mut first_again).unwrap();
    assert_eq!(first_again, b"one-block-payload");
}

#[test]
fn parse_rejects_mismatched_header_and_footer_check() {
    // Hand-build a stream whose header and footer disagree on check kind;
    // both are individually well-formed, so only the cross-check catches it.
    let file = fresh_file();
    let header = framing::create_header(CHECK_CRC32).unwrap();
    let tail = framing::create_index_footer(crate::check::CHECK_CRC64, &[(4, 10)]).unwrap();

    file.borrow_mut().write(&header).unwrap();
    file.borrow_mut().write(&[0_u8; 4]).unwrap();
    file.borrow_mut().write(&tail).unwrap();

    let footer_end = file.borrow().len();
    let err = Stream::parse(&file, footer_end, Box::new(KeepStrategy)).unwrap_err();
    assert!(matches!(err, Error::StreamCheckMismatch));
}
