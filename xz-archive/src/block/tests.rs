use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::check::CHECK_CRC32;
use crate::region::FileRegion;

fn fresh_region() -> Rc<RefCell<dyn Region>> {
    Rc::new(RefCell::new(FileRegion::new(
        tempfile::tempfile().unwrap(),
        true,
        true,
    )))
}

#[test]
fn write_then_read_back_round_trips() {
    let region = fresh_region();
    let mut block = Block::new_empty(Rc::clone(&region), CHECK_CRC32, None, None);

    let payload = b"the quick brown fox jumps over the lazy dog, repeated ".repeat(64);
    block.write(&payload).unwrap();
    block.finalize_write().unwrap();

    assert_eq!(block.len(), payload.len() as u64);
    assert!(block.unpadded_size() > 0);

    let mut out = vec![0_u8; payload.len()];
    let n = block.read_at(0, &mut out).unwrap();
    assert_eq!(n, payload.len());
    assert_eq!(out, payload);
}

#[test]
fn random_access_read_after_sequential_read_does_not_reset_unnecessarily() {
    let region = fresh_region();
    let mut block = Block::new_empty(Rc::clone(&region), CHECK_CRC32, None, None);
    let payload: Vec<u8> = (0_u8..=255).cycle().take(4096).collect();
    block.write(&payload).unwrap();
    block.finalize_write().unwrap();

    let mut first_half = vec![0_u8; 2048];
    block.read_at(0, &mut first_half).unwrap();
    assert_eq!(&first_half[..], &payload[..2048]);

    let mut second_half = vec![0_u8; 2048];
    block.read_at(2048, &mut second_half).unwrap();
    assert_eq!(&second_half[..], &payload[2048..]);
}

#[test]
fn backward_seek_resets_decompressor_and_still_reads_correctly() {
    let region = fresh_region();
    let mut block = Block::new_empty(Rc::clone(&region), CHECK_CRC32, None, None);
    let payload: Vec<u8> = (0_u8..=255).cycle().take(4096).collect();
    block.write(&payload).unwrap();
    block.finalize_write().unwrap();

    let mut tail = vec![0_u8; 100];
    block.read_at(4000, &mut tail).unwrap();
    assert_eq!(&tail[..], &payload[4000..]);

    let mut head = vec![0_u8; 100];
    block.read_at(0, &mut head).unwrap();
    assert_eq!(&head[..], &payload[..100]);
}

#[test]
fn writable_is_true_only_while_empty_or_actively_writing() {
    let region = fresh_region();
    let mut block = Block::new_empty(Rc::clone(&region), CHECK_CRC32, None, None);
    assert!(block.writable());
    block.write(b"x").unwrap();
    assert!(block.writable());
    block.finalize_write().unwrap();
    assert!(!block.writable());
}

#[test]
fn truncate_on_empty_block_produces_zero_bytes() {
    let region = fresh_region();
    let mut block = Block::new_empty(Rc::clone(&region), CHECK_CRC32, None, None);
    block.truncate(16).unwrap();
    block.finalize_write().unwrap();
    assert_eq!(block.len(), 16);

    let mut out = vec![0xFF_u8; 16];
    block.read_at(0, &mut out).unwrap();
    assert_eq!(out, vec![0_u8; 16]);
}

#[test]
fn truncate_on_non_empty_block_fails() {
    let region = fresh_region();
    let mut block = Block::new_empty(Rc::clone(&region), CHECK_CRC32, None, None);
    block.write(b"hi").unwrap();
    block.finalize_write().unwrap();
    assert!(matches!(block.truncate(4), Err(Error::NotWritable)));
}

#[test]
fn corrupted_payload_produces_a_wrapped_codec_error() {
    let region = fresh_region();
    let mut block = Block::new_empty(Rc::clone(&region), CHECK_CRC32, None, None);
    let payload = b"corrupt the tail of this block's compressed payload, repeated ".repeat(16);
    block.write(&payload).unwrap();
    block.finalize_write().unwrap();

    let unpadded_size = block.unpadded_size();
    let uncompressed_size = block.len();

    let mut compressed = vec![0_u8; unpadded_size as usize];
    region.borrow_mut().seek(0, Whence::Start).unwrap();
    region.borrow_mut().read_exact_or_to_end(&mut compressed).unwrap();

    // Flip the last byte of the block's raw compressed payload.
    let last = compressed.len() - 1;
    compressed[last] ^= 0xFF;

    let corrupted_region: Rc<RefCell<dyn Region>> = Rc::new(RefCell::new(StaticRegion::new(compressed)));
    let mut corrupted = Block::from_parsed(corrupted_region, CHECK_CRC32, unpadded_size, uncompressed_size).unwrap();

    let mut out = vec![0_u8; uncompressed_size as usize];
    let err = corrupted.read_at(0, &mut out).unwrap_err();
    assert!(matches!(err, Error::Codec(_)));
}

#[test]
fn from_parsed_rejects_zero_sized_fields() {
    let region = fresh_region();
    assert!(matches!(
        Block::from_parsed(Rc::clone(&region), CHECK_CRC32, 0, 10),
        Err(Error::IndexRecordUnpaddedSize)
    ));
    assert!(matches!(
        Block::from_parsed(region, CHECK_CRC32, 10, 0),
        Err(Error::IndexRecordUncompressedSize)
    ));
}
