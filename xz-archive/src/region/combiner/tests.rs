use super::*;
use crate::region::{FileRegion, StaticRegion};

fn read_only_combiner(parts: Vec<&[u8]>) -> Combiner<StaticRegion> {
    let mut combiner = Combiner::new(Box::new(|| Err(Error::NotWritable)));
    for part in parts {
        combiner.append(StaticRegion::new(part.to_vec()));
    }
    combiner
}

#[test]
fn reads_span_multiple_children() {
    let mut combiner = read_only_combiner(vec![b"abc", b"def", b"gh"]);
    let mut out = Vec::new();
    let mut buf = [0_u8; 4];
    loop {
        let n = combiner.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(out, b"abcdefgh");
}

#[test]
fn seek_lands_mid_child() {
    let mut combiner = read_only_combiner(vec![b"abc", b"def"]);
    combiner.seek(4, Whence::Start).unwrap();
    let mut buf = [0_u8; 2];
    assert_eq!(combiner.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf, b"ef");
}

#[test]
fn read_past_end_is_empty() {
    let mut combiner = read_only_combiner(vec![b"ab"]);
    combiner.seek(0, Whence::End).unwrap();
    let mut buf = [0_u8; 4];
    assert_eq!(combiner.read(&mut buf).unwrap(), 0);
}

fn writable_combiner() -> Combiner<FileRegion> {
    Combiner::new(Box::new(|| Ok(FileRegion::new(tempfile::tempfile().unwrap(), true, true))))
}

#[test]
fn write_creates_a_tail_child_lazily() {
    let mut combiner = writable_combiner();
    assert_eq!(combiner.child_count(), 0);
    combiner.write(b"hello").unwrap();
    assert_eq!(combiner.child_count(), 1);
    assert_eq!(combiner.len(), 5);
}

#[test]
fn write_before_end_fails() {
    let mut combiner = writable_combiner();
    combiner.write(b"hello").unwrap();
    combiner.seek(0, Whence::Start).unwrap();
    assert!(matches!(combiner.write(b"x"), Err(Error::WriteInMiddle)));
}

#[test]
fn truncate_shrinks_and_drops_trailing_children() {
    let mut combiner = writable_combiner();
    combiner.write(b"abc").unwrap();
    combiner.append(FileRegion::new(tempfile::tempfile().unwrap(), true, true));
    // second child is empty (len 0) and sits at offset 3
    combiner.truncate(1).unwrap();
    assert_eq!(combiner.len(), 1);
    assert_eq!(combiner.child_count(), 1);
}

#[test]
fn drop_empty_tail_removes_zero_length_last_child() {
    let mut combiner = writable_combiner();
    combiner.write(b"abc").unwrap();
    combiner.append(FileRegion::new(tempfile::tempfile().unwrap(), true, true));
    assert_eq!(combiner.child_count(), 2);
    combiner.drop_empty_tail().unwrap();
    assert_eq!(combiner.child_count(), 1);
    assert_eq!(combiner.len(), 3);
}
