use super::*;

#[test]
fn reads_full_buffer() {
    let mut region = StaticRegion::new(vec![1, 2, 3, 4]);
    let mut buf = [0_u8; 4];
    assert_eq!(region.read(&mut buf).unwrap(), 4);
    assert_eq!(buf, [1, 2, 3, 4]);
    assert_eq!(region.read(&mut buf).unwrap(), 0);
}

#[test]
fn short_read_past_end() {
    let mut region = StaticRegion::new(vec![1, 2, 3]);
    region.seek(2, Whence::Start).unwrap();
    let mut buf = [0_u8; 4];
    assert_eq!(region.read(&mut buf).unwrap(), 1);
    assert_eq!(buf[0], 3);
}

#[test]
fn seek_past_end_then_read_is_empty() {
    let mut region = StaticRegion::new(vec![1, 2, 3]);
    region.seek(100, Whence::Start).unwrap();
    let mut buf = [0_u8; 4];
    assert_eq!(region.read(&mut buf).unwrap(), 0);
}

#[test]
fn negative_seek_fails() {
    let mut region = StaticRegion::new(vec![1, 2, 3]);
    assert!(matches!(
        region.seek(-1, Whence::Start),
        Err(Error::InvalidSeek)
    ));
}

#[test]
fn write_and_truncate_are_rejected() {
    let mut region = StaticRegion::new(vec![1, 2, 3]);
    assert!(matches!(region.write(b"x"), Err(Error::NotWritable)));
    assert!(matches!(region.truncate(0), Err(Error::NotWritable)));
}
