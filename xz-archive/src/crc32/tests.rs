use super::*;

#[test]
fn empty_input() {
    assert_eq!(checksum(b""), 0);
}

#[test]
fn known_vector() {
    // The canonical "123456789" CRC32/IEEE check value.
    assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
}

#[test]
fn le_bytes_matches_checksum() {
    let data = b"The quick brown fox jumps over the lazy dog";
    assert_eq!(
        checksum_le_bytes(data),
        checksum(data).to_le_bytes()
    );
}
