use super::*;

#[test]
fn known_check_kinds_round_trip() {
    for &kind in &[CHECK_NONE, CHECK_CRC32, CHECK_CRC64, CHECK_SHA256] {
        let check = to_integrity_check(kind).unwrap();
        assert_eq!(from_integrity_check(check), kind);
    }
}

#[test]
fn reserved_in_range_value_is_unsupported() {
    assert!(matches!(to_integrity_check(0x02), Err(Error::Unsupported)));
}

#[test]
fn out_of_range_value_is_footer_check_error() {
    assert!(matches!(to_integrity_check(0x10), Err(Error::FooterCheck)));
}

#[test]
fn default_check_is_crc64() {
    assert_eq!(DEFAULT_CHECK, CHECK_CRC64);
}
