use super::*;

fn mode(readable: bool, writable: bool, truncate: bool, must_not_exist: bool) -> OpenMode {
    OpenMode {
        readable,
        writable,
        truncate,
        must_not_exist,
    }
}

#[test]
fn full_mode_matrix() {
    let cases = [
        ("r", mode(true, false, false, false)),
        ("rb", mode(true, false, false, false)),
        ("r+", mode(true, true, false, false)),
        ("rb+", mode(true, true, false, false)),
        ("w", mode(false, true, true, false)),
        ("wb", mode(false, true, true, false)),
        ("w+", mode(true, true, true, false)),
        ("wb+", mode(true, true, true, false)),
        ("x", mode(false, true, true, true)),
        ("xb", mode(false, true, true, true)),
        ("x+", mode(true, true, true, true)),
        ("xb+", mode(true, true, true, true)),
    ];
    for (input, expected) in cases {
        assert_eq!(parse(input).unwrap(), expected, "mode {input}");
    }
}

#[test]
fn duplicate_base_character_fails() {
    assert!(matches!(parse("rw"), Err(Error::InvalidMode(_))));
}

#[test]
fn duplicate_flag_fails() {
    assert!(matches!(parse("r++"), Err(Error::InvalidMode(_))));
    assert!(matches!(parse("rbb"), Err(Error::InvalidMode(_))));
}

#[test]
fn missing_base_character_fails() {
    assert!(matches!(parse("+"), Err(Error::InvalidMode(_))));
    assert!(matches!(parse(""), Err(Error::InvalidMode(_))));
}

#[test]
fn unknown_character_fails() {
    assert!(matches!(parse("ra"), Err(Error::InvalidMode(_))));
}
