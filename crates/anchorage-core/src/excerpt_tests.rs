use crate::{Input, MARKER, State};

const LINES: &[u8] = b"content\nline2\nline3\nand4\n";

fn binary(bytes: &[u8]) -> State {
    State::new(Input::binary(bytes.to_vec()))
}

#[test]
fn text_excerpt_clips_to_ten_before_and_twenty_after() {
    let state = State::new(Input::text("abcdefghijklmnopqrstuvwxyz0123456789"));

    assert_eq!(state.excerpt(15), "fghijklmno▶pqrstuvwxyz012345678");
}

#[test]
fn text_excerpt_stays_on_its_line() {
    let state = State::new(Input::text("one\ntwo\nthree"));

    assert_eq!(state.excerpt(5), "t▶wo");
    assert_eq!(state.excerpt(7), "two▶");
}

#[test]
fn text_excerpt_counts_scalars() {
    let state = State::new(Input::text("ααααααααααααβ"));

    assert_eq!(state.excerpt(24), "αααααααααα▶β");
}

#[test]
fn hexdump_marks_first_byte() {
    let error = binary(LINES).new_syntax_error("x");

    assert_eq!(
        error.excerpt(),
        " 00000000  ▶63 6f 6e 74 65 6e 74 0a  6c 69 6e 65 32 0a 6c 69  |▶content.line2.li|"
    );
    assert_eq!(
        error.to_string(),
        "expected \"x\":\n 00000000  ▶63 6f 6e 74 65 6e 74 0a  6c 69 6e 65 32 0a 6c 69  |▶content.line2.li|"
    );
}

#[test]
fn hexdump_pads_short_last_row() {
    let excerpt = binary(LINES).excerpt(17);
    let padding = " ".repeat(21);

    assert_eq!(
        excerpt,
        format!(" 00000010  6e ▶65 33 0a 61 6e 64 34  0a{padding}  |n▶e3.and4.|")
    );
}

#[test]
fn hexdump_marks_end_of_input() {
    let excerpt = binary(b"ab").excerpt(2);

    assert!(excerpt.starts_with(" 00000000  61 62 ▶  "));
    assert!(excerpt.ends_with("|ab▶|"));
}

#[test]
fn hexdump_marks_end_on_row_boundary() {
    let excerpt = binary(&[0u8; 16]).excerpt(16);

    assert!(excerpt.starts_with(&format!(" 00000010  {MARKER}  ")));
    assert!(excerpt.ends_with(&format!("|{MARKER}|")));
}

#[test]
fn hexdump_replaces_unprintable_bytes() {
    let excerpt = binary(&[0x00, b' ', b'~', 0x7f]).excerpt(0);

    assert!(excerpt.ends_with("|▶. ~.|"));
}
