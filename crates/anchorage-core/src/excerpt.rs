//! Source excerpts for error messages.

use std::fmt::Write;

/// Glyph inserted at the exact error position.
pub const MARKER: char = '▶';

const SCALARS_BEFORE: usize = 10;
const SCALARS_AFTER: usize = 20;
const HEXDUMP_WIDTH: usize = 16;

/// Up to 10 scalars before and 20 after `pos`, clipped to the line `start..end`.
pub(crate) fn text(source: &str, start: usize, pos: usize, end: usize) -> String {
    let before = source.get(start..pos).unwrap_or_default();
    let after = source.get(pos..end).unwrap_or_default();

    let skip = before.chars().count().saturating_sub(SCALARS_BEFORE);
    let mut out: String = before.chars().skip(skip).collect();
    out.push(MARKER);
    out.extend(after.chars().take(SCALARS_AFTER));
    out
}

/// Canonical 16-byte hexdump row containing `pos`, marker in both columns.
///
/// ```text
///  00000000  ▶63 6f 6e 74 65 6e 74 0a  6c 69 6e 65 32 0a 6c 69  |▶content.line2.li|
/// ```
pub(crate) fn hexdump(bytes: &[u8], pos: usize) -> String {
    let offset = pos - pos % HEXDUMP_WIDTH;
    let row = &bytes[offset.min(bytes.len())..(offset + HEXDUMP_WIDTH).min(bytes.len())];
    let marked = pos - offset;

    let mut hex = String::with_capacity(HEXDUMP_WIDTH * 3 + 4);
    for i in 0..HEXDUMP_WIDTH {
        if i > 0 {
            hex.push(' ');
        }
        if i == HEXDUMP_WIDTH / 2 {
            hex.push(' ');
        }
        if i == marked {
            hex.push(MARKER);
        }
        match row.get(i) {
            Some(b) => write!(hex, "{b:02x}").expect("String write never fails"),
            None => hex.push_str("  "),
        }
    }

    let mut ascii = String::with_capacity(HEXDUMP_WIDTH + 4);
    for (i, &b) in row.iter().enumerate() {
        if i == marked {
            ascii.push(MARKER);
        }
        ascii.push(if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            '.'
        });
    }
    if marked >= row.len() {
        ascii.push(MARKER);
    }

    format!(" {offset:08x}  {hex}  |{ascii}|")
}
