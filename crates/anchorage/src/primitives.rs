//! Leaf parsers for text and binary input.
//!
//! Each comes with the recoverer that fits it: a search for what it
//! matches, or [`Recoverer::never`] when it may match empty input.

use std::rc::Rc;

use crate::leaf::leaf;
use crate::parser::Parser;
use crate::recover::{Recoverer, Waste};

/// Matches the scalar `expected`.
pub fn char(expected: char) -> Parser<char> {
    let label: Rc<str> = expected.to_string().into();
    leaf(
        label.clone(),
        move |state| match state.current_str().chars().next() {
            Some(found) if found == expected => Ok((state.move_by(found.len_utf8()), found)),
            _ => Err(state.new_syntax_error(&label)),
        },
        Some(Recoverer::find(move |c| c == expected)),
    )
}

/// Matches one scalar accepted by `pred`.
pub fn satisfy<F>(label: &str, pred: F) -> Parser<char>
where
    F: Fn(char) -> bool + 'static,
{
    let label: Rc<str> = label.into();
    let pred = Rc::new(pred);
    let search = pred.clone();
    leaf(
        label.clone(),
        move |state| match state.current_str().chars().next() {
            Some(found) if pred(found) => Ok((state.move_by(found.len_utf8()), found)),
            _ => Err(state.new_syntax_error(&label)),
        },
        Some(Recoverer::find(move |c| search(c))),
    )
}

/// Matches `expected` exactly.
pub fn literal(expected: &str) -> Parser<String> {
    let label: Rc<str> = expected.into();
    let recoverer = if expected.is_empty() {
        Recoverer::never()
    } else {
        Recoverer::find_str(expected)
    };
    leaf(
        label.clone(),
        move |state| {
            if state.current_str().starts_with(&*label) {
                Ok((state.move_by(label.len()), label.to_string()))
            } else {
                Err(state.new_syntax_error(&label))
            }
        },
        Some(recoverer),
    )
}

/// Matches any single scalar.
pub fn any_char() -> Parser<char> {
    leaf(
        "any character",
        |state| match state.current_str().chars().next() {
            Some(found) => Ok((state.move_by(found.len_utf8()), found)),
            None => Err(state.new_syntax_error("any character")),
        },
        Some(Recoverer::find(|_| true)),
    )
}

/// Matches zero or more ASCII digits.
pub fn digit0() -> Parser<String> {
    leaf(
        "digits",
        |state| {
            let digits = leading_digits(state.current_str());
            Ok((state.move_by(digits.len()), digits.to_string()))
        },
        Some(Recoverer::never()),
    )
}

/// Matches one or more ASCII digits.
pub fn digit1() -> Parser<String> {
    leaf(
        "digit",
        |state| {
            let digits = leading_digits(state.current_str());
            if digits.is_empty() {
                return Err(state.new_syntax_error("digit"));
            }
            Ok((state.move_by(digits.len()), digits.to_string()))
        },
        Some(Recoverer::find(|c| c.is_ascii_digit())),
    )
}

fn leading_digits(text: &str) -> &str {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    &text[..end]
}

/// Succeeds only at the end of input, consuming nothing.
pub fn eof() -> Parser<()> {
    leaf(
        "end of input",
        |state| {
            if state.at_end() {
                Ok((state.clone(), ()))
            } else {
                Err(state.new_syntax_error("end of input"))
            }
        },
        Some(Recoverer::never()),
    )
}

/// Consumes input up to (not including) the next `stop`.
///
/// Fails if `stop` doesn't occur in the rest of the input.
pub fn until(stop: &str) -> Parser<String> {
    let stop: Rc<str> = stop.into();
    let label: Rc<str> = format!("until {stop}").into();
    leaf(
        label,
        move |state| match state.current_str().find(&*stop) {
            Some(offset) => {
                let end = state.move_by(offset);
                Ok((end.clone(), state.string_to(&end).to_string()))
            }
            None => Err(state.new_syntax_error(&stop)),
        },
        Some(Recoverer::never()),
    )
}

/// Matches the byte `expected` (binary input).
pub fn byte(expected: u8) -> Parser<u8> {
    let label: Rc<str> = format!("0x{expected:02x}").into();
    leaf(
        label.clone(),
        move |state| match state.current_bytes().first() {
            Some(&found) if found == expected => Ok((state.move_by(1), found)),
            _ => Err(state.new_syntax_error(&label)),
        },
        Some(Recoverer::find_byte(move |b| b == expected)),
    )
}

/// Matches any single byte (binary input).
pub fn any_byte() -> Parser<u8> {
    leaf(
        "any byte",
        |state| match state.current_bytes().first() {
            Some(&found) => Ok((state.move_by(1), found)),
            None => Err(state.new_syntax_error("any byte")),
        },
        Some(Recoverer::fast(|state| {
            if state.at_end() {
                Waste::TooMuch
            } else {
                Waste::Units(0)
            }
        })),
    )
}
