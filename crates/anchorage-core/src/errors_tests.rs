use crate::{Errors, Input, State};

fn errors_at(source: &str, positions: &[usize]) -> Errors {
    let state = State::new(Input::text(source));
    let mut errors = Errors::new();
    for &pos in positions {
        errors.push(state.move_by(pos).new_syntax_error("x"));
    }
    errors
}

#[test]
fn sort_orders_by_position() {
    let mut errors = errors_at("abcdefg", &[5, 1, 3]);
    errors.sort();

    assert_eq!(errors.positions(), [1, 3, 5]);
}

#[test]
fn sort_is_stable_for_equal_positions() {
    let state = State::new(Input::text("abc"));
    let mut errors = Errors::new();
    errors.push(state.move_by(2).new_semantic_error("second"));
    errors.push(state.move_by(1).new_semantic_error("first"));
    errors.push(state.move_by(2).new_semantic_error("third"));
    errors.sort();

    let messages: Vec<_> = errors.iter().map(|e| e.message()).collect();
    assert_eq!(messages, ["first", "second", "third"]);
}

#[test]
fn counts_by_kind() {
    let state = State::new(Input::text("abc"));
    let mut errors = errors_at("abc", &[0, 1]);
    errors.push(state.new_semantic_error("odd"));

    assert_eq!(errors.len(), 3);
    assert_eq!(errors.syntax_count(), 2);
    assert_eq!(errors.semantic_count(), 1);
}

#[test]
fn display_joins_lines() {
    let errors = errors_at("ab", &[0, 2]);

    insta::assert_snapshot!(errors.to_string(), @r#"
    expected "x" [1:1] ▶ab
    expected "x" [1:3] ab▶
    "#);
}

#[test]
fn printer_without_source_is_plain() {
    let errors = errors_at("ab", &[1]);

    assert_eq!(errors.printer().render(), "expected \"x\" [1:2] a▶b");
}

#[test]
fn printer_with_source_annotates() {
    let errors = errors_at("let x = ;", &[8]);
    let rendered = errors
        .printer()
        .source("let x = ;")
        .path("input.txt")
        .render();

    assert!(rendered.contains("error: expected \"x\""));
    assert!(rendered.contains("input.txt"));
    assert!(rendered.contains("let x = ;"));
}

#[test]
fn printer_keeps_binary_errors_plain() {
    let state = State::new(Input::binary(b"AB".to_vec()));
    let errors = Errors::from(vec![state.new_syntax_error("x")]);
    let rendered = errors.printer().source("AB").render();

    assert!(rendered.starts_with("expected \"x\":\n 00000000  ▶41 42"));
}

#[test]
fn empty_errors_render_nothing() {
    let errors = Errors::new();

    assert!(errors.is_empty());
    assert_eq!(errors.printer().source("abc").render(), "");
}
