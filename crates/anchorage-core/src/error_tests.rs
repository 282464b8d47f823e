use std::rc::Rc;

use crate::{ErrorKind, Input, State};

fn at(source: &str, pos: usize) -> State {
    State::new(Input::text(source)).move_by(pos)
}

#[test]
fn syntax_error_quotes_label() {
    let error = at("ac", 1).new_syntax_error("b");

    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.message(), "expected \"b\"");
    assert_eq!(error.to_string(), "expected \"b\" [1:2] a▶c");
}

#[test]
fn semantic_error_keeps_message() {
    let error = at("12x", 2).new_semantic_error("number too large");

    assert_eq!(error.kind(), ErrorKind::Semantic);
    assert_eq!(error.message(), "number too large");
    assert_eq!(error.to_string(), "number too large [1:3] 12▶x");
}

#[test]
fn claim_keeps_first_owner() {
    let mut error = at("x", 0).new_syntax_error("y");
    assert_eq!(error.owner(), None);

    error.claim(4);
    error.claim(1);

    assert_eq!(error.owner(), Some(4));
}

#[test]
fn save_replaces_previous_data() {
    let mut error = at("x", 0).new_syntax_error("y");
    error.save(2, Rc::new(10_u32));
    error.save(5, Rc::new("outer"));
    error.save(2, Rc::new(20_u32));

    let inner = error.saved(2).and_then(|d| d.downcast_ref::<u32>());
    assert_eq!(inner, Some(&20));
    assert_eq!(error.saved_entries().map(|(id, _)| id).collect::<Vec<_>>(), [2, 5]);
    assert!(error.saved(3).is_none());
}

#[test]
fn take_saved_empties_the_error() {
    let mut error = at("x", 0).new_syntax_error("y");
    error.save(3, Rc::new('c'));

    let taken = error.take_saved();

    assert_eq!(taken.len(), 1);
    assert_eq!(taken[0].0, 3);
    assert_eq!(error.saved_entries().count(), 0);
}

#[test]
fn debug_lists_saved_owners_only() {
    let mut error = at("x", 0).new_syntax_error("y");
    error.claim(1);
    error.save(7, Rc::new(vec![1, 2, 3]));

    let debug = format!("{error:?}");
    assert!(debug.contains("owner: Some(1)"));
    assert!(debug.contains("saved: [7]"));
}
