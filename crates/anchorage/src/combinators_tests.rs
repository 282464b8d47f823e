use crate::{
    Input, char, delimited, digit1, first_success, literal, many0, map, map2, prepare, preceded,
    safe_spot, sequence, terminated, try_map,
};

#[test]
fn map_transforms_output() {
    let upper = map(char('a'), |c| c.to_ascii_uppercase());

    let (output, errors) = prepare(&upper).run(Input::text("a"));

    assert_eq!(output, 'A');
    assert!(errors.is_empty());
}

#[test]
fn try_map_rejects_with_semantic_error() {
    let byte = try_map(digit1(), |digits: String| {
        digits.parse::<u8>().map_err(|_| "number too large")
    });
    let prepared = prepare(&byte);

    assert_eq!(prepared.run(Input::text("200")).0, 200);

    let (output, errors) = prepared.run(Input::text("300"));
    assert_eq!(output, 0);
    assert_eq!(errors.semantic_count(), 1);
    assert_eq!(errors.to_string(), "number too large [1:1] ▶300");
}

#[test]
fn sequence_hands_slots_to_finish() {
    let pair = sequence(
        "pair",
        vec![char('a').erase(), digit1().erase()],
        |mut slots| (slots.take::<char>(0), slots.take::<String>(1)),
    );

    let (output, errors) = prepare(&pair).run(Input::text("a42"));

    assert_eq!(output, ('a', "42".to_string()));
    assert!(errors.is_empty());
    assert_eq!(&*pair.label(), "pair");
}

#[test]
fn preceded_terminated_delimited_keep_the_middle() {
    let input = || Input::text("<7>");

    let (pre, _) = prepare(&preceded(char('<'), digit1())).run(input());
    let (term, _) = prepare(&terminated(preceded(char('<'), digit1()), char('>'))).run(input());
    let (delim, errors) = prepare(&delimited(char('<'), digit1(), char('>'))).run(input());

    assert_eq!(pre, "7");
    assert_eq!(term, "7");
    assert_eq!(delim, "7");
    assert!(errors.is_empty());
}

#[test]
fn many0_stops_at_first_uncommitted_failure() {
    let (output, errors) = prepare(&many0(char('a'))).run(Input::text("aab"));

    assert_eq!(output, ['a', 'a']);
    assert!(errors.is_empty());
}

#[test]
fn many0_matches_nothing() {
    let (output, errors) = prepare(&many0(char('a'))).run(Input::text(""));

    assert!(output.is_empty());
    assert!(errors.is_empty());
}

#[test]
fn first_success_takes_first_match() {
    let keyword = first_success(vec![literal("ab"), literal("a")]);
    let prepared = prepare(&keyword);

    assert_eq!(prepared.run(Input::text("ab")).0, "ab");
    assert_eq!(prepared.run(Input::text("a")).0, "a");
}

#[test]
fn first_success_expects_every_alternative() {
    let keyword = first_success(vec![literal("ab"), literal("a")]);

    let (output, errors) = prepare(&keyword).run(Input::text("x"));

    assert_eq!(output, "");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.as_slice()[0].owner(), Some(0));
    assert_eq!(errors.to_string(), "expected \"ab or a\" [1:1] ▶x");
}

#[test]
fn first_success_commits_after_safe_spot() {
    let committed = first_success(vec![
        map2(safe_spot(char('a')), char('b'), |a, b| format!("{a}{b}")),
        literal("ac"),
    ]);

    let (output, errors) = prepare(&committed).run(Input::text("ac"));

    assert_eq!(output, "a\0");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.as_slice()[0].message(), "expected \"b\"");
}

#[test]
fn first_success_backtracks_without_safe_spot() {
    let open = first_success(vec![
        map2(char('a'), char('b'), |a, b| format!("{a}{b}")),
        literal("ac"),
    ]);

    let (output, errors) = prepare(&open).run(Input::text("ac"));

    assert_eq!(output, "ac");
    assert!(errors.is_empty());
}

#[test]
#[should_panic(expected = "parser output is not a")]
fn slot_of_another_type_panics() {
    let pair = sequence("pair", vec![char('a').erase()], |mut slots| {
        slots.take::<String>(0)
    });

    prepare(&pair).run(Input::text("a"));
}
