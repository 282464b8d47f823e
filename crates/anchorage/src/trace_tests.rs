use crate::{
    Input, LogTracer, NoopTracer, Parser, PrintTracer, char, delimited, digit1, many0, map3,
    prepare, safe_spot,
};

fn abc() -> Parser<String> {
    map3(
        safe_spot(char('a')),
        safe_spot(char('b')),
        safe_spot(char('c')),
        |a, b, c| format!("{a}{b}{c}"),
    )
}

fn bracketed_list() -> Parser<Vec<String>> {
    many0(delimited(
        safe_spot(char('[')),
        digit1(),
        safe_spot(char(']')),
    ))
}

#[test]
fn print_tracer_follows_recovery() {
    let mut tracer = PrintTracer::new();

    let (output, _) = prepare(&abc()).run_with(Input::text("ac"), &mut tracer);

    assert_eq!(output, "a\0c");
    insta::assert_snapshot!(tracer.dump(), @r#"
    error   #2 @1 expected "b"
    waste   #2 b @1 = -
    waste   #1 a @1 = -
    waste   #3 c @1 = 0
    anchor  #3 c @1
    resume  #0 map3 [2]
    "#);
}

#[test]
fn print_tracer_reports_give_up() {
    let mut tracer = PrintTracer::new();

    prepare(&abc()).run_with(Input::text("ac").with_max_errors(1), &mut tracer);

    assert_eq!(tracer.lines(), ["error   #2 @1 expected \"b\"", "give up @1"]);
}

#[test]
fn waste_cache_hits_are_marked() {
    let mut tracer = PrintTracer::new();

    let (output, errors) =
        prepare(&bracketed_list()).run_with(Input::text("[1][x][y]"), &mut tracer);

    assert_eq!(output, ["1", "", ""]);
    assert_eq!(errors.positions(), [4, 7]);
    assert!(tracer.lines().contains(&"waste   #3 digit @4 = -".to_string()));
    assert!(tracer.lines().contains(&"waste   #3 digit @7 = - (cached)".to_string()));
}

#[test]
fn waste_cache_is_per_run() {
    let prepared = prepare(&bracketed_list());
    prepared.run(Input::text("[1][x][y]"));

    let mut tracer = PrintTracer::new();
    prepared.run_with(Input::text("[1][x][y]"), &mut tracer);

    let first_waste = tracer.lines().iter().find(|line| line.starts_with("waste"));
    assert_eq!(first_waste.map(String::as_str), Some("waste   #3 digit @4 = -"));
}

#[test]
fn tracers_do_not_change_the_outcome() {
    let prepared = prepare(&abc());

    let (plain, plain_errors) = prepared.run(Input::text("xbc"));
    let (noop, noop_errors) = prepared.run_with(Input::text("xbc"), &mut NoopTracer);
    let (logged, logged_errors) = prepared.run_with(Input::text("xbc"), &mut LogTracer);

    assert_eq!(plain, noop);
    assert_eq!(plain, logged);
    assert_eq!(plain_errors.to_string(), noop_errors.to_string());
    assert_eq!(plain_errors.to_string(), logged_errors.to_string());
}
