use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    Input, Output, ParseResult, Resume, Saved, State, Step, branch, char, prepare, safe_spot,
};

#[test]
#[should_panic(expected = "has no children")]
fn branch_without_children_panics() {
    branch::<(), _>("empty", Vec::new(), |_, _| unreachable!());
}

#[test]
fn branch_claims_unattributed_errors() {
    let checked = branch("checked", vec![char('a').erase()], |ctx, step| {
        let Step::Descend(state) = step else {
            unreachable!("no anchors to resume from")
        };
        let child = ctx.parse_as::<char>(0, &state);
        let error = state.new_semantic_error("rejected");
        ParseResult::failure(child.start, child.end, child.output, error)
    });

    let (_, errors) = prepare(&checked).run(Input::text("a"));

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.as_slice()[0].owner(), Some(0));
    assert_eq!(errors.as_slice()[0].message(), "rejected");
}

#[test]
fn leaf_errors_keep_their_owner() {
    let pair = branch(
        "pair",
        vec![char('a').erase(), char('b').erase()],
        |ctx, step| {
            let Step::Descend(state) = step else {
                unreachable!("no anchors to resume from")
            };
            let first = ctx.parse_as::<char>(0, &state);
            ctx.parse_as::<char>(1, &first.end)
        },
    );

    let (_, errors) = prepare(&pair).run(Input::text("ax"));

    assert_eq!(errors.as_slice()[0].owner(), Some(2));
}

#[test]
fn continuation_sees_descend_then_resume() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let seen = log.clone();
    let pair = branch(
        "pair",
        vec![safe_spot(char('a')).erase(), safe_spot(char('b')).erase()],
        move |ctx, step| match step {
            Step::Descend(state) => {
                seen.borrow_mut().push(format!("descend@{}", state.position()));
                let first = ctx.parse_as::<char>(0, &state);
                if !first.is_ok() {
                    return first.map(|a| (a, '\0'));
                }
                let second = ctx.parse_as::<char>(1, &first.end);
                let mut error = second.error;
                if let Some(error) = &mut error {
                    ctx.save(error, first.output);
                }
                ParseResult {
                    start: state,
                    end: second.end,
                    output: (first.output, second.output),
                    error,
                }
            }
            Step::Resume(mut resume) => {
                seen.borrow_mut().push(format!(
                    "resume[{}]@{}",
                    resume.index,
                    resume.child.start.position()
                ));
                let a = resume.take_saved::<char>().unwrap_or_default();
                resume.child.downcast::<char>().map(|b| (a, b))
            }
        },
    );

    let (output, errors) = prepare(&pair).run(Input::text("axb"));

    assert_eq!(output, ('a', 'b'));
    assert_eq!(errors.positions(), [1]);
    assert_eq!(*log.borrow(), ["descend@0", "resume[1]@2"]);
}

fn resume_with(saved: Option<Saved>) -> Resume {
    let state = State::new(Input::text("x"));
    Resume {
        index: 0,
        child: ParseResult::success(state.clone(), state.move_by(1), Box::new('x') as Output),
        saved,
    }
}

#[test]
fn take_saved_restores_type() {
    let mut resume = resume_with(Some(Rc::new(5_u32) as Saved));

    assert_eq!(resume.take_saved::<u32>(), Some(5));
    assert_eq!(resume.take_saved::<u32>(), None);
}

#[test]
fn take_saved_of_other_type_is_none() {
    let mut resume = resume_with(Some(Rc::new(5_u32) as Saved));

    assert_eq!(resume.take_saved::<String>(), None);
}
