//! Branch combinators built on the continuation protocol.
//!
//! Sequences share one driver: child outputs go into erased slots, a failing
//! child's error carries the slots filled so far, and a resume picks up from
//! the corrected child. Missing slots read as `Default::default()`.

use std::any::Any;
use std::fmt::Display;
use std::rc::Rc;

use anchorage_core::State;

use crate::branch::{Step, branch};
use crate::invariants;
use crate::parser::{AnyParser, ParseResult, Parser};

type Slot = Option<Rc<dyn Any>>;

/// Outputs of a sequence's children, by position.
pub struct Slots(Vec<Slot>);

impl Slots {
    /// Output of child `index`, or the placeholder if it never produced one.
    ///
    /// Panics if the child produced a value of another type.
    pub fn take<A: Clone + Default + 'static>(&mut self, index: usize) -> A {
        match self.0[index].take() {
            Some(slot) => Rc::unwrap_or_clone(invariants::ensure_slot_type::<A>(slot)),
            None => A::default(),
        }
    }
}

/// What a sequence saves in a propagating error.
#[derive(Clone)]
struct SequencePartial {
    start: State,
    slots: Vec<Slot>,
}

/// Runs `children` in order and combines their outputs with `finish`.
///
/// `finish` also builds the best-effort output of a failed run.
pub fn sequence<T, F>(label: &str, children: Vec<AnyParser>, finish: F) -> Parser<T>
where
    T: 'static,
    F: Fn(Slots) -> T + 'static,
{
    let count = children.len();
    branch(label, children, move |ctx, step| {
        let (start, mut slots, mut state, next) = match step {
            Step::Descend(state) => (state.clone(), vec![None; count], state, 0),
            Step::Resume(mut resume) => {
                let partial = resume.take_saved::<SequencePartial>();
                let child = resume.child;
                let (start, mut slots) = match partial {
                    Some(partial) => (partial.start, partial.slots),
                    None => (child.start.clone(), vec![None; count]),
                };
                slots[resume.index] = Some(Rc::from(child.output));
                if let Some(mut error) = child.error {
                    let partial = SequencePartial {
                        start: start.clone(),
                        slots: slots.clone(),
                    };
                    ctx.save(&mut error, partial);
                    return ParseResult::failure(start, child.end, finish(Slots(slots)), error);
                }
                (start, slots, child.end, resume.index + 1)
            }
        };

        for index in next..count {
            let result = ctx.parse(index, &state);
            slots[index] = Some(Rc::from(result.output));
            state = result.end;
            if let Some(mut error) = result.error {
                let partial = SequencePartial {
                    start: start.clone(),
                    slots: slots.clone(),
                };
                ctx.save(&mut error, partial);
                return ParseResult::failure(start, state, finish(Slots(slots)), error);
            }
        }
        ParseResult::success(start, state, finish(Slots(slots)))
    })
}

pub fn map<A, B, F>(parser: Parser<A>, f: F) -> Parser<B>
where
    A: 'static,
    B: 'static,
    F: Fn(A) -> B + 'static,
{
    branch("map", vec![parser.erase()], move |ctx, step| {
        let child = match step {
            Step::Descend(state) => ctx.parse_as::<A>(0, &state),
            Step::Resume(resume) => resume.child.downcast::<A>(),
        };
        child.map(&f)
    })
}

/// Like [`map`], but `f` may reject the value with a semantic error at the
/// start of the match.
pub fn try_map<A, B, E, F>(parser: Parser<A>, f: F) -> Parser<B>
where
    A: 'static,
    B: Default + 'static,
    E: Display,
    F: Fn(A) -> Result<B, E> + 'static,
{
    branch("try_map", vec![parser.erase()], move |ctx, step| {
        let child = match step {
            Step::Descend(state) => ctx.parse_as::<A>(0, &state),
            Step::Resume(resume) => resume.child.downcast::<A>(),
        };
        if !child.is_ok() {
            return child.map(|output| f(output).unwrap_or_default());
        }
        let ParseResult {
            start, end, output, ..
        } = child;
        match f(output) {
            Ok(output) => ParseResult::success(start, end, output),
            Err(message) => {
                let error = start.new_semantic_error(message.to_string());
                ParseResult::failure(start, end, B::default(), error)
            }
        }
    })
}

pub fn map2<A, B, T, F>(a: Parser<A>, b: Parser<B>, f: F) -> Parser<T>
where
    A: Clone + Default + 'static,
    B: Clone + Default + 'static,
    T: 'static,
    F: Fn(A, B) -> T + 'static,
{
    sequence("map2", vec![a.erase(), b.erase()], move |mut slots| {
        f(slots.take(0), slots.take(1))
    })
}

pub fn map3<A, B, C, T, F>(a: Parser<A>, b: Parser<B>, c: Parser<C>, f: F) -> Parser<T>
where
    A: Clone + Default + 'static,
    B: Clone + Default + 'static,
    C: Clone + Default + 'static,
    T: 'static,
    F: Fn(A, B, C) -> T + 'static,
{
    sequence(
        "map3",
        vec![a.erase(), b.erase(), c.erase()],
        move |mut slots| f(slots.take(0), slots.take(1), slots.take(2)),
    )
}

/// Matches `prefix` then `parser`, keeping the output of `parser`.
pub fn preceded<P, T>(prefix: Parser<P>, parser: Parser<T>) -> Parser<T>
where
    T: Clone + Default + 'static,
{
    sequence("preceded", vec![prefix.erase(), parser.erase()], |mut slots| {
        slots.take(1)
    })
}

/// Matches `parser` then `suffix`, keeping the output of `parser`.
pub fn terminated<T, S>(parser: Parser<T>, suffix: Parser<S>) -> Parser<T>
where
    T: Clone + Default + 'static,
{
    sequence("terminated", vec![parser.erase(), suffix.erase()], |mut slots| {
        slots.take(0)
    })
}

pub fn delimited<O, T, C>(open: Parser<O>, parser: Parser<T>, close: Parser<C>) -> Parser<T>
where
    T: Clone + Default + 'static,
{
    sequence(
        "delimited",
        vec![open.erase(), parser.erase(), close.erase()],
        |mut slots| slots.take(1),
    )
}

#[derive(Clone)]
struct Repeated<A> {
    start: State,
    items: Vec<A>,
}

/// Repeats `parser` until it fails.
///
/// A failure that crossed a safe spot is a committed element and
/// propagates; any other failure ends the repetition. A match that consumed
/// nothing is an error, never an endless loop.
pub fn many0<A>(parser: Parser<A>) -> Parser<Vec<A>>
where
    A: Clone + 'static,
{
    branch("many0", vec![parser.erase()], |ctx, step| {
        let (start, mut items, mut state) = match step {
            Step::Descend(state) => (state.clone(), Vec::new(), state),
            Step::Resume(mut resume) => {
                let saved = resume.take_saved::<Repeated<A>>();
                let child = resume.child.downcast::<A>();
                let (start, mut items) = match saved {
                    Some(saved) => (saved.start, saved.items),
                    None => (child.start.clone(), Vec::new()),
                };
                items.push(child.output);
                if let Some(mut error) = child.error {
                    let partial = Repeated {
                        start: start.clone(),
                        items: items.clone(),
                    };
                    ctx.save(&mut error, partial);
                    return ParseResult::failure(start, child.end, items, error);
                }
                (start, items, child.end)
            }
        };

        loop {
            let result = ctx.parse_as::<A>(0, &state);
            if let Some(mut error) = result.error {
                if !result.end.crossed_safe_spot_since(&state) {
                    return ParseResult::success(start, state, items);
                }
                let partial = Repeated {
                    start: start.clone(),
                    items: items.clone(),
                };
                ctx.save(&mut error, partial);
                return ParseResult::failure(start, result.end, items, error);
            }
            if result.end.position() == state.position() {
                let error = state.new_semantic_error("repeated parser consumed no input");
                return ParseResult::failure(start, state, items, error);
            }
            items.push(result.output);
            state = result.end;
        }
    })
}

/// Tries `parsers` in order and returns the first success.
///
/// An alternative that failed after crossing a safe spot is committed: its
/// error is returned without trying the rest. When all fail, the error
/// expects any of the alternatives' labels.
pub fn first_success<T>(parsers: Vec<Parser<T>>) -> Parser<T>
where
    T: Default + 'static,
{
    let children = parsers.iter().map(Parser::erase).collect();
    branch("first_success", children, |ctx, step| {
        let state = match step {
            Step::Descend(state) => state,
            Step::Resume(resume) => return resume.child.downcast::<T>(),
        };
        for index in 0..ctx.len() {
            let result = ctx.parse_as::<T>(index, &state);
            if result.is_ok() || result.end.crossed_safe_spot_since(&state) {
                return result;
            }
        }
        let labels: Vec<_> = (0..ctx.len()).map(|index| ctx.child_label(index)).collect();
        let error = state.new_syntax_error(&labels.join(" or "));
        ParseResult::failure(state.clone(), state, T::default(), error)
    })
}
