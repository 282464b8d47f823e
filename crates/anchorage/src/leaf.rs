//! Leaf parsers and safe spots.

use std::rc::Rc;

use anchorage_core::{Input, ParserError, ParserId, State};

use crate::branch::Resume;
use crate::invariants;
use crate::parser::{Cx, Node, Output, ParseResult, Parser, Shape};
use crate::recover::{Recoverer, Waste};

type ParseFn<T> = dyn Fn(&State) -> Result<(State, T), ParserError>;

struct LeafNode<T> {
    label: Rc<str>,
    run: Rc<ParseFn<T>>,
    recoverer: Option<Recoverer>,
    safe_spot: bool,
}

impl<T: Default + 'static> Node for LeafNode<T> {
    fn label(&self) -> Rc<str> {
        self.label.clone()
    }

    fn shape(&self) -> Shape {
        let recoverer = match (&self.recoverer, self.safe_spot) {
            (Some(recoverer), _) => Some(recoverer.clone()),
            (None, true) => Some(Recoverer::Step),
            (None, false) => None,
        };
        Shape::Leaf {
            recoverer,
            safe_spot: self.safe_spot,
        }
    }

    fn parse(&self, _cx: &Cx<'_>, id: ParserId, state: &State) -> ParseResult<Output> {
        let result = match (self.run)(state) {
            Ok((end, output)) if self.safe_spot => {
                ParseResult::success(state.clone(), end.mark_safe_spot(), output)
            }
            Ok((end, output)) => ParseResult::success(state.clone(), end, output),
            Err(mut error) => {
                error.claim(id);
                ParseResult::failure(state.clone(), state.clone(), T::default(), error)
            }
        };
        result.erase()
    }

    fn resume(&self, _cx: &Cx<'_>, _id: ParserId, _resume: Resume) -> ParseResult<Output> {
        invariants::leaf_resumed(&self.label)
    }

    fn to_safe_spot(&self) -> Rc<dyn Node> {
        let empty = State::new(Input::text(""));
        if let Some(Recoverer::Fast(recover)) = &self.recoverer
            && recover(&empty) == Waste::Never
        {
            invariants::safe_spot_never(&self.label);
        }
        if (self.run)(&empty).is_ok() {
            invariants::safe_spot_accepts_empty(&self.label);
        }
        Rc::new(LeafNode {
            label: self.label.clone(),
            run: self.run.clone(),
            recoverer: self.recoverer.clone(),
            safe_spot: true,
        })
    }
}

/// Builds a leaf parser.
///
/// `run` returns the state after the match and the output, or the error at
/// the failing position. A failed leaf outputs `T::default()`.
/// Without an explicit recoverer the leaf can only anchor recovery as a
/// safe spot, probed step by step.
pub fn leaf<T, F>(label: impl Into<Rc<str>>, run: F, recoverer: Option<Recoverer>) -> Parser<T>
where
    T: Default + 'static,
    F: Fn(&State) -> Result<(State, T), ParserError> + 'static,
{
    Parser::from_node(Rc::new(LeafNode {
        label: label.into(),
        run: Rc::new(run),
        recoverer,
        safe_spot: false,
    }))
}

/// Promotes a consuming leaf to a recovery anchor.
///
/// On success the anchor raises the safe-spot watermark. Panics if `parser`
/// is a branch, if its recoverer is [`Recoverer::never`], or if it matches
/// empty input.
pub fn safe_spot<T>(parser: Parser<T>) -> Parser<T> {
    Parser::from_node(parser.node.to_safe_spot())
}
