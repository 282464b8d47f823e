//! Branch parsers: composition through one continuation function.
//!
//! The continuation runs in two shapes. `Step::Descend` is the normal
//! top-down call. `Step::Resume` comes from the orchestrator after it
//! re-parsed one of the children at a recovery anchor: the branch splices
//! that result in and carries on with the remaining children, or forwards the
//! child's error if the child still failed.

use std::any::Any;
use std::rc::Rc;

use anchorage_core::{ParserError, ParserId, Saved, State};

use crate::invariants;
use crate::parser::{AnyParser, Cx, Node, Output, ParseResult, Parser, Shape};

pub enum Step {
    /// Fresh descent from this state.
    Descend(State),
    /// A child's corrected (or still failing) result.
    Resume(Resume),
}

pub struct Resume {
    /// Position of the child among the branch's children.
    pub index: usize,
    pub child: ParseResult<Output>,
    /// What this branch saved in the error that triggered recovery, if anything.
    pub saved: Option<Saved>,
}

impl Resume {
    /// Takes the saved partial output, if it has type `P`.
    pub fn take_saved<P: Clone + 'static>(&mut self) -> Option<P> {
        let saved = self.saved.take()?;
        saved.downcast::<P>().ok().map(Rc::unwrap_or_clone)
    }
}

/// What a continuation can see of its own node.
pub struct BranchCtx<'a> {
    id: ParserId,
    cx: &'a Cx<'a>,
    children: &'a [AnyParser],
}

impl<'a> BranchCtx<'a> {
    pub fn id(&self) -> ParserId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_label(&self, index: usize) -> Rc<str> {
        self.children[index].label()
    }

    /// Runs child `index` with its output left erased.
    pub fn parse(&self, index: usize, state: &State) -> ParseResult<Output> {
        self.cx.parse(self.cx.child(self.id, index), state)
    }

    /// Runs child `index`, restoring its output type.
    pub fn parse_as<U: 'static>(&self, index: usize, state: &State) -> ParseResult<U> {
        self.parse(index, state).downcast()
    }

    /// Attaches partial output to a propagating error, for use on resume.
    pub fn save(&self, error: &mut ParserError, data: impl Any) {
        error.save(self.id, Rc::new(data));
    }
}

type Continuation<T> = dyn Fn(&BranchCtx<'_>, Step) -> ParseResult<T>;

struct BranchNode<T> {
    label: Rc<str>,
    children: Vec<AnyParser>,
    continuation: Box<Continuation<T>>,
}

impl<T: 'static> BranchNode<T> {
    fn call(&self, cx: &Cx<'_>, id: ParserId, step: Step) -> ParseResult<Output> {
        let ctx = BranchCtx {
            id,
            cx,
            children: &self.children,
        };
        let mut result = (self.continuation)(&ctx, step);
        if let Some(error) = &mut result.error {
            error.claim(ctx.id);
        }
        result.erase()
    }
}

impl<T: 'static> Node for BranchNode<T> {
    fn label(&self) -> Rc<str> {
        self.label.clone()
    }

    fn shape(&self) -> Shape {
        Shape::Branch {
            children: self.children.clone(),
        }
    }

    fn parse(&self, cx: &Cx<'_>, id: ParserId, state: &State) -> ParseResult<Output> {
        self.call(cx, id, Step::Descend(state.clone()))
    }

    fn resume(&self, cx: &Cx<'_>, id: ParserId, resume: Resume) -> ParseResult<Output> {
        self.call(cx, id, Step::Resume(resume))
    }

    fn to_safe_spot(&self) -> Rc<dyn Node> {
        invariants::safe_spot_over_branch(&self.label)
    }
}

/// Builds a branch parser from its children and continuation.
///
/// Errors leaving the continuation without an owner are claimed by the
/// branch. Panics if `children` is empty.
pub fn branch<T, F>(label: impl Into<Rc<str>>, children: Vec<AnyParser>, continuation: F) -> Parser<T>
where
    T: 'static,
    F: Fn(&BranchCtx<'_>, Step) -> ParseResult<T> + 'static,
{
    let label = label.into();
    invariants::ensure_children(&label, &children);
    Parser::from_node(Rc::new(BranchNode {
        label,
        children,
        continuation: Box::new(continuation),
    }))
}
