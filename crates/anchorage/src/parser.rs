//! Parser nodes and the typed handle around them.
//!
//! The engine walks a tree of `dyn Node` values whose outputs are erased to
//! `Box<dyn Any>`. `Parser<T>` restores the output type at the API boundary;
//! nothing inside the traversal needs to know it.

use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;

use anchorage_core::{ParserError, ParserId, State};

use crate::branch::Resume;
use crate::invariants;
use crate::recover::Recoverer;
use crate::registry::Registry;

/// Type-erased parser output.
pub type Output = Box<dyn Any>;

/// Outcome of a single parser invocation.
///
/// A failed result still carries output: a placeholder for leaves, the
/// best-effort partial value for branches.
pub struct ParseResult<T> {
    pub start: State,
    pub end: State,
    pub output: T,
    pub error: Option<ParserError>,
}

impl<T> ParseResult<T> {
    pub fn success(start: State, end: State, output: T) -> Self {
        Self {
            start,
            end,
            output,
            error: None,
        }
    }

    pub fn failure(start: State, end: State, output: T, error: ParserError) -> Self {
        Self {
            start,
            end,
            output,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        ParseResult {
            start: self.start,
            end: self.end,
            output: f(self.output),
            error: self.error,
        }
    }
}

impl<T: 'static> ParseResult<T> {
    pub fn erase(self) -> ParseResult<Output> {
        self.map(|output| Box::new(output) as Output)
    }
}

impl ParseResult<Output> {
    /// Restores the output type. A mismatch is a construction defect.
    pub fn downcast<T: 'static>(self) -> ParseResult<T> {
        self.map(|output| invariants::ensure_output_type::<T>(output))
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ParseResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseResult")
            .field("start", &self.start.position())
            .field("end", &self.end.position())
            .field("output", &self.output)
            .field("error", &self.error)
            .finish()
    }
}

/// Structural view of a node, read once when a tree is prepared.
pub(crate) enum Shape {
    Leaf {
        recoverer: Option<Recoverer>,
        safe_spot: bool,
    },
    Branch {
        children: Vec<AnyParser>,
    },
    /// Transparent node standing in for its target (lazy and recursive cells).
    Forward { target: Rc<dyn Node> },
}

/// Access to the prepared tree during one run.
///
/// Identifiers live in the registry, not in the nodes: a node used in
/// several places gets one identifier per occurrence, and the caller of
/// `parse` passes the one it stands for.
pub(crate) struct Cx<'r> {
    registry: &'r Registry,
}

impl<'r> Cx<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Runs the node registered as `id`.
    pub(crate) fn parse(&self, id: ParserId, state: &State) -> ParseResult<Output> {
        self.registry.entry(id).node.parse(self, id, state)
    }

    /// Identifier of child `index` of branch `parent`.
    pub(crate) fn child(&self, parent: ParserId, index: usize) -> ParserId {
        self.registry.entry(parent).children[index]
    }
}

/// Address of the node value; identical for a node and every `Rc` pointing at it.
pub(crate) fn node_key<N: ?Sized>(node: &N) -> usize {
    (node as *const N).cast::<()>() as usize
}

pub(crate) trait Node {
    fn label(&self) -> Rc<str>;

    fn shape(&self) -> Shape;

    /// Parses from `state` as the occurrence registered under `id`.
    fn parse(&self, cx: &Cx<'_>, id: ParserId, state: &State) -> ParseResult<Output>;

    /// Continues after a child was re-parsed by the orchestrator.
    fn resume(&self, cx: &Cx<'_>, id: ParserId, resume: Resume) -> ParseResult<Output>;

    /// A copy of this node marked as a safe spot. Only consuming leaves qualify.
    fn to_safe_spot(&self) -> Rc<dyn Node>;
}

/// A parser producing `T`.
///
/// Cloning shares the underlying node.
pub struct Parser<T> {
    pub(crate) node: Rc<dyn Node>,
    _output: PhantomData<fn() -> T>,
}

/// A parser with its output type erased, as stored among branch children.
#[derive(Clone)]
pub struct AnyParser {
    pub(crate) node: Rc<dyn Node>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<T> Parser<T> {
    pub(crate) fn from_node(node: Rc<dyn Node>) -> Self {
        Self {
            node,
            _output: PhantomData,
        }
    }

    pub fn label(&self) -> Rc<str> {
        self.node.label()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(resolve(self.node.clone()).shape(), Shape::Leaf { .. })
    }

    pub fn is_safe_spot(&self) -> bool {
        matches!(
            resolve(self.node.clone()).shape(),
            Shape::Leaf {
                safe_spot: true,
                ..
            }
        )
    }

    pub fn erase(&self) -> AnyParser {
        AnyParser {
            node: self.node.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Parser").field(&self.label()).finish()
    }
}

impl AnyParser {
    pub fn label(&self) -> Rc<str> {
        self.node.label()
    }
}

impl std::fmt::Debug for AnyParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AnyParser").field(&self.label()).finish()
    }
}

impl<T> From<&Parser<T>> for AnyParser {
    fn from(parser: &Parser<T>) -> Self {
        parser.erase()
    }
}

/// Follows forwarding nodes to the node that does the work.
pub(crate) fn resolve(mut node: Rc<dyn Node>) -> Rc<dyn Node> {
    while let Shape::Forward { target } = node.shape() {
        node = target;
    }
    node
}
