//! Deferred parsers for recursive grammars.
//!
//! Both flavours are forwarding nodes: the registry and every caller see
//! straight through them to the parser they stand for.

use std::any::TypeId;
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use anchorage_core::{ParserId, State};

use crate::branch::Resume;
use crate::invariants;
use crate::parser::{Cx, Node, Output, ParseResult, Parser, Shape};

thread_local! {
    /// Grammars built by capture-free factories, one per factory type.
    static SHARED: RefCell<HashMap<TypeId, Rc<dyn Node>>> = RefCell::new(HashMap::new());
}

type Factory = Box<dyn FnOnce() -> Rc<dyn Node>>;
type Definition = OnceCell<Rc<dyn Node>>;

enum Deferred {
    Lazy {
        factory: RefCell<Option<Factory>>,
        built: Definition,
    },
    /// The parser returned by `recursive`; keeps the definition alive.
    Defined(Rc<Definition>),
    /// The handle handed to the definition itself.
    SelfRef(Weak<Definition>),
}

impl Deferred {
    fn target(&self) -> Rc<dyn Node> {
        match self {
            Self::Lazy { factory, built } => {
                if let Some(node) = built.get() {
                    return node.clone();
                }
                let factory = factory.borrow_mut().take();
                let node = match factory {
                    Some(factory) => factory(),
                    None => invariants::lazy_reentered(),
                };
                built.get_or_init(|| node).clone()
            }
            Self::Defined(cell) => match cell.get() {
                Some(node) => node.clone(),
                None => invariants::recursive_undefined(),
            },
            Self::SelfRef(cell) => match cell.upgrade().and_then(|cell| cell.get().cloned()) {
                Some(node) => node,
                None => invariants::recursive_undefined(),
            },
        }
    }
}

impl Node for Deferred {
    fn label(&self) -> Rc<str> {
        self.target().label()
    }

    fn shape(&self) -> Shape {
        Shape::Forward {
            target: self.target(),
        }
    }

    fn parse(&self, cx: &Cx<'_>, id: ParserId, state: &State) -> ParseResult<Output> {
        self.target().parse(cx, id, state)
    }

    fn resume(&self, cx: &Cx<'_>, id: ParserId, resume: Resume) -> ParseResult<Output> {
        self.target().resume(cx, id, resume)
    }

    fn to_safe_spot(&self) -> Rc<dyn Node> {
        self.target().to_safe_spot()
    }
}

/// Defers building a parser until it is first needed, then keeps it.
///
/// A factory that captures nothing (a plain `fn`, typically the grammar
/// rule referring to itself) is built once per thread and shared by every
/// `lazy` call naming it, so self-referencing rules stay finite.
pub fn lazy<T, F>(factory: F) -> Parser<T>
where
    T: 'static,
    F: Fn() -> Parser<T> + 'static,
{
    let build: Factory = if size_of::<F>() == 0 {
        Box::new(move || shared(factory))
    } else {
        Box::new(move || factory().node)
    };
    Parser::from_node(Rc::new(Deferred::Lazy {
        factory: RefCell::new(Some(build)),
        built: OnceCell::new(),
    }))
}

fn shared<T, F>(factory: F) -> Rc<dyn Node>
where
    T: 'static,
    F: Fn() -> Parser<T> + 'static,
{
    let key = TypeId::of::<F>();
    if let Some(node) = SHARED.with_borrow(|shared| shared.get(&key).cloned()) {
        return node;
    }
    let node = factory().node;
    SHARED.with_borrow_mut(|shared| shared.entry(key).or_insert(node).clone())
}

/// Builds a parser that refers to itself.
///
/// `define` receives a handle to the parser being defined; the handle may be
/// embedded anywhere in the result but not returned as the result itself.
pub fn recursive<T, F>(define: F) -> Parser<T>
where
    T: 'static,
    F: FnOnce(Parser<T>) -> Parser<T>,
{
    let cell = Rc::new(Definition::new());
    let handle: Rc<dyn Node> = Rc::new(Deferred::SelfRef(Rc::downgrade(&cell)));
    let handle_key = Rc::as_ptr(&handle).cast::<()>();
    let defined = define(Parser::from_node(handle));
    if Rc::as_ptr(&defined.node).cast::<()>() == handle_key {
        invariants::recursive_is_self();
    }
    let _ = cell.set(defined.node);
    Parser::from_node(Rc::new(Deferred::Defined(cell)))
}
