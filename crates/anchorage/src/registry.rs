//! One-time walk over a parser tree.
//!
//! Assigns identifiers in pre-order (root is 0), records each occurrence's
//! parent and child index, and buckets safe spots by recoverer kind. A node
//! used in several places is registered once per place. Only a node reached
//! again below itself, through a lazy or recursive cell, reuses the
//! identifier of that enclosing occurrence and is not walked again, which is
//! what makes recursive grammars finite.

use std::collections::HashMap;
use std::rc::Rc;

use anchorage_core::ParserId;
use indexmap::{IndexMap, IndexSet};

use crate::parser::{AnyParser, Node, Shape, node_key, resolve};
use crate::recover::{FastRecoverer, Recoverer};

pub(crate) struct Entry {
    pub node: Rc<dyn Node>,
    pub label: Rc<str>,
    /// Parent identifier and this node's index among its children.
    pub parent: Option<(ParserId, usize)>,
    /// Identifiers of the children, by index. Empty for leaves.
    pub children: Vec<ParserId>,
    /// Effective recoverer of a leaf, if it has one.
    pub recoverer: Option<Recoverer>,
}

#[derive(Default)]
pub(crate) struct Registry {
    entries: Vec<Entry>,
    /// Branches on the path currently being walked, by node address.
    walking: HashMap<usize, ParserId>,
    /// Safe spots with a closed-form recoverer, in registration order.
    fast: IndexMap<ParserId, FastRecoverer>,
    /// Safe spots probed one unit at a time, in registration order.
    step: IndexSet<ParserId>,
}

impl Registry {
    pub(crate) fn build(root: &AnyParser) -> Self {
        let mut registry = Self::default();
        registry.register(root.node.clone(), None);
        registry
    }

    fn register(&mut self, node: Rc<dyn Node>, parent: Option<(ParserId, usize)>) -> ParserId {
        let node = resolve(node);
        let key = node_key(&*node);
        if let Some(&id) = self.walking.get(&key) {
            return id;
        }

        let id = self.entries.len() as ParserId;
        let label = node.label();
        let shape = node.shape();
        let recoverer = match &shape {
            Shape::Leaf { recoverer, .. } => recoverer.clone(),
            Shape::Branch { .. } => None,
            Shape::Forward { .. } => unreachable!("resolve follows forwarding nodes"),
        };
        self.entries.push(Entry {
            node,
            label,
            parent,
            children: Vec::new(),
            recoverer,
        });

        match shape {
            Shape::Leaf {
                recoverer,
                safe_spot: true,
            } => match recoverer {
                Some(Recoverer::Fast(f)) => {
                    self.fast.insert(id, f);
                }
                Some(Recoverer::Step) | None => {
                    self.step.insert(id);
                }
            },
            Shape::Leaf { .. } | Shape::Forward { .. } => {}
            Shape::Branch { children } => {
                self.walking.insert(key, id);
                let mut ids = Vec::with_capacity(children.len());
                for (index, child) in children.iter().enumerate() {
                    ids.push(self.register(child.node.clone(), Some((id, index))));
                }
                self.walking.remove(&key);
                self.entries[id as usize].children = ids;
            }
        }
        id
    }

    pub(crate) fn entry(&self, id: ParserId) -> &Entry {
        &self.entries[id as usize]
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn parent(&self, id: ParserId) -> Option<(ParserId, usize)> {
        self.entry(id).parent
    }

    /// True if `id` is `ancestor` or lies below it.
    pub(crate) fn is_within(&self, id: ParserId, ancestor: ParserId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node).map(|(parent, _)| parent);
        }
        false
    }

    pub(crate) fn fast(&self) -> impl Iterator<Item = (ParserId, &FastRecoverer)> {
        self.fast.iter().map(|(&id, f)| (id, f))
    }

    pub(crate) fn step(&self) -> impl Iterator<Item = ParserId> {
        self.step.iter().copied()
    }

    pub(crate) fn fast_count(&self) -> usize {
        self.fast.len()
    }

    pub(crate) fn step_count(&self) -> usize {
        self.step.len()
    }
}
