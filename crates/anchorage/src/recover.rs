//! Recoverers and the per-run waste cache.
//!
//! A recoverer answers one question for its anchor: how many input units
//! must be skipped from a failing state before the anchor parses again.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use anchorage_core::{ParserId, State};

/// Units a recoverer proposes to skip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waste {
    /// Skipping this many units (scalars for text, bytes for binary) lets the anchor parse.
    Units(usize),
    /// The anchor can't match anywhere in the remaining input.
    TooMuch,
    /// The parser can never serve as an anchor (it may match empty input).
    Never,
}

/// Closed-form waste estimate.
pub type FastRecoverer = Rc<dyn Fn(&State) -> Waste>;

#[derive(Clone)]
pub enum Recoverer {
    /// Computes the waste directly, usually by searching for a delimiter.
    Fast(FastRecoverer),
    /// No closed form: the engine re-attempts the leaf one unit further each time.
    Step,
}

impl Recoverer {
    pub fn fast(f: impl Fn(&State) -> Waste + 'static) -> Self {
        Self::Fast(Rc::new(f))
    }

    /// Recoverer of parsers that may match without consuming input.
    pub fn never() -> Self {
        Self::fast(|_| Waste::Never)
    }

    /// Waste up to the first remaining scalar (or byte) matching `pred`.
    pub fn find(pred: impl Fn(char) -> bool + 'static) -> Self {
        Self::fast(move |state| match state.current_str().find(&pred) {
            Some(offset) => waste_to(state, offset),
            None => Waste::TooMuch,
        })
    }

    /// Waste up to the first occurrence of `needle`.
    pub fn find_str(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        Self::fast(move |state| match state.current_str().find(needle.as_str()) {
            Some(offset) => waste_to(state, offset),
            None => Waste::TooMuch,
        })
    }

    /// Waste up to the first remaining byte matching `pred`.
    pub fn find_byte(pred: impl Fn(u8) -> bool + 'static) -> Self {
        Self::fast(move |state| match state.current_bytes().iter().position(|&b| pred(b)) {
            Some(offset) => waste_to(state, offset),
            None => Waste::TooMuch,
        })
    }

    pub fn is_fast(&self) -> bool {
        matches!(self, Self::Fast(_))
    }
}

impl fmt::Debug for Recoverer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast(_) => f.write_str("Fast"),
            Self::Step => f.write_str("Step"),
        }
    }
}

/// Waste of skipping `bytes` bytes from `state`, in units.
pub fn waste_to(state: &State, bytes: usize) -> Waste {
    Waste::Units(state.units_to(&state.move_by(bytes)))
}

/// Cached anchor lookups of one run, keyed by recoverer and failing position.
///
/// Recoverers report the first position where their anchor parses, so an
/// entry found at `p` still answers for any later `q` up to that anchor:
/// nothing between `p` and the anchor matched. A "too much" entry answers
/// for every later position.
#[derive(Debug, Default)]
pub(crate) struct WasteCache {
    entries: HashMap<ParserId, BTreeMap<usize, Option<usize>>>,
}

/// Outcome of a cache lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Cached {
    /// The anchor parses at this byte offset.
    Anchor(usize),
    TooMuch,
}

impl WasteCache {
    pub(crate) fn get(&self, id: ParserId, pos: usize) -> Option<Cached> {
        let (_, &entry) = self.entries.get(&id)?.range(..=pos).next_back()?;
        match entry {
            Some(anchor) if anchor >= pos => Some(Cached::Anchor(anchor)),
            Some(_) => None,
            None => Some(Cached::TooMuch),
        }
    }

    pub(crate) fn insert(&mut self, id: ParserId, pos: usize, cached: Cached) {
        let entry = match cached {
            Cached::Anchor(anchor) => Some(anchor),
            Cached::TooMuch => None,
        };
        self.entries.entry(id).or_default().insert(pos, entry);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }
}
