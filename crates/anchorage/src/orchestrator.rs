//! Parse, recover, rebuild.
//!
//! A run descends from the root once. Whenever an error reaches the top,
//! the cheapest recovery anchor is chosen (see [`Run::choose_anchor`]), the
//! anchor leaf is re-parsed after the skipped input, and the result climbs
//! the registered parent chain through each branch's continuation. A new
//! error during the climb starts the next round from where it surfaced.
//!
//! The loop stops when the climb reaches the root cleanly, when the error
//! sits at the end of input, when the error budget is spent, or when no
//! anchor can match. In the last three cases the error unwinds to the root
//! so every branch still produces its best-effort output.

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use anchorage_core::{ErrorKind, Errors, Input, ParserError, ParserId, Saved, State};

use crate::branch::Resume;
use crate::parser::{Cx, Output, ParseResult, Parser};
use crate::recover::{Cached, Recoverer, Waste, WasteCache};
use crate::registry::Registry;
use crate::trace::{NoopTracer, Tracer};
use crate::{Error, Result};

/// A parser tree walked once and ready to run on any number of inputs.
pub struct PreparedParser<T> {
    registry: Registry,
    _output: PhantomData<fn() -> T>,
}

/// Registers `root` and every parser reachable from it.
pub fn prepare<T: 'static>(root: &Parser<T>) -> PreparedParser<T> {
    PreparedParser {
        registry: Registry::build(&root.erase()),
        _output: PhantomData,
    }
}

impl<T: 'static> PreparedParser<T> {
    /// Parses `input`, returning the (possibly degraded) output and all
    /// errors sorted by position.
    pub fn run(&self, input: Input) -> (T, Errors) {
        self.run_with(input, &mut NoopTracer)
    }

    pub fn run_with<R: Tracer>(&self, input: Input, tracer: &mut R) -> (T, Errors) {
        let max_errors = input.config().max_errors;
        let run = Run {
            registry: &self.registry,
            cx: Cx::new(&self.registry),
            cache: WasteCache::default(),
            errors: Errors::new(),
            salvage: HashMap::new(),
            tried: HashSet::new(),
            max_errors,
            tracer,
        };
        let (output, errors) = run.execute(State::new(input));
        (crate::invariants::ensure_output_type(output), errors)
    }

    /// Like [`run`](Self::run), but any error fails the whole parse.
    pub fn parse(&self, input: Input) -> Result<T> {
        let (output, errors) = self.run(input);
        if errors.is_empty() {
            Ok(output)
        } else {
            Err(Error::ParseFailed(errors))
        }
    }

    /// Number of registered parser nodes.
    pub fn node_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of safe spots with fast and with step recoverers.
    pub fn anchor_counts(&self) -> (usize, usize) {
        (self.registry.fast_count(), self.registry.step_count())
    }
}

/// State of one run. Caches never outlive it.
struct Run<'p, R> {
    registry: &'p Registry,
    cx: Cx<'p>,
    cache: WasteCache,
    errors: Errors,
    /// Partial outputs branches saved in errors, awaiting their resume.
    salvage: HashMap<ParserId, Saved>,
    /// Anchors already resumed at a position; reusing one would loop.
    tried: HashSet<(ParserId, usize)>,
    max_errors: usize,
    tracer: &'p mut R,
}

impl<R: Tracer> Run<'_, R> {
    fn execute(mut self, start: State) -> (Output, Errors) {
        let mut result = self.cx.parse(0, &start);
        let mut at_id: ParserId = 0;

        while let Some(mut error) = result.error.take() {
            // Semantic errors follow successful sub-parses: resume after them.
            let at = match error.kind() {
                ErrorKind::Semantic => result.end.clone(),
                ErrorKind::Syntax => result.end.moved_to(error.position()),
            };
            self.record(&mut error);

            let recovered = if at.at_end() || self.errors.len() >= self.max_errors {
                None
            } else {
                self.recover(error.owner(), &at)
            };

            match recovered {
                Some((anchor, leaf)) => {
                    (at_id, result) = self.climb(anchor, leaf, false);
                    self.drop_stale_salvage(at_id);
                }
                None => {
                    self.tracer.trace_give_up(at.position());
                    result.error = Some(error);
                    (_, result) = self.climb(at_id, result, true);
                    result.error = None;
                }
            }
        }

        self.errors.sort();
        (result.output, self.errors)
    }

    /// Stores the error, keeping the partial outputs it carries aside.
    ///
    /// An error equal to a recorded one (same position and message) is the
    /// same mismatch found again and is not listed twice.
    fn record(&mut self, error: &mut ParserError) {
        for (id, data) in error.take_saved() {
            self.salvage.insert(id, data);
        }
        self.tracer.trace_error(error);
        let known = self
            .errors
            .iter()
            .any(|e| e.position() == error.position() && e.message() == error.message());
        if !known {
            self.errors.push(error.clone());
        }
    }

    /// Re-parses the cheapest anchor after the wasted input.
    ///
    /// An anchor failing at the position its recoverer proposed breaks the
    /// recoverer contract; that is recorded as an error of its own and the
    /// next cheapest anchor is tried.
    fn recover(
        &mut self,
        owner: Option<ParserId>,
        at: &State,
    ) -> Option<(ParserId, ParseResult<Output>)> {
        loop {
            let (anchor, waste) = self.choose_anchor(owner, at)?;
            let resume_at = at.move_by_units(waste);
            self.tried.insert((anchor, resume_at.position()));

            let registry = self.registry;
            let entry = registry.entry(anchor);
            self.tracer
                .trace_anchor(anchor, &entry.label, resume_at.position());
            let result = self.cx.parse(anchor, &resume_at);
            if result.is_ok() {
                return Some((anchor, result));
            }

            let mut violation = resume_at.new_semantic_error(format!(
                "recoverer of \"{}\" proposed an offset where it fails",
                entry.label
            ));
            violation.claim(anchor);
            self.record(&mut violation);
            if self.errors.len() >= self.max_errors {
                return None;
            }
        }
    }

    /// Picks the anchor with the least waste from `at`.
    ///
    /// Order of consultation: the failing parser's own recoverer, every
    /// fast recoverer in registration order, then, unless some anchor needs
    /// no skipping at all, every step recoverer in registration order.
    /// Only a strictly smaller waste replaces the current pick.
    fn choose_anchor(
        &mut self,
        owner: Option<ParserId>,
        at: &State,
    ) -> Option<(ParserId, usize)> {
        let mut best: Option<(ParserId, usize)> = None;

        if let Some(id) = owner
            && let Some(recoverer) = self.registry.entry(id).recoverer.clone()
        {
            let waste = match recoverer {
                Recoverer::Fast(f) => self.fast_waste(id, &*f, at),
                Recoverer::Step => self.step_waste(id, at, usize::MAX),
            };
            best = waste.map(|w| (id, w));
        }

        let registry = self.registry;
        for (id, f) in registry.fast() {
            if best.is_some_and(|(_, w)| w == 0) {
                return best;
            }
            if Some(id) == owner {
                continue;
            }
            if let Some(waste) = self.fast_waste(id, &**f, at)
                && best.is_none_or(|(_, w)| waste < w)
            {
                best = Some((id, waste));
            }
        }

        for id in registry.step() {
            if best.is_some_and(|(_, w)| w == 0) {
                break;
            }
            if Some(id) == owner {
                continue;
            }
            let limit = best.map_or(usize::MAX, |(_, w)| w);
            if let Some(waste) = self.step_waste(id, at, limit)
                && waste < limit
            {
                best = Some((id, waste));
            }
        }

        best
    }

    fn fast_waste(
        &mut self,
        id: ParserId,
        f: &dyn Fn(&State) -> Waste,
        at: &State,
    ) -> Option<usize> {
        let pos = at.position();
        let (anchor, cached) = match self.cache.get(id, pos) {
            Some(Cached::Anchor(anchor)) => (Some(anchor), true),
            Some(Cached::TooMuch) => (None, true),
            None => {
                let anchor = match f(at) {
                    Waste::Units(units) => Some(at.move_by_units(units).position()),
                    Waste::TooMuch | Waste::Never => None,
                };
                let entry = anchor.map_or(Cached::TooMuch, Cached::Anchor);
                self.cache.insert(id, pos, entry);
                (anchor, false)
            }
        };
        self.waste_of(id, at, anchor, cached)
    }

    /// Probes the anchor at `at`, one unit further each time, below `limit` units.
    ///
    /// Exhausting the input is cached as "too much"; stopping at the limit
    /// proves nothing and is not cached.
    fn step_waste(&mut self, id: ParserId, at: &State, limit: usize) -> Option<usize> {
        let pos = at.position();
        match self.cache.get(id, pos) {
            Some(Cached::Anchor(anchor)) => return self.waste_of(id, at, Some(anchor), true),
            Some(Cached::TooMuch) => return self.waste_of(id, at, None, true),
            None => {}
        }

        let mut probe = at.clone();
        let mut units = 0;
        loop {
            if units >= limit {
                self.tracer
                    .trace_waste(id, &self.registry.entry(id).label, pos, None, false);
                return None;
            }
            if self.cx.parse(id, &probe).is_ok() {
                self.cache.insert(id, pos, Cached::Anchor(probe.position()));
                return self.waste_of(id, at, Some(probe.position()), false);
            }
            if probe.at_end() {
                self.cache.insert(id, pos, Cached::TooMuch);
                return self.waste_of(id, at, None, false);
            }
            probe = probe.move_by_units(1);
            units += 1;
        }
    }

    /// Converts an anchor offset to waste, skipping anchors already resumed there.
    fn waste_of(
        &mut self,
        id: ParserId,
        at: &State,
        anchor: Option<usize>,
        cached: bool,
    ) -> Option<usize> {
        let waste = anchor
            .filter(|&anchor| !self.tried.contains(&(id, anchor)))
            .map(|anchor| at.units_to(&at.moved_to(anchor)));
        let label = &self.registry.entry(id).label;
        self.tracer.trace_waste(id, label, at.position(), waste, cached);
        waste
    }

    /// Climbs from a freshly parsed anchor towards the root.
    ///
    /// Returns the node the climb stopped at with its result: the root, or
    /// the first ancestor reporting a new error. While `unwinding`, errors
    /// ride along to the root instead.
    fn climb(
        &mut self,
        from: ParserId,
        result: ParseResult<Output>,
        unwinding: bool,
    ) -> (ParserId, ParseResult<Output>) {
        let mut id = from;
        let mut result = result;
        while let Some((parent, index)) = self.registry.parent(id) {
            let saved = self.salvage.remove(&parent);
            let registry = self.registry;
            let entry = registry.entry(parent);
            self.tracer.trace_resume(parent, &entry.label, index);
            result = entry.node.resume(
                &self.cx,
                parent,
                Resume {
                    index,
                    child: result,
                    saved,
                },
            );
            id = parent;
            if !unwinding && result.error.is_some() {
                break;
            }
        }
        (id, result)
    }

    /// Forgets partial outputs of branches outside the path from the root
    /// to `stop`.
    ///
    /// Only those branches are still suspended; any other saved data belongs
    /// to a finished attempt and must not reach a later resume of the same
    /// branch.
    fn drop_stale_salvage(&mut self, stop: ParserId) {
        let registry = self.registry;
        self.salvage.retain(|&id, _| registry.is_within(stop, id));
    }
}
