//! Tracing hooks for the recovery loop.
//!
//! `NoopTracer` methods are `#[inline(always)]` empty functions, so a plain
//! `run` pays nothing for them. `PrintTracer` collects readable lines for
//! tests and debugging; `LogTracer` forwards events to the `log` facade.

use anchorage_core::{ParserError, ParserId};

/// Instrumentation of the orchestrator.
///
/// Each method is called at a specific point of a run:
/// - `trace_error` - when an error reaches the orchestrator
/// - `trace_waste` - after a recoverer was asked (or its answer found in the cache)
/// - `trace_anchor` - when the cheapest anchor is picked
/// - `trace_resume` - before a branch continuation is resumed during the climb
/// - `trace_give_up` - when recovery stops and the remaining errors unwind
pub trait Tracer {
    fn trace_error(&mut self, error: &ParserError);

    /// `waste` is `None` when the anchor can't match (or lost to a cheaper one).
    fn trace_waste(
        &mut self,
        anchor: ParserId,
        label: &str,
        pos: usize,
        waste: Option<usize>,
        cached: bool,
    );

    fn trace_anchor(&mut self, anchor: ParserId, label: &str, pos: usize);

    fn trace_resume(&mut self, branch: ParserId, label: &str, child: usize);

    fn trace_give_up(&mut self, pos: usize);
}

/// No-op tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_error(&mut self, _error: &ParserError) {}

    #[inline(always)]
    fn trace_waste(
        &mut self,
        _anchor: ParserId,
        _label: &str,
        _pos: usize,
        _waste: Option<usize>,
        _cached: bool,
    ) {
    }

    #[inline(always)]
    fn trace_anchor(&mut self, _anchor: ParserId, _label: &str, _pos: usize) {}

    #[inline(always)]
    fn trace_resume(&mut self, _branch: ParserId, _label: &str, _child: usize) {}

    #[inline(always)]
    fn trace_give_up(&mut self, _pos: usize) {}
}

/// Tracer that collects one line per event.
#[derive(Debug, Default)]
pub struct PrintTracer {
    lines: Vec<String>,
}

impl PrintTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn dump(&self) -> String {
        self.lines.join("\n")
    }
}

impl Tracer for PrintTracer {
    fn trace_error(&mut self, error: &ParserError) {
        let owner = error.owner().map_or("-".to_string(), |id| format!("#{id}"));
        self.lines.push(format!(
            "error   {owner} @{} {}",
            error.position(),
            error.message()
        ));
    }

    fn trace_waste(
        &mut self,
        anchor: ParserId,
        label: &str,
        pos: usize,
        waste: Option<usize>,
        cached: bool,
    ) {
        let waste = waste.map_or("-".to_string(), |w| w.to_string());
        let cached = if cached { " (cached)" } else { "" };
        self.lines
            .push(format!("waste   #{anchor} {label} @{pos} = {waste}{cached}"));
    }

    fn trace_anchor(&mut self, anchor: ParserId, label: &str, pos: usize) {
        self.lines.push(format!("anchor  #{anchor} {label} @{pos}"));
    }

    fn trace_resume(&mut self, branch: ParserId, label: &str, child: usize) {
        self.lines.push(format!("resume  #{branch} {label} [{child}]"));
    }

    fn trace_give_up(&mut self, pos: usize) {
        self.lines.push(format!("give up @{pos}"));
    }
}

/// Tracer writing to the `log` facade under the `anchorage` target.
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace_error(&mut self, error: &ParserError) {
        log::debug!(target: "anchorage", "error at {}: {}", error.position(), error.message());
    }

    fn trace_waste(
        &mut self,
        anchor: ParserId,
        label: &str,
        pos: usize,
        waste: Option<usize>,
        cached: bool,
    ) {
        log::trace!(
            target: "anchorage",
            "waste of #{anchor} {label:?} at {pos}: {waste:?} (cached: {cached})"
        );
    }

    fn trace_anchor(&mut self, anchor: ParserId, label: &str, pos: usize) {
        log::debug!(target: "anchorage", "resuming at #{anchor} {label:?}, offset {pos}");
    }

    fn trace_resume(&mut self, branch: ParserId, label: &str, child: usize) {
        log::trace!(target: "anchorage", "climbing into #{branch} {label:?} at child {child}");
    }

    fn trace_give_up(&mut self, pos: usize) {
        log::debug!(target: "anchorage", "giving up at offset {pos}");
    }
}
