#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Anchorage: parser combinators with automatic error recovery.
//!
//! Parsers are leaves (terminal matchers) or branches (compositions driven
//! by a continuation). Leaves marked as safe spots become recovery anchors.
//! When a parse fails, the orchestrator skips the least input that lets some
//! anchor match again, re-parses from there and rebuilds the output up the
//! tree, so one run reports every independent error.
//!
//! # Example
//!
//! ```
//! use anchorage::{Input, char, map3, prepare, safe_spot};
//!
//! let abc = map3(
//!     safe_spot(char('a')),
//!     safe_spot(char('b')),
//!     safe_spot(char('c')),
//!     |a, b, c| format!("{a}{b}{c}"),
//! );
//! let parser = prepare(&abc);
//!
//! let (output, errors) = parser.run(Input::text("ac"));
//! assert_eq!(output, "a\0c");
//! assert_eq!(errors.to_string(), "expected \"b\" [1:2] a▶c");
//! ```

mod branch;
mod combinators;
mod invariants;
mod lazy;
mod leaf;
mod orchestrator;
mod parser;
mod primitives;
mod recover;
mod registry;
pub mod trace;

#[cfg(test)]
mod branch_tests;
#[cfg(test)]
mod combinators_tests;
#[cfg(test)]
mod recover_tests;
#[cfg(test)]
mod trace_tests;

pub use anchorage_core::{
    Config, DEFAULT_MAX_ERRORS, ErrorKind, Errors, ErrorsPrinter, Input, Location, MARKER,
    ParserError, ParserId, Saved, State,
};
pub use branch::{BranchCtx, Resume, Step, branch};
pub use combinators::{
    Slots, delimited, first_success, many0, map, map2, map3, preceded, sequence, terminated,
    try_map,
};
pub use lazy::{lazy, recursive};
pub use leaf::{leaf, safe_spot};
pub use orchestrator::{PreparedParser, prepare};
pub use parser::{AnyParser, Output, ParseResult, Parser};
pub use primitives::{any_byte, any_char, byte, char, digit0, digit1, eof, literal, satisfy, until};
pub use recover::{FastRecoverer, Recoverer, Waste, waste_to};
pub use trace::{LogTracer, NoopTracer, PrintTracer, Tracer};

/// Errors of the fail-fast parse API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The run recorded at least one error.
    #[error("parsing failed with {} errors", .0.len())]
    ParseFailed(Errors),
}

/// Result type for parse operations.
pub type Result<T> = std::result::Result<T, Error>;
