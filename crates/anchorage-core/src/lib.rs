#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for the anchorage parser engine.
//!
//! Three layers:
//! - **Input**: owned text or bytes plus the run configuration
//! - **State**: a cheap-to-clone cursor with line tracking and the safe-spot watermark
//! - **Errors**: positioned parser errors, rendered with a source excerpt or hexdump

mod errors;
mod excerpt;
mod input;
mod printer;
mod state;

mod error;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod errors_tests;
#[cfg(test)]
mod excerpt_tests;

pub use error::{ErrorKind, ParserError, Saved};
pub use errors::Errors;
pub use excerpt::MARKER;
pub use input::{Config, DEFAULT_MAX_ERRORS, Input};
pub use printer::ErrorsPrinter;
pub use state::{Location, State};

/// Identifier of a parser node, assigned when a parser tree is prepared.
///
/// Identifiers follow tree-walk order, starting at 0 for the root.
pub type ParserId = u32;
