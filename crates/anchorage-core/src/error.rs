//! Positioned parser errors.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::ParserId;
use crate::state::Location;

/// Partial output a branch parser stores in an error while it propagates.
///
/// Opaque to everything but the branch that stored it.
pub type Saved = Rc<dyn Any>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Expectation mismatch raised by a leaf parser.
    Syntax,
    /// Raised by a mapping or validation step after successful sub-parses.
    Semantic,
}

#[derive(Clone)]
pub struct ParserError {
    kind: ErrorKind,
    message: String,
    position: usize,
    location: Location,
    excerpt: String,
    binary: bool,
    owner: Option<ParserId>,
    saved: Vec<(ParserId, Saved)>,
}

impl ParserError {
    pub(crate) fn new(
        kind: ErrorKind,
        message: String,
        position: usize,
        location: Location,
        excerpt: String,
        binary: bool,
    ) -> Self {
        Self {
            kind,
            message,
            position,
            location,
            excerpt,
            binary,
            owner: None,
            saved: Vec::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message without position or excerpt, e.g. `expected "b"`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset of the error.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn line(&self) -> u32 {
        self.location.line
    }

    pub fn column(&self) -> u32 {
        self.location.column
    }

    /// Marked source excerpt, or the hexdump row for binary input.
    pub fn excerpt(&self) -> &str {
        &self.excerpt
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }

    /// Parser that raised (or claimed) this error.
    pub fn owner(&self) -> Option<ParserId> {
        self.owner
    }

    /// Attributes an unattributed error to `id`. Already owned errors keep their owner.
    pub fn claim(&mut self, id: ParserId) {
        self.owner.get_or_insert(id);
    }

    /// Stores `data` for parser `id`, replacing what it stored before.
    pub fn save(&mut self, id: ParserId, data: Saved) {
        match self.saved.iter_mut().find(|(owner, _)| *owner == id) {
            Some(slot) => slot.1 = data,
            None => self.saved.push((id, data)),
        }
    }

    pub fn saved(&self, id: ParserId) -> Option<&Saved> {
        self.saved
            .iter()
            .find(|(owner, _)| *owner == id)
            .map(|(_, data)| data)
    }

    /// All stored partial outputs, innermost parser first.
    pub fn saved_entries(&self) -> impl Iterator<Item = (ParserId, &Saved)> {
        self.saved.iter().map(|(id, data)| (*id, data))
    }

    /// Removes and returns all stored partial outputs.
    pub fn take_saved(&mut self) -> Vec<(ParserId, Saved)> {
        std::mem::take(&mut self.saved)
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.binary {
            write!(f, "{}:\n{}", self.message, self.excerpt)
        } else {
            write!(
                f,
                "{} [{}:{}] {}",
                self.message, self.location.line, self.location.column, self.excerpt
            )
        }
    }
}

impl fmt::Debug for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("position", &self.position)
            .field("location", &self.location)
            .field("owner", &self.owner)
            .field(
                "saved",
                &self.saved.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl std::error::Error for ParserError {}
