//! Ordered collection of parser errors.

use std::fmt;

use crate::error::{ErrorKind, ParserError};

#[derive(Debug, Clone, Default)]
pub struct Errors {
    errors: Vec<ParserError>,
}

impl Errors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn push(&mut self, error: ParserError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn syntax_count(&self) -> usize {
        self.count_kind(ErrorKind::Syntax)
    }

    pub fn semantic_count(&self) -> usize {
        self.count_kind(ErrorKind::Semantic)
    }

    fn count_kind(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind() == kind).count()
    }

    /// Orders errors by input position. Errors at the same position keep
    /// their discovery order.
    pub fn sort(&mut self) {
        self.errors.sort_by_key(ParserError::position);
    }

    pub fn positions(&self) -> Vec<usize> {
        self.errors.iter().map(ParserError::position).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParserError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<ParserError> {
        self.errors
    }

    pub fn extend(&mut self, other: Errors) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl From<Vec<ParserError>> for Errors {
    fn from(errors: Vec<ParserError>) -> Self {
        Self { errors }
    }
}

impl IntoIterator for Errors {
    type Item = ParserError;
    type IntoIter = std::vec::IntoIter<ParserError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a ParserError;
    type IntoIter = std::slice::Iter<'a, ParserError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
