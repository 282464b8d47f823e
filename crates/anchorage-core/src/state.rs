//! Parser state: an immutable-by-convention cursor over the input.
//!
//! Every parser receives its own `State` value and returns a new one; nothing
//! is shared mutably. Cloning only bumps a reference count.
//!
//! Line tracking is incremental: moving forward scans just the moved slice,
//! moving back scans just the skipped slice. `locate` answers arbitrary
//! positions from the nearer of the two known anchors (input start, or the
//! start of the current line).

use crate::error::{ErrorKind, ParserError};
use crate::excerpt;
use crate::input::{Config, Input};

/// User-facing position of a byte offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column in scalars (bytes for binary input); 0 on an empty line.
    pub column: u32,
}

/// Bounds of the line containing some offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LineSpan {
    pub line: u32,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone)]
pub struct State {
    input: Input,
    pos: usize,
    line: u32,
    prev_newline: Option<usize>,
    safe_spot: usize,
}

impl State {
    pub fn new(input: Input) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            prev_newline: None,
            safe_spot: 0,
        }
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn config(&self) -> Config {
        self.input.config()
    }

    pub fn is_binary(&self) -> bool {
        self.input.is_binary()
    }

    /// Byte offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Offset of the newline ending the previous line, if any.
    pub fn prev_newline(&self) -> Option<usize> {
        self.prev_newline
    }

    pub fn column(&self) -> u32 {
        self.locate(self.pos).column
    }

    /// Furthest position reached by a successful safe spot.
    pub fn safe_spot(&self) -> usize {
        self.safe_spot
    }

    /// True once a safe spot has matched after `start` was taken.
    pub fn crossed_safe_spot_since(&self, start: &State) -> bool {
        self.safe_spot > start.pos
    }

    /// Raises the safe-spot watermark to the current position.
    pub fn mark_safe_spot(mut self) -> Self {
        self.safe_spot = self.safe_spot.max(self.pos);
        self
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn bytes_remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    pub fn current_bytes(&self) -> &[u8] {
        &self.input.bytes()[self.pos..]
    }

    /// Remaining input as text. For binary input this is the longest
    /// valid UTF-8 prefix of the remaining bytes.
    pub fn current_str(&self) -> &str {
        self.input.str_from(self.pos)
    }

    /// Advances by `count` bytes, clamped to the end of the input.
    ///
    /// For text input the target is aligned forward to a scalar boundary.
    pub fn move_by(&self, count: usize) -> State {
        let len = self.input.len();
        let target = self.input.align(self.pos.saturating_add(count).min(len));
        let moved = &self.input.bytes()[self.pos..target];

        let mut next = self.clone();
        next.line += count_newlines(moved);
        if let Some(last) = moved.iter().rposition(|&b| b == b'\n') {
            next.prev_newline = Some(self.pos + last);
        }
        next.pos = target;
        next
    }

    /// Advances by `count` units: scalars for text, bytes for binary.
    pub fn move_by_units(&self, count: usize) -> State {
        if self.is_binary() {
            return self.move_by(count);
        }
        let bytes = self
            .current_str()
            .char_indices()
            .nth(count)
            .map_or(self.bytes_remaining(), |(i, _)| i);
        self.move_by(bytes)
    }

    /// Moves back to `pos`, scanning only the skipped slice.
    ///
    /// A `pos` beyond the current position moves forward instead.
    pub fn move_back_to(&self, pos: usize) -> State {
        if pos >= self.pos {
            return self.move_by(pos - self.pos);
        }
        let bytes = self.input.bytes();
        let skipped = &bytes[pos..self.pos];
        let newlines = count_newlines(skipped);

        let mut next = self.clone();
        next.pos = pos;
        if newlines > 0 {
            next.line -= newlines;
            next.prev_newline = bytes[..pos].iter().rposition(|&b| b == b'\n');
        }
        next
    }

    /// Moves forward or back to `pos`.
    pub fn moved_to(&self, pos: usize) -> State {
        if pos >= self.pos {
            self.move_by(pos - self.pos)
        } else {
            self.move_back_to(pos)
        }
    }

    /// Units (scalars or bytes) between this state and `other`, 0 if `other` is behind.
    pub fn units_to(&self, other: &State) -> usize {
        self.input.units(self.pos, other.pos)
    }

    /// Input consumed between this state and `other`; empty if `other` is behind.
    pub fn string_to(&self, other: &State) -> &str {
        if other.pos <= self.pos {
            return "";
        }
        let rest = self.current_str();
        rest.get(..other.pos - self.pos).unwrap_or_default()
    }

    /// Bytes consumed between this state and `other`; empty if `other` is behind.
    pub fn bytes_to(&self, other: &State) -> &[u8] {
        if other.pos <= self.pos {
            return &[];
        }
        &self.input.bytes()[self.pos..other.pos]
    }

    /// Line and column of an arbitrary offset.
    pub fn locate(&self, pos: usize) -> Location {
        let span = self.line_span(pos);
        let pos = pos.min(self.input.len());
        let column = if span.start == span.end {
            0
        } else {
            self.input.units(span.start, pos) as u32 + 1
        };
        Location {
            line: span.line,
            column,
        }
    }

    /// Source excerpt (text) or hexdump block (binary) with a marker at `pos`.
    pub fn excerpt(&self, pos: usize) -> String {
        let pos = pos.min(self.input.len());
        if self.is_binary() {
            return excerpt::hexdump(self.input.bytes(), pos);
        }
        let span = self.line_span(pos);
        excerpt::text(&self.input.as_text(), span.start, pos, span.end)
    }

    /// Syntax error at the current position: `expected "<label>"`.
    pub fn new_syntax_error(&self, label: &str) -> ParserError {
        self.error_at(
            ErrorKind::Syntax,
            format!("expected \"{label}\""),
            self.pos,
        )
    }

    /// Semantic error at the current position with a free-form message.
    pub fn new_semantic_error(&self, message: impl Into<String>) -> ParserError {
        self.error_at(ErrorKind::Semantic, message.into(), self.pos)
    }

    fn error_at(&self, kind: ErrorKind, message: String, pos: usize) -> ParserError {
        let location = self.locate(pos);
        ParserError::new(
            kind,
            message,
            pos.min(self.input.len()),
            location,
            self.excerpt(pos),
            self.is_binary(),
        )
    }

    pub(crate) fn line_span(&self, target: usize) -> LineSpan {
        let bytes = self.input.bytes();
        let target = target.min(bytes.len());
        let line_start = self.prev_newline.map_or(0, |nl| nl + 1);

        let line = if target >= self.pos {
            self.line + count_newlines(&bytes[self.pos..target])
        } else if target >= line_start {
            self.line
        } else if target <= line_start - target {
            1 + count_newlines(&bytes[..target])
        } else {
            self.line - count_newlines(&bytes[target..line_start])
        };

        let start = bytes[..target]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |nl| nl + 1);
        let end = bytes[target..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(bytes.len(), |nl| target + nl);

        LineSpan { line, start, end }
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("pos", &self.pos)
            .field("line", &self.line)
            .field("prev_newline", &self.prev_newline)
            .field("safe_spot", &self.safe_spot)
            .finish()
    }
}

fn count_newlines(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|&&b| b == b'\n').count() as u32
}
