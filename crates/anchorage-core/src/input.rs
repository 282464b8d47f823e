//! Parser input: owned text or raw bytes.

use std::borrow::Cow;
use std::rc::Rc;

/// Error budget used when the caller doesn't declare one.
pub const DEFAULT_MAX_ERRORS: usize = 10;

/// Per-run configuration, visible from every `State`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Stop recovering once this many errors have been recorded.
    pub max_errors: usize,
    /// Binary input counts in bytes and reports errors as hexdumps.
    pub binary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_errors: DEFAULT_MAX_ERRORS,
            binary: false,
        }
    }
}

#[derive(Clone)]
enum Source {
    Text(Rc<str>),
    Binary(Rc<[u8]>),
}

/// Fully materialized parser input.
///
/// Cloning is cheap: the content is shared.
#[derive(Clone)]
pub struct Input {
    source: Source,
    config: Config,
}

impl Input {
    pub fn text(text: impl Into<Rc<str>>) -> Self {
        Self {
            source: Source::Text(text.into()),
            config: Config::default(),
        }
    }

    pub fn binary(bytes: impl Into<Rc<[u8]>>) -> Self {
        Self {
            source: Source::Binary(bytes.into()),
            config: Config {
                binary: true,
                ..Config::default()
            },
        }
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.config.max_errors = max_errors;
        self
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn is_binary(&self) -> bool {
        self.config.binary
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.source {
            Source::Text(text) => text.as_bytes(),
            Source::Binary(bytes) => &**bytes,
        }
    }

    /// Text view of the input; binary input is converted lossily.
    pub fn as_text(&self) -> Cow<'_, str> {
        match &self.source {
            Source::Text(text) => Cow::Borrowed(&**text),
            Source::Binary(bytes) => String::from_utf8_lossy(bytes),
        }
    }

    /// Longest valid UTF-8 prefix of `bytes()[from..]`.
    pub(crate) fn str_from(&self, from: usize) -> &str {
        match &self.source {
            Source::Text(text) => text.get(from..).unwrap_or_default(),
            Source::Binary(bytes) => {
                let tail = bytes.get(from..).unwrap_or_default();
                match std::str::from_utf8(tail) {
                    Ok(s) => s,
                    Err(e) => std::str::from_utf8(&tail[..e.valid_up_to()]).unwrap_or_default(),
                }
            }
        }
    }

    /// Moves `pos` forward to the next scalar boundary (text only).
    pub(crate) fn align(&self, mut pos: usize) -> usize {
        if let Source::Text(text) = &self.source {
            while pos < text.len() && !text.is_char_boundary(pos) {
                pos += 1;
            }
        }
        pos
    }

    /// Number of units (scalars for text, bytes for binary) in `from..to`.
    pub(crate) fn units(&self, from: usize, to: usize) -> usize {
        let Some(slice) = self.bytes().get(from..to) else {
            return 0;
        };
        if self.is_binary() {
            return slice.len();
        }
        slice.iter().filter(|&&b| (b & 0xC0) != 0x80).count()
    }
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Input")
            .field("len", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
