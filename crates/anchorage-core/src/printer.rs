//! Builder-pattern printer for rendering parser errors.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use crate::error::ParserError;
use crate::errors::Errors;

/// Builder for rendering errors with various options.
///
/// With a source, text errors are rendered as annotated snippets; binary
/// errors and source-less printing use the one-line `Display` format.
pub struct ErrorsPrinter<'e, 's> {
    errors: &'e Errors,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> ErrorsPrinter<'e, 's> {
    pub fn new(errors: &'e Errors) -> Self {
        Self {
            errors,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            if error.is_binary() {
                write!(w, "{error}")?;
                continue;
            }

            let range = adjust_range(error.position(), source);
            let mut snippet = Snippet::source(source)
                .line_start(1)
                .annotation(AnnotationKind::Primary.span(range).label(error.message()));

            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            let report: Vec<Group> =
                vec![Level::ERROR.primary_title(error.message()).element(snippet)];
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", error)?;
        }
        Ok(())
    }
}

/// Zero-width error positions are widened to the scalar under them, if any.
fn adjust_range(pos: usize, source: &str) -> std::ops::Range<usize> {
    let start = pos.min(source.len());
    let width = source
        .get(start..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8);
    start..start + width
}

impl Errors {
    pub fn printer(&self) -> ErrorsPrinter<'_, '_> {
        ErrorsPrinter::new(self)
    }
}

impl ParserError {
    /// One-error convenience around [`ErrorsPrinter`].
    pub fn render(&self, source: &str) -> String {
        let errors = Errors::from(vec![self.clone()]);
        errors.printer().source(source).render()
    }
}
