//! Renders diagnostics against the filter text with `annotate-snippets`.

use std::fmt::Write;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Patch, Renderer, Snippet};
use rowan::TextRange;

use super::message::DiagnosticMessage;

pub struct DiagnosticsPrinter<'a> {
    diagnostics: Vec<DiagnosticMessage>,
    source: &'a str,
    origin: Option<&'a str>,
    colored: bool,
}

impl<'a> DiagnosticsPrinter<'a> {
    pub fn new(diagnostics: Vec<DiagnosticMessage>, source: &'a str) -> Self {
        Self {
            diagnostics,
            source,
            origin: None,
            colored: false,
        }
    }

    /// Where the filter came from (a file name, a request field), shown
    /// above each snippet.
    pub fn origin(mut self, origin: &'a str) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = self.format(&mut out);
        out
    }

    /// Diagnostics are separated by a blank line.
    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        let len = self.source.len();

        for (i, diag) in self.diagnostics.iter().enumerate() {
            let primary = clamp(diag.range, len);

            let mut snippet = Snippet::source(self.source).line_start(1).annotation(
                AnnotationKind::Primary
                    .span(primary.clone())
                    .label(&diag.message),
            );
            if let Some(origin) = self.origin {
                snippet = snippet.path(origin);
            }
            for related in &diag.related {
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(clamp(related.range, len))
                        .label(&related.message),
                );
            }

            let mut groups: Vec<Group> =
                vec![Level::ERROR.primary_title(&diag.message).element(snippet)];
            if let Some(fix) = &diag.fix {
                let patch = Snippet::source(self.source)
                    .line_start(1)
                    .patch(Patch::new(primary, &fix.replacement));
                groups.push(Level::HELP.secondary_title(&fix.description).element(patch));
            }

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&groups))?;
        }
        Ok(())
    }
}

/// Byte range inside the source. An empty range at the end of input still
/// underlines one column so the caret is visible.
fn clamp(range: TextRange, len: usize) -> Range<usize> {
    let start = usize::from(range.start()).min(len);
    let end = usize::from(range.end()).min(len);
    if start == end {
        start..(start + 1).min(len)
    } else {
        start..end
    }
}
