mod message;
mod printer;


use rowan::TextRange;

pub use message::{DiagnosticKind, DiagnosticMessage, Fix, RelatedInfo};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagnostic with the given kind and span.
    ///
    /// Uses the kind's default message. Call `.message()` on the builder to override.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::with_default_message(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn has_field_errors(&self) -> bool {
        self.messages.iter().any(|m| m.kind.is_field_error())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    /// Diagnostics with cascading errors removed, in source order.
    ///
    /// A diagnostic is dropped when a higher-priority one strictly contains
    /// its span, or starts at the same offset and outranks it. At the same
    /// offset a root cause (something missing) always wins over an unclosed
    /// group or list.
    pub fn filtered(&self) -> Vec<DiagnosticMessage> {
        let mut hidden = vec![false; self.messages.len()];
        for (i, a) in self.messages.iter().enumerate() {
            if hidden[i] {
                continue;
            }
            for (j, b) in self.messages.iter().enumerate() {
                if i != j && !hidden[j] && hides(a, b) {
                    hidden[j] = true;
                }
            }
        }

        let mut kept: Vec<DiagnosticMessage> = self
            .messages
            .iter()
            .zip(&hidden)
            .filter(|(_, hidden)| !**hidden)
            .map(|(m, _)| m.clone())
            .collect();
        kept.sort_by_key(|m| (m.range.start(), m.kind));
        kept
    }

    /// The diagnostic reported to API callers: first in source order after suppression.
    pub fn primary(&self) -> Option<DiagnosticMessage> {
        self.filtered().into_iter().next()
    }

    pub fn printer<'a>(&self, source: &'a str) -> DiagnosticsPrinter<'a> {
        DiagnosticsPrinter::new(self.messages.clone(), source)
    }

    /// Printer that uses filtered diagnostics (cascading errors suppressed).
    pub fn filtered_printer<'a>(&self, source: &'a str) -> DiagnosticsPrinter<'a> {
        DiagnosticsPrinter::new(self.filtered(), source)
    }

    pub fn render(&self, source: &str) -> String {
        self.printer(source).render()
    }

    pub fn render_filtered_colored(&self, source: &str, colored: bool) -> String {
        self.filtered_printer(source).colored(colored).render()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }
}

impl<'a> DiagnosticBuilder<'a> {
    /// Provide custom detail for this diagnostic, rendered using the kind's template.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        let detail = msg.into();
        self.message.message = self.message.kind.message(Some(&detail));
        self
    }

    /// Replace the whole message, bypassing the kind's template.
    pub(crate) fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message.message = msg.into();
        self
    }

    pub fn related_to(mut self, msg: impl Into<String>, range: TextRange) -> Self {
        self.message.related.push(RelatedInfo::new(range, msg));
        self
    }

    pub fn fix(mut self, description: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.message.fix = Some(Fix::new(replacement, description));
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

/// Whether `a` makes `b` redundant.
fn hides(a: &DiagnosticMessage, b: &DiagnosticMessage) -> bool {
    let (outer, inner) = (a.range, b.range);
    if outer.start() < inner.start() && inner.end() <= outer.end() {
        return a.kind.suppresses(&b.kind);
    }
    if outer.start() != inner.start() {
        return false;
    }
    if a.kind.is_root_cause_error() && b.kind.is_structural_error() {
        return true;
    }
    if a.kind.is_structural_error() && b.kind.is_root_cause_error() {
        return false;
    }
    a.kind.suppresses(&b.kind)
}
