//! `${NAME}` placeholder expansion.
//!
//! Expansion runs once over the filter text before parsing. Substituted text
//! is never scanned again, and `$${NAME}` is the escape that yields a literal
//! `${NAME}`.

mod timestamp;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::hash::BuildHasher;

use fleetql_core::utils::canonical_name;

pub use timestamp::{Clock, FixedClock, NOW_TS, OVERDUE_TS, SystemClock, TimestampMacros};

/// Supplies values for placeholders.
///
/// `lookup` receives the canonical (upper-case) name and is called on every
/// resolve, so sources must not rely on being cached.
pub trait MacroSource: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl<F> MacroSource for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

impl<S: BuildHasher + Send + Sync> MacroSource for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name)
            .or_else(|| {
                self.iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .cloned()
    }
}

/// Resolves nothing; every placeholder stays verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMacros;

impl MacroSource for NoMacros {
    fn lookup(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Expand every `${NAME}` the source knows; unknown names are kept as written.
pub fn resolve(text: &str, source: &dyn MacroSource) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut expanded = 0usize;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(escaped) = tail.strip_prefix('$')
            && let Some(len) = placeholder_len(escaped)
        {
            out.push_str(&escaped[..len]);
            rest = &escaped[len..];
            continue;
        }

        if let Some(len) = placeholder_len(tail) {
            let name = &tail[2..len - 1];
            match source.lookup(&canonical_name(name)) {
                Some(value) => {
                    out.push_str(&value);
                    expanded += 1;
                }
                None => {
                    tracing::trace!(name, "unknown macro left verbatim");
                    out.push_str(&tail[..len]);
                }
            }
            rest = &tail[len..];
            continue;
        }

        out.push('$');
        rest = &tail[1..];
    }
    out.push_str(rest);

    if expanded > 0 {
        tracing::debug!(expanded, "expanded filter macros");
    }
    out
}

/// Length of a `${NAME}` placeholder at the start of `s`.
fn placeholder_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix("${")?;
    let end = body.find('}')?;
    let name = &body[..end];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    valid.then_some(end + 3)
}
