//! fleetql: RSQL-style filter engine for device-fleet entities.
//!
//! # Example
//!
//! ```
//! use fleetql_lib::{EngineConfig, Filter};
//! use fleetql_lib::compile::Database;
//!
//! let config = EngineConfig::default();
//! let catalog = fleetql_catalogs::target();
//! let filter = Filter::parse("name==edge* and updatestatus=in=(pending,error)", &config)
//!     .unwrap()
//!     .bind(&catalog)
//!     .unwrap();
//!
//! assert_eq!(
//!     filter.print(),
//!     r#"NAME=="edge*" && UPDATESTATUS=in=("pending","error")"#
//! );
//! let sql = filter.to_store(Database::Postgres).to_sql();
//! assert!(sql.sql.starts_with("UPPER(sp_target.name) LIKE $1"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod bind;
pub mod compile;
pub mod config;
pub mod diagnostics;
pub mod macros;
pub mod oracle;
pub mod parser;
pub mod printer;
pub mod query;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod printer_tests;
#[cfg(test)]
mod test_support;

use rowan::TextRange;

pub use config::{ConfigError, EngineConfig, Generation, PollingConfig};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter};
pub use query::{BoundFilter, Filter};

use diagnostics::DiagnosticMessage;

macro_rules! located_error {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        #[error("{message} at {}..{}", u32::from(.range.start()), u32::from(.range.end()))]
        pub struct $name {
            kind: DiagnosticKind,
            message: String,
            range: TextRange,
            fragment: String,
        }

        impl $name {
            pub fn kind(&self) -> DiagnosticKind {
                self.kind
            }

            pub fn message(&self) -> &str {
                &self.message
            }

            pub fn range(&self) -> TextRange {
                self.range
            }

            /// Offending part of the filter text. Empty when the error sits at the end of input.
            pub fn fragment(&self) -> &str {
                &self.fragment
            }

            /// Render against the filter text the error was produced from.
            pub fn render(&self, source: &str, colored: bool) -> String {
                self.to_diagnostics().printer(source).colored(colored).render()
            }

            pub fn to_diagnostics(&self) -> Diagnostics {
                let mut diagnostics = Diagnostics::new();
                diagnostics
                    .report(self.kind, self.range)
                    .with_message(self.message.clone())
                    .emit();
                diagnostics
            }
        }
    };
}

located_error! {
    /// Grammar violation: the text is not a well-formed filter.
    SyntaxError
}

located_error! {
    /// Well-formed filter rejected by the field catalog.
    FieldError
}

impl SyntaxError {
    pub(crate) fn from_message(msg: &DiagnosticMessage, source: &str) -> Self {
        Self {
            kind: msg.kind(),
            message: msg.message().to_string(),
            range: msg.range(),
            fragment: fragment(source, msg.range()),
        }
    }
}

impl FieldError {
    /// Error whose message follows the kind's template.
    pub(crate) fn new(
        kind: DiagnosticKind,
        detail: Option<&str>,
        range: TextRange,
        fragment: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: kind.message(detail),
            range,
            fragment: fragment.into(),
        }
    }

    /// Re-slice the fragment from the text the range refers to.
    pub(crate) fn with_source(mut self, source: &str) -> Self {
        self.fragment = fragment(source, self.range);
        self
    }
}

/// Errors returned by every operation that accepts filter text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("field error: {0}")]
    Field(#[from] FieldError),
}

impl FilterError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            FilterError::Syntax(e) => e.kind(),
            FilterError::Field(e) => e.kind(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FilterError::Syntax(e) => e.message(),
            FilterError::Field(e) => e.message(),
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            FilterError::Syntax(e) => e.range(),
            FilterError::Field(e) => e.range(),
        }
    }

    pub fn fragment(&self) -> &str {
        match self {
            FilterError::Syntax(e) => e.fragment(),
            FilterError::Field(e) => e.fragment(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, FilterError::Syntax(_))
    }

    pub fn render(&self, source: &str, colored: bool) -> String {
        match self {
            FilterError::Syntax(e) => e.render(source, colored),
            FilterError::Field(e) => e.render(source, colored),
        }
    }

    pub fn to_diagnostics(&self) -> Diagnostics {
        match self {
            FilterError::Syntax(e) => e.to_diagnostics(),
            FilterError::Field(e) => e.to_diagnostics(),
        }
    }
}

fn fragment(source: &str, range: TextRange) -> String {
    let end = usize::from(range.end()).min(source.len());
    let start = usize::from(range.start()).min(end);
    source.get(start..end).unwrap_or_default().to_string()
}
