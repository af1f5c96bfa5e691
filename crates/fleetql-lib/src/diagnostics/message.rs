use rowan::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics have overlapping spans, the higher-priority one
/// suppresses the lower-priority one. This prevents cascading error noise.
///
/// Kinds up to `EmptyList` are grammar violations; the rest are schema
/// violations found while binding against a field catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Input exceeds configured limits
    NestingTooDeep,
    FilterTooLarge,

    // These cause cascading errors throughout the rest of the filter
    UnclosedGroup,
    UnclosedList,

    // User omitted something required - root cause errors
    UnterminatedString,
    EmptyFilter,
    ExpectedField,
    ExpectedOperator,
    ExpectedValue,

    // User wrote something that doesn't belong
    UnknownOperator,
    MalformedFieldPath,
    UnexpectedToken,
    EmptyList,

    // Valid syntax, rejected by the field catalog
    UnknownField,
    UnknownSubField,
    MissingSubField,
    MapKeyTooDeep,
    SubFieldOnLeaf,
    OrderingNotSupported,
    WildcardNotSupported,
    ListNotAllowed,
    InvalidEnumValue,
    InvalidBoolean,
    InvalidNumber,
}

impl DiagnosticKind {
    /// Lower discriminant wins when two spans overlap.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    /// Schema violations, reported as field errors rather than syntax errors.
    pub fn is_field_error(&self) -> bool {
        *self >= Self::UnknownField
    }

    /// An unclosed `(` makes everything after it look broken.
    pub fn is_structural_error(&self) -> bool {
        matches!(self, Self::UnclosedGroup | Self::UnclosedList)
    }

    /// Something required is missing at this point.
    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::UnterminatedString
                | Self::EmptyFilter
                | Self::ExpectedField
                | Self::ExpectedOperator
                | Self::ExpectedValue
        )
    }

    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::NestingTooDeep => "filter is nested too deeply",
            Self::FilterTooLarge => "filter is too large",

            Self::UnclosedGroup => "missing closing `)`",
            Self::UnclosedList => "missing closing `)` of value list",

            Self::UnterminatedString => "unterminated quoted string",
            Self::EmptyFilter => "filter is empty",
            Self::ExpectedField => "expected a field name",
            Self::ExpectedOperator => "expected a comparison operator",
            Self::ExpectedValue => "expected a value",

            Self::UnknownOperator => "unknown operator",
            Self::MalformedFieldPath => "malformed field path",
            Self::UnexpectedToken => "unexpected token",
            Self::EmptyList => "value list is empty",

            Self::UnknownField => "unknown field",
            Self::UnknownSubField => "unknown sub-field",
            Self::MissingSubField => "field requires a sub-field",
            Self::MapKeyTooDeep => "map keys cannot be nested",
            Self::SubFieldOnLeaf => "field has no sub-fields",
            Self::OrderingNotSupported => "ordering operator not supported for this field",
            Self::WildcardNotSupported => "wildcards are not supported for this field",
            Self::ListNotAllowed => "operator takes exactly one value",
            Self::InvalidEnumValue => "value is not allowed for this field",
            Self::InvalidBoolean => "value must be `true` or `false`",
            Self::InvalidNumber => "value must be a number",
        }
    }

    /// Final text shown to the user. `detail` is either the offending input
    /// (operator, field name) or a complete sentence, depending on the kind.
    pub fn message(&self, detail: Option<&str>) -> String {
        let Some(detail) = detail else {
            return self.fallback_message().to_string();
        };
        match self {
            Self::UnknownOperator => format!("unknown operator `{detail}`"),
            Self::UnknownField => format!("`{detail}` is not a filterable field"),
            Self::UnknownSubField | Self::InvalidEnumValue | Self::OrderingNotSupported => {
                detail.to_string()
            }
            Self::UnclosedGroup | Self::UnclosedList => {
                format!("{}; {detail}", self.fallback_message())
            }
            _ => format!("{}: {detail}", self.fallback_message()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub(crate) replacement: String,
    pub(crate) description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) fix: Option<Fix>,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            message: message.into(),
            fix: None,
            related: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error at {}..{}: {}",
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}
