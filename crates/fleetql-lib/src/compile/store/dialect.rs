//! SQL dialects.
//!
//! Dialects differ in how LIKE patterns escape their metacharacters and in
//! placeholder syntax. Everything else renders the same for all databases.

use std::str::FromStr;

/// Database-specific rendering hooks.
pub trait Dialect {
    fn name(&self) -> &'static str;

    /// Escape `text` so that it matches itself inside a LIKE pattern.
    fn escape_like(&self, text: &str) -> String;

    /// Appended after every LIKE operand.
    fn like_escape_clause(&self) -> &'static str {
        " ESCAPE '\\'"
    }

    /// Placeholder for the 1-based parameter `index`.
    fn placeholder(&self, index: usize) -> String {
        let _ = index;
        "?".to_string()
    }

    fn upper(&self, expr: &str) -> String {
        format!("UPPER({expr})")
    }
}

/// Escape `%`, `_` and `\` with a backslash.
pub fn escape_with_backslash(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Wrap `%`, `_` and `[` in brackets.
pub fn escape_with_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '%' | '_' | '[' => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Database {
    #[default]
    H2,
    MySql,
    Postgres,
    SqlServer,
}

impl Database {
    pub const ALL: [Database; 4] = [
        Database::H2,
        Database::MySql,
        Database::Postgres,
        Database::SqlServer,
    ];
}

impl Dialect for Database {
    fn name(&self) -> &'static str {
        match self {
            Database::H2 => "h2",
            Database::MySql => "mysql",
            Database::Postgres => "postgres",
            Database::SqlServer => "sqlserver",
        }
    }

    fn escape_like(&self, text: &str) -> String {
        match self {
            Database::SqlServer => escape_with_brackets(text),
            _ => escape_with_backslash(text),
        }
    }

    fn like_escape_clause(&self) -> &'static str {
        match self {
            // Backslash is an escape in MySQL string literals too.
            Database::MySql => " ESCAPE '\\\\'",
            Database::SqlServer => "",
            _ => " ESCAPE '\\'",
        }
    }

    fn placeholder(&self, index: usize) -> String {
        match self {
            Database::Postgres => format!("${index}"),
            Database::SqlServer => format!("@p{index}"),
            _ => "?".to_string(),
        }
    }
}

impl std::fmt::Display for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Database {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h2" => Ok(Database::H2),
            "mysql" | "mariadb" => Ok(Database::MySql),
            "postgres" | "postgresql" => Ok(Database::Postgres),
            "sqlserver" | "mssql" => Ok(Database::SqlServer),
            _ => Err(format!(
                "unknown database `{s}` (expected one of: h2, mysql, postgres, sqlserver)"
            )),
        }
    }
}
