//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so commands compose the same
//! definitions and only differ in which ones they take.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Filter text (positional).
pub fn filter_arg() -> Arg {
    Arg::new("filter")
        .value_name("FILTER")
        .help("Filter text, e.g. 'name==edge* and updatestatus==pending'")
}

/// Read the filter from a file (-f/--file), `-` for stdin.
pub fn filter_file_arg() -> Arg {
    Arg::new("filter_file")
        .short('f')
        .long("file")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .conflicts_with("filter")
        .help("Read the filter from a file ('-' for stdin)")
}

/// Entity type whose catalog binds the filter (-e/--entity).
pub fn entity_arg() -> Arg {
    Arg::new("entity")
        .short('e')
        .long("entity")
        .value_name("ENTITY")
        .default_value("target")
        .help("Entity type (see 'fleetql catalogs')")
}

/// Engine configuration file (-c/--config).
pub fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help("Engine configuration (JSON)")
}

/// Negation semantics (--generation), overrides the config file.
pub fn generation_arg() -> Arg {
    Arg::new("generation")
        .long("generation")
        .value_name("GEN")
        .value_parser(["legacy", "current"])
        .help("Negation semantics for multi-valued fields")
}

/// Fixed clock for `${NOW_TS}` and `${OVERDUE_TS}` (--now).
pub fn now_arg() -> Arg {
    Arg::new("now")
        .long("now")
        .value_name("MILLIS")
        .value_parser(value_parser!(i64))
        .help("Epoch milliseconds used for the timestamp macros")
}

/// Leave `${NAME}` unexpanded (--no-macros).
pub fn no_macros_arg() -> Arg {
    Arg::new("no_macros")
        .long("no-macros")
        .action(ArgAction::SetTrue)
        .help("Do not expand ${NAME} macros")
}

/// Target database (-d/--database).
pub fn database_arg() -> Arg {
    Arg::new("database")
        .short('d')
        .long("database")
        .value_name("DB")
        .default_value("h2")
        .value_parser(["h2", "mysql", "postgres", "sqlserver"])
        .help("SQL dialect")
}

/// Field values to match against (--values).
pub fn values_arg() -> Arg {
    Arg::new("values")
        .long("values")
        .value_name("JSON")
        .required(true)
        .help("Field values as a JSON object, or @PATH to read them from a file")
}

/// Cursor byte offset (--cursor).
pub fn cursor_arg() -> Arg {
    Arg::new("cursor")
        .long("cursor")
        .value_name("OFFSET")
        .value_parser(value_parser!(i64))
        .allow_negative_numbers(true)
        .help("Cursor byte offset (defaults to the end of the filter)")
}

/// Machine-readable output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of text")
}

/// Print the filter as an indented tree (--tree).
pub fn tree_arg() -> Arg {
    Arg::new("tree")
        .long("tree")
        .action(ArgAction::SetTrue)
        .help("Print one node per line instead of filter text")
}

/// Include whitespace tokens (--raw).
pub fn raw_arg() -> Arg {
    Arg::new("raw")
        .long("raw")
        .action(ArgAction::SetTrue)
        .help("Include whitespace tokens")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .global(true)
        .help("Verbosity level (-v for debug logs, -vv for trace logs)")
}
