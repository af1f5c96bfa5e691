//! Command builders for the CLI.
//!
//! Every filter command takes the same input and binding args
//! (`with_filter_args`); each adds only the flags its output needs.

use clap::Command;

use super::args::*;

/// Filter input, catalog selection and engine configuration.
fn with_filter_args(cmd: Command) -> Command {
    cmd.arg(filter_arg())
        .arg(filter_file_arg())
        .arg(entity_arg())
        .arg(config_arg())
        .arg(generation_arg())
        .arg(now_arg())
        .arg(no_macros_arg())
        .arg(color_arg())
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("fleetql")
        .about("RSQL-style filters for device-fleet entities")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(check_command())
        .subcommand(print_command())
        .subcommand(sql_command())
        .subcommand(match_command())
        .subcommand(suggest_command())
        .subcommand(ast_command())
        .subcommand(catalogs_command())
}

/// Validate a filter against an entity catalog.
pub fn check_command() -> Command {
    with_filter_args(
        Command::new("check")
            .about("Validate a filter against an entity catalog")
            .after_help(
                r#"EXAMPLES:
  fleetql check 'name==edge*'                    # silent on success
  fleetql check -e rollout 'status=in=(ready)'   # other entity types
  fleetql check -f filter.rsql                   # from a file"#,
            ),
    )
}

/// Print the canonical form of a filter.
pub fn print_command() -> Command {
    with_filter_args(
        Command::new("print")
            .about("Print the canonical form of a filter")
            .after_help(
                r#"EXAMPLES:
  fleetql print 'name==a;tag==b'       # NAME=="a" && TAG.name=="b"
  fleetql print --tree 'a==1,(b==2)'   # one node per line"#,
            ),
    )
    .arg(tree_arg())
}

/// Compile a filter to a SQL condition.
pub fn sql_command() -> Command {
    with_filter_args(
        Command::new("sql")
            .about("Compile a filter to a SQL condition")
            .after_help(
                r#"EXAMPLES:
  fleetql sql 'name==edge*'                   # H2 placeholders
  fleetql sql -d postgres 'tag!=beta'         # numbered placeholders
  fleetql sql --json 'updatestatus==error'    # SQL and parameters as JSON"#,
            ),
    )
    .arg(database_arg())
    .arg(json_arg())
}

/// Evaluate a filter against field values in memory.
pub fn match_command() -> Command {
    with_filter_args(
        Command::new("match")
            .about("Evaluate a filter against field values")
            .after_help(
                r#"EXAMPLES:
  fleetql match 'name==edge*' --values '{"NAME": "edge-1"}'
  fleetql match 'tag==beta' --values '{"TAG.name": ["alpha", "beta"]}'
  fleetql match 'attribute.rev==2' --values @device.json

Exits with status 1 when the values do not match."#,
            ),
    )
    .arg(values_arg())
}

/// Suggest completions at a cursor position.
pub fn suggest_command() -> Command {
    with_filter_args(
        Command::new("suggest")
            .about("Suggest completions at a cursor position")
            .after_help(
                r#"EXAMPLES:
  fleetql suggest 'na'                   # field names
  fleetql suggest 'updatestatus=='       # enum values
  fleetql suggest --cursor 2 'na==x'     # completions at offset 2"#,
            ),
    )
    .arg(cursor_arg())
    .arg(json_arg())
}

/// Show the syntax tree of a filter.
pub fn ast_command() -> Command {
    Command::new("ast")
        .about("Show the syntax tree of a filter")
        .after_help(
            r#"EXAMPLES:
  fleetql ast 'name==a;id==1'         # concrete syntax tree
  fleetql ast --raw 'name == a'       # include whitespace"#,
        )
        .arg(filter_arg())
        .arg(filter_file_arg())
        .arg(config_arg())
        .arg(raw_arg())
        .arg(color_arg())
}

/// List entity catalogs, or the fields of one.
pub fn catalogs_command() -> Command {
    Command::new("catalogs")
        .about("List entity types, or the fields of one")
        .arg(
            clap::Arg::new("entity")
                .value_name("ENTITY")
                .help("Entity type to describe"),
        )
        .arg(json_arg())
}
