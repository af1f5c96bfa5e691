//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! `*Params` structs mirror the command `*Args` but keep CLI-level types
//! (`ColorChoice`, unparsed names) until the `Into<*Args>` conversion.

use std::path::PathBuf;

use clap::ArgMatches;
use fleetql_lib::Generation;
use fleetql_lib::compile::Database;

use super::ColorChoice;
use crate::commands::ast::AstArgs;
use crate::commands::catalogs::CatalogsArgs;
use crate::commands::check::CheckArgs;
use crate::commands::matching::MatchArgs;
use crate::commands::print::PrintArgs;
use crate::commands::run_common::FilterInput;
use crate::commands::sql::SqlArgs;
use crate::commands::suggest::SuggestArgs;

/// Args shared by every command that binds a filter.
pub struct FilterParams {
    pub filter_text: Option<String>,
    pub filter_path: Option<PathBuf>,
    pub entity: String,
    pub config_path: Option<PathBuf>,
    pub generation: Option<Generation>,
    pub now: Option<i64>,
    pub no_macros: bool,
    pub color: ColorChoice,
}

impl FilterParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            filter_text: m.get_one::<String>("filter").cloned(),
            filter_path: m.get_one::<PathBuf>("filter_file").cloned(),
            entity: m
                .get_one::<String>("entity")
                .cloned()
                .unwrap_or_else(|| "target".to_string()),
            config_path: m.get_one::<PathBuf>("config").cloned(),
            generation: m
                .get_one::<String>("generation")
                .and_then(|s| s.parse().ok()),
            now: m.get_one::<i64>("now").copied(),
            no_macros: m.get_flag("no_macros"),
            color: parse_color(m),
        }
    }
}

impl From<FilterParams> for FilterInput {
    fn from(p: FilterParams) -> Self {
        Self {
            filter_text: p.filter_text,
            filter_path: p.filter_path,
            entity: p.entity,
            config_path: p.config_path,
            generation: p.generation,
            now: p.now,
            expand_macros: !p.no_macros,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub filter: FilterParams,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            filter: FilterParams::from_matches(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            input: p.filter.into(),
        }
    }
}

pub struct PrintParams {
    pub filter: FilterParams,
    pub tree: bool,
}

impl PrintParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            filter: FilterParams::from_matches(m),
            tree: m.get_flag("tree"),
        }
    }
}

impl From<PrintParams> for PrintArgs {
    fn from(p: PrintParams) -> Self {
        Self {
            input: p.filter.into(),
            tree: p.tree,
        }
    }
}

pub struct SqlParams {
    pub filter: FilterParams,
    pub database: Database,
    pub json: bool,
}

impl SqlParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            filter: FilterParams::from_matches(m),
            database: m
                .get_one::<String>("database")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            json: m.get_flag("json"),
        }
    }
}

impl From<SqlParams> for SqlArgs {
    fn from(p: SqlParams) -> Self {
        Self {
            input: p.filter.into(),
            database: p.database,
            json: p.json,
        }
    }
}

pub struct MatchParams {
    pub filter: FilterParams,
    pub values: String,
}

impl MatchParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            filter: FilterParams::from_matches(m),
            values: m.get_one::<String>("values").cloned().unwrap_or_default(),
        }
    }
}

impl From<MatchParams> for MatchArgs {
    fn from(p: MatchParams) -> Self {
        Self {
            input: p.filter.into(),
            values: p.values,
        }
    }
}

pub struct SuggestParams {
    pub filter: FilterParams,
    pub cursor: Option<i64>,
    pub json: bool,
}

impl SuggestParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            filter: FilterParams::from_matches(m),
            cursor: m.get_one::<i64>("cursor").copied(),
            json: m.get_flag("json"),
        }
    }
}

impl From<SuggestParams> for SuggestArgs {
    fn from(p: SuggestParams) -> Self {
        Self {
            input: p.filter.into(),
            cursor: p.cursor,
            json: p.json,
        }
    }
}

pub struct AstParams {
    pub filter_text: Option<String>,
    pub filter_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub raw: bool,
}

impl AstParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            filter_text: m.get_one::<String>("filter").cloned(),
            filter_path: m.get_one::<PathBuf>("filter_file").cloned(),
            config_path: m.get_one::<PathBuf>("config").cloned(),
            raw: m.get_flag("raw"),
        }
    }
}

impl From<AstParams> for AstArgs {
    fn from(p: AstParams) -> Self {
        Self {
            filter_text: p.filter_text,
            filter_path: p.filter_path,
            config_path: p.config_path,
            raw: p.raw,
        }
    }
}

pub struct CatalogsParams {
    pub entity: Option<String>,
    pub json: bool,
}

impl CatalogsParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            entity: m.get_one::<String>("entity").cloned(),
            json: m.get_flag("json"),
        }
    }
}

impl From<CatalogsParams> for CatalogsArgs {
    fn from(p: CatalogsParams) -> Self {
        Self {
            entity: p.entity,
            json: p.json,
        }
    }
}

/// `-v` count from any level of the command tree.
pub fn verbosity(m: &ArgMatches) -> u8 {
    m.get_count("verbose")
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    ColorChoice::from_arg(m.get_one::<String>("color").map(String::as_str))
}
