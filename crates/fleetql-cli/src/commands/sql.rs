//! SQL condition for a filter.

use fleetql_lib::compile::{Database, SqlFragment};
use serde::Serialize;

use super::run_common::{FilterInput, Loaded};

pub struct SqlArgs {
    pub input: FilterInput,
    pub database: Database,
    pub json: bool,
}

#[derive(Serialize)]
struct SqlOutput<'a> {
    database: String,
    #[serde(flatten)]
    fragment: &'a SqlFragment,
}

pub fn run(args: SqlArgs) {
    let loaded = Loaded::or_exit(&args.input);
    let filter = loaded.parse_or_exit();
    let bound = loaded.bind_or_exit(&filter);
    let fragment = bound.to_store(args.database).to_sql();

    if args.json {
        let output = SqlOutput {
            database: args.database.to_string(),
            fragment: &fragment,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("{}", fragment.sql);
    for (i, param) in fragment.params.iter().enumerate() {
        println!("-- {}: {param}", i + 1);
    }
}
