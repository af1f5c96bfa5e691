//! In-memory evaluation against field values given on the command line.

use std::fs;

use fleetql_lib::compile::FieldValueMap;

use super::run_common::{FilterInput, Loaded};

pub struct MatchArgs {
    pub input: FilterInput,
    /// JSON object, or `@PATH` to a file holding one.
    pub values: String,
}

pub fn run(args: MatchArgs) {
    let loaded = Loaded::or_exit(&args.input);
    let values = load_values(&args.values).unwrap_or_else(|msg| {
        eprintln!("error: {msg}");
        std::process::exit(1);
    });
    let filter = loaded.parse_or_exit();
    let bound = loaded.bind_or_exit(&filter);

    let matched = bound.to_matcher().matches(&values);
    println!("{matched}");
    if !matched {
        std::process::exit(1);
    }
}

pub fn load_values(arg: &str) -> Result<FieldValueMap, String> {
    let json = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("failed to read '{path}': {e}"))?,
        None => arg.to_owned(),
    };
    FieldValueMap::from_json(&json).map_err(|e| format!("invalid field values: {e}"))
}
