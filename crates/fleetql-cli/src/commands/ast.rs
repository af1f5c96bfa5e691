//! Syntax tree of a filter.

use std::path::PathBuf;

use fleetql_lib::parser::{self, dump_cst, parse_tree};

use super::run_common::{load_config, load_filter};

pub struct AstArgs {
    pub filter_text: Option<String>,
    pub filter_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub raw: bool,
}

pub fn run(args: AstArgs) {
    let loaded = load_filter(args.filter_text.as_deref(), args.filter_path.as_deref())
        .and_then(|text| Ok((text, load_config(args.config_path.as_deref(), None)?)));
    let (text, config) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // The tree is printed even for malformed filters; errors follow on stderr.
    let result = parse_tree(&text, &config);
    print!("{}", dump_cst(result.root.as_cst(), args.raw));

    let diagnostics = parser::check(&text, &config);
    if !diagnostics.is_empty() {
        eprint!("{}", diagnostics.render(&text));
        std::process::exit(1);
    }
}
