//! Canonical form of a filter.

use fleetql_lib::printer::FilterPrinter;

use super::run_common::{FilterInput, Loaded};

pub struct PrintArgs {
    pub input: FilterInput,
    pub tree: bool,
}

pub fn run(args: PrintArgs) {
    let loaded = Loaded::or_exit(&args.input);
    let filter = loaded.parse_or_exit();
    let bound = loaded.bind_or_exit(&filter);

    if args.tree {
        print!("{}", FilterPrinter::new(bound.node()).tree(true).dump());
    } else {
        println!("{}", bound.print());
    }
}
