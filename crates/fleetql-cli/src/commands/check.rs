use super::run_common::{FilterInput, Loaded};

pub struct CheckArgs {
    pub input: FilterInput,
}

pub fn run(args: CheckArgs) {
    let loaded = Loaded::or_exit(&args.input);
    let filter = loaded.parse_or_exit();
    let bound = loaded.bind_or_exit(&filter);
    tracing::debug!(comparisons = bound.node().comparisons().len(), "filter is valid");

    // Silent on success (like cargo check)
}
