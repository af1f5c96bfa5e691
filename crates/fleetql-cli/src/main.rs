mod cli;
mod commands;

use cli::{
    AstParams, CatalogsParams, CheckParams, MatchParams, PrintParams, SqlParams, SuggestParams,
    build_cli, verbosity,
};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = build_cli().get_matches();
    if let Some((_, m)) = matches.subcommand() {
        init_logging(verbosity(m));
    }

    match matches.subcommand() {
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("print", m)) => {
            let params = PrintParams::from_matches(m);
            commands::print::run(params.into());
        }
        Some(("sql", m)) => {
            let params = SqlParams::from_matches(m);
            commands::sql::run(params.into());
        }
        Some(("match", m)) => {
            let params = MatchParams::from_matches(m);
            commands::matching::run(params.into());
        }
        Some(("suggest", m)) => {
            let params = SuggestParams::from_matches(m);
            commands::suggest::run(params.into());
        }
        Some(("ast", m)) => {
            let params = AstParams::from_matches(m);
            commands::ast::run(params.into());
        }
        Some(("catalogs", m)) => {
            let params = CatalogsParams::from_matches(m);
            commands::catalogs::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// Logs go to stderr. `FLEETQL_LOG`, then `RUST_LOG`, override the level
/// picked by `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "fleetql=debug,fleetql_lib=debug",
        _ => "fleetql=trace,fleetql_lib=trace",
    };
    let filter = std::env::var("FLEETQL_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .compact()
        .with_env_filter(filter)
        .init();
}
