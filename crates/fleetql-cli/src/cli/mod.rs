mod args;
mod commands;
mod dispatch;


pub use commands::build_cli;
pub use dispatch::{
    AstParams, CatalogsParams, CheckParams, MatchParams, PrintParams, SqlParams, SuggestParams,
    verbosity,
};

/// `--color` setting. `Auto` colors only when both output streams are terminals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn from_arg(value: Option<&str>) -> Self {
        match value {
            Some("always") => ColorChoice::Always,
            Some("never") => ColorChoice::Never,
            _ => ColorChoice::Auto,
        }
    }

    pub fn should_colorize(self) -> bool {
        use std::io::IsTerminal;

        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stdout().is_terminal() && std::io::stderr().is_terminal(),
        }
    }
}
