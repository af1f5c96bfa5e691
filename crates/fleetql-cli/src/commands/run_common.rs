//! Input loading shared by the filter commands.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use fleetql_catalogs::Catalog;
use fleetql_lib::macros::{FixedClock, MacroSource, NoMacros, TimestampMacros};
use fleetql_lib::parser;
use fleetql_lib::{BoundFilter, ConfigError, Diagnostics, EngineConfig, Filter, FilterError, Generation};

/// Filter text plus everything needed to bind it.
pub struct FilterInput {
    pub filter_text: Option<String>,
    pub filter_path: Option<PathBuf>,
    pub entity: String,
    pub config_path: Option<PathBuf>,
    pub generation: Option<Generation>,
    pub now: Option<i64>,
    pub expand_macros: bool,
    pub color: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("filter is required: use a positional argument or -f/--file")]
    MissingFilter,

    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown entity type '{0}'")]
    UnknownEntity(String),

    #[error("--now {0} is out of range")]
    InvalidNow(i64),
}

/// Filter text from the positional argument, a file, or stdin (`-`).
pub fn load_filter(text: Option<&str>, path: Option<&Path>) -> Result<String, InputError> {
    if let Some(text) = text {
        return Ok(text.to_owned());
    }
    match path {
        Some(path) if path.as_os_str() == "-" => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| InputError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(trim_line_end(buf))
        }
        Some(path) => fs::read_to_string(path)
            .map(trim_line_end)
            .map_err(|source| InputError::Read {
                path: path.display().to_string(),
                source,
            }),
        None => Err(InputError::MissingFilter),
    }
}

/// Files usually end with a newline that is not part of the filter.
fn trim_line_end(mut text: String) -> String {
    let len = text.trim_end_matches(['\r', '\n']).len();
    text.truncate(len);
    text
}

pub fn load_config(path: Option<&Path>, generation: Option<Generation>) -> Result<EngineConfig, InputError> {
    let config = match path {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    Ok(match generation {
        Some(generation) => config.with_generation(generation),
        None => config,
    })
}

pub fn resolve_catalog(entity: &str) -> Result<Catalog, InputError> {
    fleetql_catalogs::from_name(entity).ok_or_else(|| InputError::UnknownEntity(entity.to_string()))
}

/// Everything a filter command needs after loading its input.
pub struct Loaded {
    pub text: String,
    pub catalog: Catalog,
    pub config: EngineConfig,
    pub macros: Box<dyn MacroSource>,
    /// Shown above rendered diagnostics when the filter came from a file.
    pub origin: Option<String>,
    pub color: bool,
}

impl Loaded {
    pub fn from_input(input: &FilterInput) -> Result<Self, InputError> {
        let text = load_filter(input.filter_text.as_deref(), input.filter_path.as_deref())?;
        let catalog = resolve_catalog(&input.entity)?;
        let config = load_config(input.config_path.as_deref(), input.generation)?;
        let macros: Box<dyn MacroSource> = match (input.expand_macros, input.now) {
            (false, _) => Box::new(NoMacros),
            (true, Some(millis)) => {
                let clock = FixedClock::from_millis(millis).ok_or(InputError::InvalidNow(millis))?;
                Box::new(TimestampMacros::with_clock(config.polling, clock))
            }
            (true, None) => Box::new(TimestampMacros::new(config.polling)),
        };
        tracing::debug!(
            entity = catalog.entity(),
            generation = %config.generation,
            macros = input.expand_macros,
            "loaded filter input"
        );
        Ok(Self {
            text,
            catalog,
            config,
            macros,
            origin: input.filter_path.as_ref().map(|p| p.display().to_string()),
            color: input.color,
        })
    }

    /// Load or exit with the error on stderr.
    pub fn or_exit(input: &FilterInput) -> Self {
        Self::from_input(input).unwrap_or_else(|err| {
            eprintln!("error: {err}");
            if matches!(err, InputError::UnknownEntity(_)) {
                eprintln!();
                eprintln!("Run 'fleetql catalogs' for the full list.");
            }
            std::process::exit(1);
        })
    }

    pub fn parse(&self) -> Result<Filter, FilterError> {
        Filter::parse_with_macros(&self.text, self.macros.as_ref(), &self.config)
    }

    /// Parse or exit with rendered diagnostics. Error ranges refer to the
    /// expanded text, so that is what gets rendered. Syntax errors show every
    /// diagnostic the tolerant parse found, not only the first.
    pub fn parse_or_exit(&self) -> Filter {
        self.parse().unwrap_or_else(|err| {
            let source = expanded(&self.text, self.macros.as_ref());
            let diagnostics = if err.is_syntax() {
                parser::check(&source, &self.config)
            } else {
                err.to_diagnostics()
            };
            self.exit_with(&diagnostics, &source)
        })
    }

    pub fn bind_or_exit<'a>(&'a self, filter: &Filter) -> BoundFilter<'a> {
        filter
            .bind(&self.catalog)
            .unwrap_or_else(|err| self.exit_with(&err.to_diagnostics(), filter.text()))
    }

    fn exit_with(&self, diagnostics: &Diagnostics, source: &str) -> ! {
        let mut printer = diagnostics.filtered_printer(source).colored(self.color);
        if let Some(origin) = &self.origin {
            printer = printer.origin(origin);
        }
        eprint!("{}", printer.render());
        std::process::exit(1);
    }
}

/// Text the filter error ranges refer to.
pub fn expanded(text: &str, macros: &dyn MacroSource) -> String {
    fleetql_lib::macros::resolve(text, macros)
}
