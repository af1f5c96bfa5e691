//! Completions at a cursor position.

use fleetql_lib::query::{ValidationOracleContext, suggest_with_config};
use serde::Serialize;

use super::run_common::{FilterInput, Loaded};

pub struct SuggestArgs {
    pub input: FilterInput,
    pub cursor: Option<i64>,
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct SuggestionOutput<'a> {
    pub text: &'a str,
    pub kind: &'static str,
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Serialize)]
pub struct SuggestOutput<'a> {
    pub cursor: usize,
    pub partial: &'a str,
    pub suggestions: Vec<SuggestionOutput<'a>>,
    pub syntax_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> From<&'a ValidationOracleContext> for SuggestOutput<'a> {
    fn from(ctx: &'a ValidationOracleContext) -> Self {
        Self {
            cursor: ctx.cursor,
            partial: &ctx.partial,
            suggestions: ctx
                .suggestions
                .iter()
                .map(|s| SuggestionOutput {
                    text: &s.text,
                    kind: s.kind.as_str(),
                    start: s.range.start().into(),
                    end: s.range.end().into(),
                })
                .collect(),
            syntax_error: ctx.syntax_error,
            error: ctx.error.as_deref(),
        }
    }
}

pub fn run(args: SuggestArgs) {
    let loaded = Loaded::or_exit(&args.input);
    // The oracle works on the text as typed, macros included.
    let cursor = args.cursor.unwrap_or(-1);
    let ctx = suggest_with_config(&loaded.text, cursor, &loaded.catalog, &loaded.config);

    if args.json {
        match serde_json::to_string_pretty(&SuggestOutput::from(&ctx)) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    for suggestion in &ctx.suggestions {
        println!("{}\t{}", suggestion.text, suggestion.kind.as_str());
    }
    if let Some(error) = &ctx.error {
        eprintln!("note: {error}");
    }
}
