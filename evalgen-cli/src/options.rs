use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, builder::styling};
use evalgen_client::EvalgenClientService;
use evalgen_core::contracts::{GenerationConfig, GuidedBackend, GuidedDecoding};
use evalgen_eval::color::color_schema;
use serde_json::Value;

const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::Green.on_default().bold())
    .usage(styling::AnsiColor::Green.on_default().bold())
    .literal(styling::AnsiColor::Cyan.on_default().bold())
    .placeholder(styling::AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "evalgen: structured output evaluations",
    long_about = "Runs the RGB color evaluation against a model, constraining output with a JSON schema and optional guided decoding.",
    styles = STYLES
)]
pub struct Args {
    #[arg(short, long, default_value = "openai::gpt-4o-mini", help = "The model to use, as provider::model")]
    pub model: String,

    #[arg(short, long, help = "JSON Lines dataset with input and target fields (defaults to the built-in colors)")]
    pub dataset: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Do not send the color response schema")]
    pub no_schema: bool,

    #[arg(long, default_value_t = false, help = "Ask the provider to enforce the schema strictly")]
    pub strict: bool,

    #[arg(long, help = "Description sent along with the response schema")]
    pub schema_description: Option<String>,

    #[arg(long, help = "Backend naming for guided decoding keys: vllm or sglang")]
    pub guided_backend: Option<String>,

    #[arg(long, value_delimiter = ',', conflicts_with_all = ["guided_regex", "guided_grammar_file"], help = "Restrict output to one of these comma separated choices")]
    pub guided_choice: Option<Vec<String>>,

    #[arg(long, conflicts_with = "guided_grammar_file", help = "Restrict output to a regular expression")]
    pub guided_regex: Option<String>,

    #[arg(long, help = "Restrict output to the grammar in this file")]
    pub guided_grammar_file: Option<PathBuf>,

    #[arg(long = "extra", value_name = "KEY=JSON", help = "Raw request body entry, repeatable")]
    pub extra: Vec<String>,

    #[arg(long, default_value_t = 10, help = "Maximum concurrent requests")]
    pub max_connections: usize,

    #[arg(long, default_value_t = false, help = "Print results as JSON")]
    pub json: bool,
}

/// Parses a `key=json` pair. A value that is not valid JSON is taken as a
/// plain string.
pub fn parse_extra(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("extra entry '{}' must be key=json", raw))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("extra entry '{}' has an empty key", raw);
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Picks the guided decoding backend: the explicit flag, otherwise the
/// model's provider when it is `vllm` or `sglang`.
pub fn resolve_backend(explicit: Option<&str>, model: &str) -> Result<GuidedBackend> {
    if let Some(name) = explicit {
        return Ok(name.parse()?);
    }
    let (provider, _) = EvalgenClientService::parse_model(model).map_err(|e| anyhow!("{}", e))?;
    provider
        .parse()
        .map_err(|_| anyhow!("--guided-backend is required for provider '{}'", provider))
}

pub fn guided_decoding(args: &Args) -> Result<Option<GuidedDecoding>> {
    if let Some(choices) = &args.guided_choice {
        let choices: Vec<String> = choices
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if choices.is_empty() {
            bail!("--guided-choice needs at least one choice");
        }
        return Ok(Some(GuidedDecoding::Choice(choices)));
    }
    if let Some(pattern) = &args.guided_regex {
        return Ok(Some(GuidedDecoding::Regex(pattern.clone())));
    }
    if let Some(path) = &args.guided_grammar_file {
        let grammar = fs::read_to_string(path)
            .with_context(|| format!("failed to read grammar file {}", path.display()))?;
        return Ok(Some(GuidedDecoding::Grammar(grammar)));
    }
    Ok(None)
}

/// Builds the generation config shared by every sample of the run.
///
/// Guided decoding is applied before the raw `--extra` entries so an explicit
/// entry wins on a key collision.
pub fn build_config(args: &Args) -> Result<GenerationConfig> {
    let mut config = GenerationConfig::default();

    if !args.no_schema {
        let mut schema = color_schema()?;
        if let Some(description) = &args.schema_description {
            schema = schema.with_description(description.clone());
        }
        if args.strict {
            schema = schema.with_strict(true);
        }
        config = config.with_response_schema(schema);
    }

    if let Some(guided) = guided_decoding(args)? {
        let backend = resolve_backend(args.guided_backend.as_deref(), &args.model)?;
        config = config.with_guided(guided, backend);
    }

    for raw in &args.extra {
        let (key, value) = parse_extra(raw)?;
        config = config.with_extra(key, value);
    }

    Ok(config)
}
