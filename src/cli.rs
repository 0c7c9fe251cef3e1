//! Command line: load → (jq) → generate → write.
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{ArgAction, Parser};
use colored::Colorize;
use serde_json::{Map, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::openapi::Document;
use crate::options::Options;
use crate::writer::SourceSettings;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate statically-typed `fetch` overloads and type declarations from an OpenAPI 3.x document
#[derive(Parser, Debug)]
#[command(name = "fetchtype", version)]
pub struct CommandLineInterface {
    /// OpenAPI document: a local path, a `file://` URL or an `http(s)://` URL (JSON or YAML)
    input: String,

    /// output .d.ts file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// root the helper type modules are imported from
    #[arg(long, default_value = "./fetchtype")]
    import: String,

    /// write the helper type modules to <DIR>/types/ (pair with `--import <DIR>`)
    #[arg(long, value_name = "DIR")]
    emit_helpers: Option<PathBuf>,

    /// comma separated list of custom base urls for paths to start with
    #[arg(long, value_delimiter = ',')]
    base_urls: Vec<String>,

    /// include server URLs from the schema in the generated paths
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_value_t = true, default_missing_value = "true")]
    include_server_urls: bool,

    /// include absolute URLs in the generated paths
    #[arg(long)]
    include_absolute_url: bool,

    /// include relative URLs in the generated paths
    #[arg(long)]
    include_relative_url: bool,

    /// use the fully typed URLSearchParamsString module for query strings and form bodies
    #[arg(long = "experimental-urlsearchparams")]
    experimental_url_search_params: bool,

    /// add a `T extends "<NAME>"` type parameter to every overload
    #[arg(long, value_name = "NAME")]
    experimental_discriminator: Option<String>,

    /// drop the default of the discriminator type parameter
    #[arg(long)]
    experimental_require_discriminator: bool,

    /// JQ pre-process filter for the document; must yield exactly one value
    #[arg(long)]
    jq_expr: Option<String>,

    /// increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn options(&self) -> Options {
        Options {
            base_urls: self.base_urls.clone(),
            include_absolute_url: self.include_absolute_url,
            include_server_urls: self.include_server_urls,
            include_relative_url: self.include_relative_url,
            experimental_url_search_params: self.experimental_url_search_params,
            experimental_discriminator: self.experimental_discriminator.clone(),
            experimental_require_discriminator: self.experimental_require_discriminator,
        }
    }

    pub fn run(&self) -> Result<()> {
        init_tracing(self.verbose);

        let value = load_document(&self.input)?;
        let value = match self.jq_expr.as_deref() {
            Some(jq_expr) => crate::jq_exec::run_jq(jq_expr, &value)
                .with_context(|| format!("failed to apply jq expression to {}", self.input))?,
            None => value,
        };
        let document = Document::from_value(value).with_context(|| format!("invalid OpenAPI document {}", self.input))?;
        progress("Schema resolved");

        let settings = SourceSettings { import_root: self.import.clone(), generated_at: Utc::now() };
        let generated = crate::generate(&document, &self.options(), &settings)?;
        progress(&format!(
            "{} fetch overloads and {} component types generated",
            generated.file.global.functions.len(),
            generated.file.module.type_aliases.len()
        ));
        for diagnostic in &generated.diagnostics {
            warn!(location = %diagnostic.location, "{diagnostic}");
        }

        let source = generated.file.render();
        match self.output.as_ref() {
            Some(out) => {
                if let Some(parent) = out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create directory {}", parent.display()))?;
                }
                std::fs::write(out, &source).with_context(|| format!("failed to write {}", out.display()))?;
                progress(&format!("Written to {}", out.display()));
            }
            None => print!("{source}"),
        }

        if let Some(dir) = self.emit_helpers.as_ref() {
            let written = crate::helpers::write_helpers(dir)?;
            progress(&format!("{} helper modules written to {}", written.len(), dir.join("types").display()));
        }
        Ok(())
    }
}

/// Read and parse `input` (path, `file://` or `http(s)://`) into JSON.
pub fn load_document(input: &str) -> Result<Value> {
    let text = read_source(input)?;
    info!(input, bytes = text.len(), "document loaded");
    parse_source(&text).with_context(|| format!("failed to parse {input}"))
}

pub fn read_source(input: &str) -> Result<String> {
    if input.starts_with("http://") || input.starts_with("https://") {
        return ureq::get(input)
            .call()
            .with_context(|| format!("failed to fetch {input}"))?
            .into_string()
            .with_context(|| format!("failed to read response body of {input}"));
    }
    let path = input.strip_prefix("file://").unwrap_or(input);
    std::fs::read_to_string(path).with_context(|| format!("failed to read source file {path}"))
}

/// JSON first, YAML otherwise. YAML `<<` merge keys are resolved.
pub fn parse_source(text: &str) -> Result<Value> {
    let json_error = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(error) => error,
    };
    let mut yaml = serde_yaml::from_str::<serde_yaml::Value>(text)
        .with_context(|| format!("document is neither JSON ({json_error}) nor YAML"))?;
    yaml.apply_merge().context("failed to apply YAML merge keys")?;
    yaml_to_json(yaml)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn progress(message: &str) {
    eprintln!("{} {message}", "✔".green());
}

/// YAML allows non-string mapping keys (`200:`); JSON objects do not.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value> {
    use serde_yaml::Value as Yaml;
    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(flag),
        Yaml::Number(number) => {
            if let Some(int) = number.as_i64() {
                Value::from(int)
            } else if let Some(uint) = number.as_u64() {
                Value::from(uint)
            } else {
                number
                    .as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(text) => Value::String(text),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect::<Result<_>>()?),
        Yaml::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    use serde_yaml::Value as Yaml;
    Ok(match key {
        Yaml::String(text) => text,
        Yaml::Number(number) => number.to_string(),
        Yaml::Bool(flag) => flag.to_string(),
        Yaml::Null => "null".to_string(),
        other => bail!("unsupported YAML mapping key: {other:?}"),
    })
}
