//! `--jq-expr` pre-processing of the loaded document.
use anyhow::{Result, anyhow, bail};
use jaq_core::{Compiler, Ctx, RcIter, compile::Undefined, load};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input`. The filter must yield exactly one value,
/// which replaces the document.
pub fn run_jq(filter_src: &str, input: &Value) -> Result<Value> {
    let mut outputs = run_jaq(filter_src, input)?;
    if outputs.len() != 1 {
        bail!("jq expression `{filter_src}` must produce exactly one document, got {}", outputs.len());
    }
    let output = outputs.remove(0);
    serde_json::from_str(&output).map_err(|error| anyhow!("jq expression produced invalid JSON: {error}"))
}

/// Every output of the filter, as JSON text.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<String>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader.load(&arena, program).map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    filter
        .run((Ctx::new([], &inputs), Val::from(input.clone())))
        .map(|item| item.map(|value| value.to_string()).map_err(|error| anyhow!("jq error: {error:?}")))
        .collect()
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> anyhow::Error {
    let message = errs
        .into_iter()
        .map(|(file, err)| format!("parse error: {err:?} in `{}`", file.code))
        .collect::<Vec<_>>()
        .join("\n");
    anyhow!(message)
}

fn format_undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> anyhow::Error {
    let message = errs
        .into_iter()
        .flat_map(|(file, list)| {
            list.into_iter()
                .map(move |(name, undef)| format!("undefined `{name}`: {undef:?} in `{}`", file.code))
        })
        .collect::<Vec<_>>()
        .join("\n");
    anyhow!(message)
}
