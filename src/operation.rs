//! One `fetch` overload per (path, method, request content type).
//!
//! ```text
//! function fetch(
//!   input: `/pets/${number}${`?${URLSearchParamsString<{ limit?: `${number}` }>}` | ""}`,
//!   init?: Omit<RequestInit, "method" | "body"> & { method?: "GET" },
//! ): Promise<Omit<Response, "ok" | ...> & ({ ok: true; status: 200; json(): ... } | ...)>;
//! ```
use rayon::prelude::*;
use tracing::debug;

use crate::body::{RESPONSE_ACCESSORS, request_body_type, response_type};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::error::{GenerateError, Result};
use crate::ir::{Member, TemplatePart, TsType};
use crate::lower::lower_schema;
use crate::openapi::{Document, METHODS, Method, Operation, ParameterLocation, PathItem, Server};
use crate::options::Options;
use crate::params::{ParameterMap, add_parameters, in_location};
use crate::status::{self, InvalidStatusKey, StatusRegistry};
use crate::writer::{FunctionSignature, JsDoc, Parameter, Scope, TypeParameter, non_empty};

/// Add the signatures of every path item to `scope`, in document order.
///
/// Path items are processed in parallel; the first error in document order
/// wins.
pub fn add_paths(document: &Document, options: &Options, scope: &mut Scope) -> Result<Vec<Diagnostic>> {
    let results = document
        .spec()
        .paths
        .par_iter()
        .map(|(pattern, item)| path_item_signatures(document, options, pattern, item))
        .collect::<Vec<_>>();

    let mut diagnostics = Vec::new();
    for result in results {
        let (functions, found) = result?;
        scope.add_functions(functions);
        diagnostics.extend(found);
    }
    Ok(diagnostics)
}

/// Signatures for every operation of one path item.
pub fn path_item_signatures(
    document: &Document,
    options: &Options,
    pattern: &str,
    item: &PathItem,
) -> Result<(Vec<FunctionSignature>, Vec<Diagnostic>)> {
    let item = match &item.reference {
        Some(reference) => item.clone().overlay(document.resolve_as::<PathItem>(reference)?),
        None => item.clone(),
    };

    let mut shared = ParameterMap::new();
    add_parameters(document, item.parameters.as_deref().unwrap_or_default(), &mut shared)?;

    let mut functions = Vec::new();
    let mut diagnostics = Vec::new();
    for method in METHODS {
        let operation = match item.operation(method) {
            None => continue,
            Some(None) => {
                return Err(GenerateError::UndefinedOperation {
                    method: method.to_string(),
                    pattern: pattern.to_string(),
                });
            }
            Some(Some(operation)) => operation,
        };
        debug!(%method, pattern, "generating operation");

        let mut found = Diagnostics::at(format!("{} {pattern}", method.to_uppercase()));
        functions.extend(operation_signatures(
            document,
            options,
            pattern,
            shared.clone(),
            method,
            operation,
            &mut found,
        )?);
        diagnostics.extend(found.into_vec());
    }
    Ok((functions, diagnostics))
}

/// Overloads for one operation. `parameters` holds the path-level entries
/// and is overlaid with the operation's own.
pub fn operation_signatures(
    document: &Document,
    options: &Options,
    pattern: &str,
    mut parameters: ParameterMap,
    method: Method,
    operation: &Operation,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<FunctionSignature>> {
    add_parameters(document, &operation.parameters, &mut parameters)?;

    let request_body = operation
        .request_body
        .as_ref()
        .map(|body| document.resolve_item(body))
        .transpose()?;
    let body_required = request_body.as_ref().is_some_and(|body| body.required);
    let request_bodies: Vec<(Option<&str>, Option<TsType>)> = match &request_body {
        Some(body) if !body.content.is_empty() => body
            .content
            .iter()
            .map(|(content_type, media)| {
                let ty = request_body_type(content_type, media.schema.as_ref(), options, diagnostics);
                (Some(content_type.as_str()), Some(ty))
            })
            .collect(),
        _ => vec![(None, None)],
    };

    let return_type = return_type(response_types(document, method, pattern, operation, diagnostics)?);
    let path = path_template(pattern, &parameters, diagnostics);
    let input = Parameter {
        name: "input".to_string(),
        optional: false,
        ty: input_type(document, options, &path)?,
    };
    let docs = operation_docs(operation);
    let type_parameters = discriminator_parameters(options);

    Ok(request_bodies
        .into_iter()
        .map(|(content_type, body_type)| {
            let headers = headers_type(&parameters, content_type, diagnostics);

            let mut omit = vec!["method", "body"];
            if headers.is_some() {
                omit.push("headers");
            }
            let mut members = vec![
                Member::property("method", TsType::literal(method.to_uppercase())).optional(method == Method::Get),
            ];
            if let Some(body_type) = body_type {
                members.push(Member::property("body", body_type).optional(!body_required));
            }
            if let Some(headers) = headers {
                members.push(Member::property("headers", headers));
            }
            let init = Parameter {
                name: "init".to_string(),
                optional: method == Method::Get && request_body.is_none(),
                ty: TsType::intersection([
                    omit_type("RequestInit", &omit),
                    TsType::Object(members),
                ]),
            };

            FunctionSignature {
                docs: docs.clone(),
                name: "fetch".to_string(),
                type_parameters: type_parameters.clone(),
                parameters: vec![input.clone(), init],
                return_type: return_type.clone(),
            }
        })
        .collect())
}

/// The path pattern with path parameters substituted, plus the query string.
pub fn path_template(pattern: &str, parameters: &ParameterMap, diagnostics: &mut Diagnostics) -> Vec<TemplatePart> {
    let mut parts = Vec::new();
    let mut rest = pattern;
    while let Some(start) = rest.find('{') {
        let Some(length) = rest[start..].find('}') else { break };
        let end = start + length;
        let name = &rest[start + 1..end];
        let parameter = parameters
            .get(name)
            .filter(|parameter| parameter.location == ParameterLocation::Path);
        match parameter {
            Some(parameter) => {
                push_text(&mut parts, &rest[..start]);
                let ty = lower_schema(parameter.schema.as_ref(), false, diagnostics).unwrap_or(TsType::STRING);
                parts.push(TemplatePart::Type(ty));
            }
            None => push_text(&mut parts, &rest[..=end]),
        }
        rest = &rest[end + 1..];
    }
    push_text(&mut parts, rest);

    let mut optional = true;
    let mut fields = Vec::new();
    for parameter in in_location(parameters, ParameterLocation::Query) {
        optional &= !parameter.required;
        let mut types = vec![lower_schema(parameter.schema.as_ref(), true, diagnostics).unwrap_or(TsType::STRING)];
        if parameter.allow_empty_value {
            types.push(TsType::literal(true));
        }
        fields.push(Member::property(parameter.name.clone(), TsType::union(types)).optional(!parameter.required));
    }

    if !fields.is_empty() {
        let query = TsType::generic("URLSearchParamsString", [TsType::Object(fields)]);
        if optional {
            let segment = TsType::Template(vec![TemplatePart::Text("?".to_string()), TemplatePart::Type(query)]);
            parts.push(TemplatePart::Type(TsType::union([segment, TsType::literal("")])));
        } else {
            push_text(&mut parts, "?");
            parts.push(TemplatePart::Type(query));
        }
    }

    parts
}

/// Union of the accepted URL forms for `path`.
pub fn input_type(document: &Document, options: &Options, path: &[TemplatePart]) -> Result<TsType> {
    let mut inputs = Vec::new();

    for base_url in &options.base_urls {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            continue;
        }
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
        inputs.push(prefixed(vec![TemplatePart::Text(base_url.to_string())], path));
    }

    if options.include_absolute_url {
        let scheme = TsType::union([TsType::literal("http://"), TsType::literal("https://")]);
        inputs.push(prefixed(vec![TemplatePart::Type(scheme), TemplatePart::Type(TsType::STRING)], path));
    }

    if options.include_server_urls {
        for server in &document.spec().servers {
            inputs.push(prefixed(server_url(server), path));
        }
    }

    if options.include_relative_url {
        inputs.push(TsType::Template(path.to_vec()));
    }

    if inputs.is_empty() {
        return Err(GenerateError::NoInputUrls {
            path: TsType::Template(path.to_vec()).to_string(),
            options: options.to_pretty_json(),
        });
    }
    Ok(TsType::union(inputs))
}

/// `TypedHeadersInit<{ ... }>` from header parameters, with a default
/// `Content-Type` unless a parameter of that name exists.
pub fn headers_type(
    parameters: &ParameterMap,
    content_type: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Option<TsType> {
    let headers = in_location(parameters, ParameterLocation::Header).collect::<Vec<_>>();

    let mut members = Vec::new();
    if let Some(content_type) = content_type {
        if !headers.iter().any(|header| header.name.eq_ignore_ascii_case("content-type")) {
            members.push(Member::property("Content-Type", TsType::literal(content_type)));
        }
    }
    for header in headers {
        let ty = lower_schema(header.schema.as_ref(), false, diagnostics).unwrap_or(TsType::STRING);
        members.push(Member::property(header.name.clone(), ty).optional(!header.required));
    }

    (!members.is_empty()).then(|| TsType::generic("TypedHeadersInit", [TsType::Object(members)]))
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn response_types(
    document: &Document,
    method: Method,
    pattern: &str,
    operation: &Operation,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<TsType>> {
    let Some(responses) = &operation.responses else {
        return Ok(Vec::new());
    };
    let expanded = status::expand(
        responses.iter().map(|(key, response)| (key.as_str(), response)),
        StatusRegistry::standard(),
    )
    .map_err(|InvalidStatusKey(code)| GenerateError::InvalidStatusCode {
        code,
        method: method.to_string(),
        pattern: pattern.to_string(),
    })?;

    expanded
        .into_iter()
        .map(|(codes, response)| {
            let response = document.resolve_item(response)?;
            Ok(response_type(&codes, &response, diagnostics))
        })
        .collect()
}

fn return_type(responses: Vec<TsType>) -> TsType {
    let promise = |ty| TsType::generic("Promise", [ty]);
    if responses.is_empty() {
        return promise(TsType::named("Response"));
    }
    promise(TsType::intersection([
        omit_type("Response", &RESPONSE_ACCESSORS),
        TsType::union(responses),
    ]))
}

fn omit_type(base: &str, keys: &[&str]) -> TsType {
    let keys = TsType::union(keys.iter().map(|key| TsType::literal(*key)));
    TsType::generic("Omit", [TsType::named(base), keys])
}

fn operation_docs(operation: &Operation) -> Option<JsDoc> {
    let mut docs = JsDoc {
        description: non_empty(operation.description.as_deref()).map(str::to_string),
        ..JsDoc::default()
    };
    if operation.deprecated {
        docs.tag("deprecated", None);
    }
    if let Some(summary) = non_empty(operation.summary.as_deref()) {
        docs.tag("summary", Some(summary.to_string()));
    }
    docs.non_empty()
}

fn discriminator_parameters(options: &Options) -> Vec<TypeParameter> {
    let Some(name) = options.experimental_discriminator.as_deref().filter(|name| !name.is_empty()) else {
        return Vec::new();
    };
    let literal = TsType::literal(name);
    vec![TypeParameter {
        name: "T".to_string(),
        constraint: Some(literal.clone()),
        default: (!options.experimental_require_discriminator).then_some(literal),
    }]
}

/// Server URL without trailing slash, `{variables}` substituted.
fn server_url(server: &Server) -> Vec<TemplatePart> {
    let url = server.url.strip_suffix('/').unwrap_or(&server.url);
    let mut parts = Vec::new();
    let mut rest = url;
    while let Some(start) = rest.find('{') {
        let Some(length) = rest[start..].find('}') else { break };
        let end = start + length;
        match server.variables.get(&rest[start + 1..end]) {
            Some(variable) => {
                push_text(&mut parts, &rest[..start]);
                let ty = match &variable.enum_ {
                    Some(values) if !values.is_empty() => {
                        TsType::union(values.iter().map(|value| TsType::literal(value.as_str())))
                    }
                    _ => TsType::literal(variable.default.as_str()),
                };
                parts.push(TemplatePart::Type(ty));
            }
            None => push_text(&mut parts, &rest[..=end]),
        }
        rest = &rest[end + 1..];
    }
    push_text(&mut parts, rest);
    parts
}

fn prefixed(mut prefix: Vec<TemplatePart>, path: &[TemplatePart]) -> TsType {
    for part in path {
        match part {
            TemplatePart::Text(text) => push_text(&mut prefix, text),
            other => prefix.push(other.clone()),
        }
    }
    TsType::Template(prefix)
}

fn push_text(parts: &mut Vec<TemplatePart>, text: &str) {
    if text.is_empty() {
        return;
    }
    match parts.last_mut() {
        Some(TemplatePart::Text(last)) => last.push_str(text),
        _ => parts.push(TemplatePart::Text(text.to_string())),
    }
}
