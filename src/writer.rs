//! Declarations and the generated `.d.ts` source file.
//!
//! The core appends [`FunctionSignature`]s and [`TypeAlias`]es to a
//! [`Scope`]; [`SourceFile::render`] turns the scopes into text.
use std::fmt::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::ir::TsType;
use crate::openapi::Info;

const INDENT: &str = "  ";

// ————————————————————————————————————————————————————————————————————————————
// DECLARATIONS
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsDoc {
    pub description: Option<String>,
    pub tags: Vec<JsDocTag>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsDocTag {
    pub name: String,
    pub text: Option<String>,
}

impl JsDoc {
    pub fn tag(&mut self, name: &str, text: Option<String>) {
        self.tags.push(JsDocTag { name: name.to_string(), text });
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_empty()
    }

    /// `None` when there is nothing to document.
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub name: String,
    pub constraint: Option<TsType>,
    pub default: Option<TsType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub optional: bool,
    pub ty: TsType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub docs: Option<JsDoc>,
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: TsType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub docs: Option<JsDoc>,
    pub name: String,
    pub ty: TsType,
}

/// A target for generated declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub functions: Vec<FunctionSignature>,
    pub type_aliases: Vec<TypeAlias>,
}

impl Scope {
    pub fn add_functions(&mut self, functions: impl IntoIterator<Item = FunctionSignature>) {
        self.functions.extend(functions);
    }

    pub fn add_type_aliases(&mut self, aliases: impl IntoIterator<Item = TypeAlias>) {
        self.type_aliases.extend(aliases);
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SOURCE FILE
// ————————————————————————————————————————————————————————————————————————————

/// Non-core output settings.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// Root the helper type modules are imported from.
    pub import_root: String,
    pub generated_at: DateTime<Utc>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self { import_root: "./fetchtype".to_string(), generated_at: Utc::now() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub names: Vec<String>,
    pub module: String,
}

#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub header: String,
    pub imports: Vec<Import>,
    /// Rendered inside `declare global { ... }`.
    pub global: Scope,
    /// Rendered at module level, exported.
    pub module: Scope,
}

impl SourceFile {
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.header);

        for import in &self.imports {
            let _ = writeln!(
                out,
                "import type {{ {} }} from {};",
                import.names.join(", "),
                serde_json::Value::from(import.module.as_str())
            );
        }
        if !self.imports.is_empty() {
            out.push('\n');
        }

        if !self.global.functions.is_empty() {
            out.push_str("declare global {\n");
            for (i, function) in self.global.functions.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                write_function(&mut out, function, INDENT);
            }
            out.push_str("}\n");
        }

        for alias in &self.module.type_aliases {
            out.push('\n');
            if let Some(docs) = &alias.docs {
                write_docs(&mut out, docs, "");
            }
            let _ = writeln!(out, "export type {} = {};", alias.name, alias.ty);
        }

        out
    }
}

/// `` `<root>/types/<name>` ``, with `.ts` appended when the root is a URL.
pub fn helper_module(import_root: &str, name: &str) -> String {
    let root = import_root.trim_end_matches('/');
    let is_url = ["http://", "https://", "file://"].iter().any(|scheme| root.starts_with(scheme));
    format!("{root}/types/{name}{}", if is_url { ".ts" } else { "" })
}

/// Leading comment and module JSDoc built from `info`.
pub fn module_header(info: &Info, generated_at: &DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "// This file was automatically generated by fetchtype at {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    out.push('\n');

    out.push_str("/**\n");
    let _ = writeln!(out, " * # {}", escape_comment(info.title.trim()));
    if let Some(description) = non_empty(info.description.as_deref()) {
        out.push_str(" *\n");
        for line in description.lines() {
            let _ = writeln!(out, "{}", comment_line(line));
        }
    }
    if let Some(summary) = non_empty(info.summary.as_deref()) {
        let _ = writeln!(out, " * @summary {}", escape_comment(summary));
    }
    out.push_str(" *\n");
    let _ = writeln!(out, " * @version {}", escape_comment(info.version.trim()));
    if let Some(license) = non_empty(info.license.as_ref().and_then(|l| l.name.as_deref())) {
        let _ = writeln!(out, " * @license {}", escape_comment(license));
    }
    if let Some(contact) = &info.contact {
        if let Some(name) = non_empty(contact.name.as_deref()) {
            let mut author = format!(" * @author {}", escape_comment(name));
            if let Some(email) = non_empty(contact.email.as_deref()) {
                let _ = write!(author, " <{}>", escape_comment(email));
            }
            let _ = writeln!(out, "{author}");
        }
    }
    out.push_str(" * @module\n");
    out.push_str(" */\n\n");
    out
}

/// Trimmed text, or `None` when empty.
pub fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_function(out: &mut String, function: &FunctionSignature, indent: &str) {
    if let Some(docs) = &function.docs {
        write_docs(out, docs, indent);
    }
    let _ = write!(out, "{indent}function {}", function.name);
    if !function.type_parameters.is_empty() {
        out.push('<');
        for (i, param) in function.type_parameters.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&param.name);
            if let Some(constraint) = &param.constraint {
                let _ = write!(out, " extends {constraint}");
            }
            if let Some(default) = &param.default {
                let _ = write!(out, " = {default}");
            }
        }
        out.push('>');
    }
    out.push('(');
    for (i, param) in function.parameters.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}{}: {}", param.name, if param.optional { "?" } else { "" }, param.ty);
    }
    let _ = writeln!(out, "): {};", function.return_type);
}

fn write_docs(out: &mut String, docs: &JsDoc, indent: &str) {
    let _ = writeln!(out, "{indent}/**");
    if let Some(description) = &docs.description {
        for line in description.lines() {
            let _ = writeln!(out, "{indent}{}", comment_line(line));
        }
        if !docs.tags.is_empty() {
            let _ = writeln!(out, "{indent} *");
        }
    }
    for tag in &docs.tags {
        match &tag.text {
            None => {
                let _ = writeln!(out, "{indent} * @{}", tag.name);
            }
            Some(text) => {
                let mut lines = text.lines();
                let first = lines.next().unwrap_or_default();
                let _ = writeln!(out, "{indent} * @{} {}", tag.name, escape_comment(first));
                for line in lines {
                    let _ = writeln!(out, "{indent}{}", comment_line(line));
                }
            }
        }
    }
    let _ = writeln!(out, "{indent} */");
}

fn comment_line(line: &str) -> String {
    if line.trim().is_empty() {
        " *".to_string()
    } else {
        format!(" * {}", escape_comment(line.trim_end()))
    }
}

fn escape_comment(text: &str) -> String {
    text.replace("*/", "*\\/")
}
