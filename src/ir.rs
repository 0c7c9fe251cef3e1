// Strongly-typed IR for generated TypeScript types. Built by the lowering
// passes, only ever combined and rendered, never parsed back.

use std::fmt::{self, Display, Write};

use serde_json::Value;

use crate::case::escape_object_key;

#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    Keyword(Keyword),
    /// A JSON literal: `"a"`, `1`, `true`, `null`.
    Literal(Value),
    /// A named type, optionally applied to arguments: `Pet`, `Promise<T>`.
    Named { name: String, args: Vec<TsType> },
    /// A template literal type: `` `/pets/${string}` ``.
    Template(Vec<TemplatePart>),
    Array(Box<TsType>),
    Object(Vec<Member>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
    Never,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Text(String),
    Type(TsType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub optional: bool,
    pub readonly: bool,
    pub kind: MemberKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Property(TsType),
    /// A zero-argument method: `json(): Promise<T>`.
    Method(TsType),
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

impl TsType {
    pub const STRING: TsType = TsType::Keyword(Keyword::String);
    pub const NUMBER: TsType = TsType::Keyword(Keyword::Number);
    pub const BOOLEAN: TsType = TsType::Keyword(Keyword::Boolean);
    pub const NULL: TsType = TsType::Keyword(Keyword::Null);
    pub const UNKNOWN: TsType = TsType::Keyword(Keyword::Unknown);
    pub const NEVER: TsType = TsType::Keyword(Keyword::Never);

    pub fn named(name: impl Into<String>) -> Self {
        TsType::Named { name: name.into(), args: Vec::new() }
    }

    pub fn generic(name: impl Into<String>, args: impl IntoIterator<Item = TsType>) -> Self {
        TsType::Named { name: name.into(), args: args.into_iter().collect() }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        TsType::Literal(value.into())
    }

    pub fn array(item: TsType) -> Self {
        TsType::Array(Box::new(item))
    }

    /// `Record<string, value>`.
    pub fn record(value: TsType) -> Self {
        TsType::generic("Record", [TsType::STRING, value])
    }

    /// `` `${inner}` ``: the set of strings `String(value)` can produce.
    pub fn stringified(inner: TsType) -> Self {
        TsType::Template(vec![TemplatePart::Type(inner)])
    }

    /// Flattening union. No members is `never`; one member is returned as is.
    pub fn union(members: impl IntoIterator<Item = TsType>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                TsType::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => TsType::NEVER,
            1 => flat.remove(0),
            _ => TsType::Union(flat),
        }
    }

    /// Flattening intersection. No members is `unknown`.
    pub fn intersection(members: impl IntoIterator<Item = TsType>) -> Self {
        let mut flat = Vec::new();
        for member in members {
            match member {
                TsType::Intersection(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => TsType::UNKNOWN,
            1 => flat.remove(0),
            _ => TsType::Intersection(flat),
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, TsType::Keyword(k) if *k == keyword)
    }
}

impl Member {
    pub fn property(name: impl Into<String>, ty: TsType) -> Self {
        Member { name: name.into(), optional: false, readonly: false, kind: MemberKind::Property(ty) }
    }

    pub fn method(name: impl Into<String>, returns: TsType) -> Self {
        Member { name: name.into(), optional: false, readonly: false, kind: MemberKind::Method(returns) }
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RENDERING
// ————————————————————————————————————————————————————————————————————————————

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::String => "string",
            Keyword::Number => "number",
            Keyword::Boolean => "boolean",
            Keyword::Null => "null",
            Keyword::Unknown => "unknown",
            Keyword::Never => "never",
        }
    }
}

// binding strength, loosest first
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Union,
    Intersection,
    Postfix,
}

impl TsType {
    fn prec(&self) -> Prec {
        match self {
            TsType::Union(_) => Prec::Union,
            TsType::Intersection(_) => Prec::Intersection,
            _ => Prec::Postfix,
        }
    }

    fn write_at(&self, f: &mut fmt::Formatter<'_>, min: Prec) -> fmt::Result {
        if self.prec() < min {
            f.write_char('(')?;
            self.write_bare(f)?;
            return f.write_char(')');
        }
        self.write_bare(f)
    }

    fn write_bare(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsType::Keyword(keyword) => f.write_str(keyword.as_str()),
            TsType::Literal(value) => write!(f, "{value}"),
            TsType::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_char('<')?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        arg.write_at(f, Prec::Union)?;
                    }
                    f.write_char('>')?;
                }
                Ok(())
            }
            TsType::Template(parts) => {
                f.write_char('`')?;
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => f.write_str(&escape_template_text(text))?,
                        TemplatePart::Type(ty) => write!(f, "${{{ty}}}")?,
                    }
                }
                f.write_char('`')
            }
            TsType::Array(item) => {
                item.write_at(f, Prec::Postfix)?;
                f.write_str("[]")
            }
            TsType::Object(members) => {
                if members.is_empty() {
                    return f.write_str("{}");
                }
                f.write_str("{ ")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str(" }")
            }
            TsType::Union(members) => write_joined(f, members, " | ", Prec::Intersection),
            TsType::Intersection(members) => write_joined(f, members, " & ", Prec::Postfix),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, members: &[TsType], sep: &str, min: Prec) -> fmt::Result {
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        member.write_at(f, min)?;
    }
    Ok(())
}

impl Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_at(f, Prec::Union)
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.readonly {
            f.write_str("readonly ")?;
        }
        f.write_str(&escape_object_key(&self.name))?;
        if self.optional {
            f.write_char('?')?;
        }
        match &self.kind {
            MemberKind::Property(ty) => write!(f, ": {ty}"),
            MemberKind::Method(returns) => write!(f, "(): {returns}"),
        }
    }
}

fn escape_template_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unions_flatten_and_collapse() {
        let inner = TsType::union([TsType::STRING, TsType::NUMBER]);
        assert_eq!(TsType::union([inner, TsType::NULL]).to_string(), "string | number | null");
        assert_eq!(TsType::union([TsType::STRING]), TsType::STRING);
        assert_eq!(TsType::union([]), TsType::NEVER);
    }

    #[test]
    fn precedence_adds_parentheses_only_where_needed() {
        let union = TsType::union([TsType::named("A"), TsType::named("B")]);
        let both = TsType::intersection([union.clone(), TsType::named("C")]);
        assert_eq!(both.to_string(), "(A | B) & C");
        assert_eq!(TsType::array(union).to_string(), "(A | B)[]");
        assert_eq!(TsType::array(TsType::STRING).to_string(), "string[]");
        let inter = TsType::intersection([TsType::named("A"), TsType::named("B")]);
        assert_eq!(TsType::union([inter, TsType::NULL]).to_string(), "A & B | null");
    }

    #[test]
    fn generics_and_literals() {
        let ty = TsType::generic("Exclude", [TsType::STRING, TsType::literal("a")]);
        assert_eq!(ty.to_string(), r#"Exclude<string, "a">"#);
        assert_eq!(TsType::record(TsType::UNKNOWN).to_string(), "Record<string, unknown>");
        assert_eq!(TsType::literal(1).to_string(), "1");
        assert_eq!(TsType::Literal(Value::Null).to_string(), "null");
    }

    #[test]
    fn templates_nest_and_escape() {
        let query = TsType::Template(vec![
            TemplatePart::Text("?".into()),
            TemplatePart::Type(TsType::named("Q")),
        ]);
        let ty = TsType::Template(vec![
            TemplatePart::Text("/a`b".into()),
            TemplatePart::Type(TsType::union([query, TsType::literal("")])),
        ]);
        assert_eq!(ty.to_string(), r#"`/a\`b${`?${Q}` | ""}`"#);
        assert_eq!(TsType::stringified(TsType::NUMBER).to_string(), "`${number}`");
    }

    #[test]
    fn object_members() {
        let ty = TsType::Object(vec![
            Member::property("name", TsType::STRING),
            Member::property("x-tag", TsType::STRING).optional(true),
            Member::property("body", TsType::named("ReadableStream")).readonly(),
            Member::method("json", TsType::generic("Promise", [TsType::UNKNOWN])),
        ]);
        assert_eq!(
            ty.to_string(),
            r#"{ name: string; "x-tag"?: string; readonly body: ReadableStream; json(): Promise<unknown> }"#
        );
        assert_eq!(TsType::Object(vec![]).to_string(), "{}");
    }
}
