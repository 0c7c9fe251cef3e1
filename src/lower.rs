//! Schema → type lowering.
//!
//! One node may carry several modifiers at once, so this is a fixed-priority
//! cascade rather than a match over exclusive cases: the first modifier that
//! is present is handled and stripped, and the rest of the node is lowered
//! recursively.
//!
//! 1. `$ref`                 → nominal type
//! 2. `nullable`             → `T | null`
//! 3. `not`                  → `Exclude<T, N>`
//! 4. `additionalProperties` → `T & Record<string, V>`
//! 5. `allOf`                → intersection
//! 6. `oneOf`                → union (widened)
//! 7. `anyOf`                → de-duplicated union (widened unless safe)
//! 8. `enum`                 → literal union
//! 9. `type`                 → scalar / record / array / null
//!
//! `None` means "no representable type"; callers fall back to `unknown` or
//! whatever open type fits their position.
use crate::case::pascal_case;
use crate::diagnostic::{DiagnosticKind, Diagnostics};
use crate::ir::{Keyword, Member, TsType};
use crate::openapi::{AdditionalProperties, Schema, SchemaObject, SchemaType};

/// Lower `schema` to a type. With `coerce_to_string`, scalars lower to the
/// strings they stringify to (query strings, form bodies).
pub fn lower_schema(
    schema: Option<&Schema>,
    coerce_to_string: bool,
    diagnostics: &mut Diagnostics,
) -> Option<TsType> {
    match schema? {
        Schema::Reference { reference } => Some(TsType::named(reference_name(reference))),
        Schema::Item(object) => lower_object(object, coerce_to_string, diagnostics),
    }
}

/// Type name for a `$ref`: PascalCase of the last pointer segment.
pub fn reference_name(reference: &str) -> String {
    let last = reference.rsplit('/').next().unwrap_or(reference);
    pascal_case(&last.replace("~1", "/").replace("~0", "~"))
}

fn lower_object(object: &SchemaObject, coerce: bool, diagnostics: &mut Diagnostics) -> Option<TsType> {
    // `nullable: false` is the OpenAPI default, so only `true` widens.
    if object.nullable == Some(true) {
        let rest = SchemaObject { nullable: None, ..object.clone() };
        return Some(match lower_object(&rest, coerce, diagnostics) {
            Some(base) => TsType::union([base, TsType::NULL]),
            None => TsType::NULL,
        });
    }

    if let Some(not) = &object.not {
        let rest = SchemaObject { not: None, ..object.clone() };
        let base = lower_object(&rest, coerce, diagnostics)?;
        return Some(match lower_schema(Some(not), coerce, diagnostics) {
            Some(excluded) => TsType::generic("Exclude", [base, excluded]),
            None => base,
        });
    }

    if let Some(additional) = object.additional_properties.as_ref().filter(|ap| ap.is_truthy()) {
        let rest = SchemaObject { additional_properties: None, ..object.clone() };
        let base = lower_object(&rest, coerce, diagnostics)?;
        let values = match additional {
            AdditionalProperties::Schema(schema) => lower_schema(Some(schema), coerce, diagnostics),
            AdditionalProperties::Bool(_) => None,
        };
        let dictionary = TsType::record(values.unwrap_or(TsType::UNKNOWN));
        return Some(TsType::intersection([base, dictionary]));
    }

    if let Some(members) = &object.all_of {
        let types = members
            .iter()
            .filter_map(|member| lower_schema(Some(member), coerce, diagnostics))
            .collect::<Vec<_>>();
        return (!types.is_empty()).then(|| TsType::intersection(types));
    }

    if let Some(members) = &object.one_of {
        let types = lower_members(members, coerce, diagnostics);
        let types = widen_union(types).into_iter().flatten().collect::<Vec<_>>();
        return (!types.is_empty()).then(|| TsType::union(types));
    }

    if let Some(members) = &object.any_of {
        let objects = members.iter().filter(|member| is_object_schema(member)).count();
        if objects > 1 {
            diagnostics.push(DiagnosticKind::AnyOfObjects { members: objects });
        }

        let mut types = lower_members(members, coerce, diagnostics);
        if !members.iter().all(is_plain_schema) {
            types = widen_union(types);
        }

        let mut seen = Vec::<String>::new();
        let mut unique = Vec::new();
        for ty in types.into_iter().flatten() {
            let text = ty.to_string();
            if !seen.contains(&text) {
                seen.push(text);
                unique.push(ty);
            }
        }
        return (!unique.is_empty()).then(|| TsType::union(unique));
    }

    if let Some(values) = &object.enum_ {
        return Some(TsType::union(values.iter().cloned().map(TsType::Literal)));
    }

    match object.kind.as_ref()? {
        SchemaType::Single(name) => lower_type_name(name, object, coerce, diagnostics),
        SchemaType::Multiple(names) => {
            let types = names
                .iter()
                .filter_map(|name| lower_type_name(name, object, coerce, diagnostics))
                .collect::<Vec<_>>();
            (!types.is_empty()).then(|| TsType::union(types))
        }
    }
}

fn lower_type_name(name: &str, object: &SchemaObject, coerce: bool, diagnostics: &mut Diagnostics) -> Option<TsType> {
    let ty = match name {
        "boolean" if coerce => TsType::stringified(TsType::BOOLEAN),
        "boolean" => TsType::BOOLEAN,
        "string" => TsType::STRING,
        "number" | "integer" if coerce => TsType::stringified(TsType::NUMBER),
        "number" | "integer" => TsType::NUMBER,
        "object" => match &object.properties {
            Some(properties) if properties.is_empty() => TsType::record(TsType::NEVER),
            Some(properties) => TsType::Object(
                properties
                    .iter()
                    .map(|(key, schema)| {
                        let ty = lower_schema(Some(schema), coerce, diagnostics).unwrap_or(TsType::UNKNOWN);
                        Member::property(key.clone(), ty).optional(!object.required.contains(key))
                    })
                    .collect(),
            ),
            None if coerce => TsType::record(TsType::STRING),
            None => TsType::record(TsType::UNKNOWN),
        },
        "array" => {
            let item = lower_schema(object.items.as_deref(), coerce, diagnostics);
            match item {
                Some(item) => TsType::array(item),
                None if coerce => TsType::array(TsType::STRING),
                None => TsType::array(TsType::UNKNOWN),
            }
        }
        "null" if coerce => TsType::stringified(TsType::NULL),
        "null" => TsType::NULL,
        _ => return None,
    };
    Some(ty)
}

fn lower_members(members: &[Schema], coerce: bool, diagnostics: &mut Diagnostics) -> Vec<Option<TsType>> {
    members
        .iter()
        .map(|member| lower_schema(Some(member), coerce, diagnostics))
        .collect()
}

/// Keeps a bare `string`/`number` member from absorbing the literal members
/// next to it: `string | "a"` narrows to `string`, `NonNullable<string> | "a"`
/// keeps the literal visible.
fn widen_union(types: Vec<Option<TsType>>) -> Vec<Option<TsType>> {
    if types.len() <= 1 {
        return types;
    }
    types
        .into_iter()
        .map(|ty| match ty {
            Some(TsType::Keyword(keyword @ (Keyword::String | Keyword::Number))) => {
                Some(TsType::generic("NonNullable", [TsType::Keyword(keyword)]))
            }
            other => other,
        })
        .collect()
}

fn is_object_schema(schema: &Schema) -> bool {
    matches!(
        schema.as_item().and_then(|object| object.kind.as_ref()),
        Some(SchemaType::Single(name)) if name == "object"
    )
}

/// A `type`d schema without combinators or enums; unions of these do not
/// need widening.
fn is_plain_schema(schema: &Schema) -> bool {
    let Some(object) = schema.as_item() else { return false };
    if object.enum_.is_some() || object.one_of.is_some() || object.any_of.is_some() || object.all_of.is_some() {
        return false;
    }
    match &object.kind {
        Some(SchemaType::Single(name)) => {
            matches!(name.as_str(), "boolean" | "string" | "number" | "integer" | "object" | "array" | "null")
        }
        _ => false,
    }
}
