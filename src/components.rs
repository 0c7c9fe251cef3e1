//! `components.schemas` → exported type aliases.
use rayon::prelude::*;
use serde_json::Value;
use tracing::debug;

use crate::case::pascal_case;
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::ir::TsType;
use crate::lower::lower_schema;
use crate::openapi::{Document, Schema};
use crate::writer::{JsDoc, Scope, TypeAlias, non_empty};

/// One exported alias per component schema, in declaration order. Every
/// schema degrades to some type, so nothing here is fatal.
pub fn add_components(document: &Document, scope: &mut Scope) -> Vec<Diagnostic> {
    let results = document
        .spec()
        .components
        .schemas
        .par_iter()
        .map(|(name, schema)| {
            debug!(%name, "generating component");
            let mut diagnostics = Diagnostics::at(format!("#/components/schemas/{name}"));
            let alias = component_alias(name, schema, &mut diagnostics);
            (alias, diagnostics.into_vec())
        })
        .collect::<Vec<_>>();

    let mut diagnostics = Vec::new();
    for (alias, found) in results {
        scope.add_type_aliases([alias]);
        diagnostics.extend(found);
    }
    diagnostics
}

pub fn component_alias(name: &str, schema: &Schema, diagnostics: &mut Diagnostics) -> TypeAlias {
    TypeAlias {
        docs: schema.as_item().and_then(|object| {
            let mut docs = JsDoc::default();
            if object.deprecated {
                docs.tag("deprecated", None);
            }

            let title = non_empty(object.title.as_deref());
            let description = non_empty(object.description.as_deref());
            docs.description = match (title, description) {
                (Some(title), Some(description)) => Some(format!("# {title}\n{description}")),
                (Some(title), None) => Some(format!("# {title}")),
                (None, description) => description.map(str::to_string),
            };

            if let Some(example) = object.example.as_ref().filter(|example| is_present(example)) {
                docs.tag("example", Some(pretty(example)));
            }
            if let Some(Value::Array(examples)) = &object.examples {
                for example in examples {
                    docs.tag("example", Some(pretty(example)));
                }
            }
            if let Some(default) = &object.default {
                docs.tag("default", Some(pretty(default)));
            }
            docs.non_empty()
        }),
        name: pascal_case(name),
        ty: lower_schema(Some(schema), false, diagnostics).unwrap_or(TsType::UNKNOWN),
    }
}

/// `null`, `""`, `[]` and `{}` carry nothing worth an `@example`.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aliases(schemas: Value) -> Vec<TypeAlias> {
        let document = Document::from_value(json!({"components": {"schemas": schemas}})).unwrap();
        let mut scope = Scope::default();
        add_components(&document, &mut scope);
        scope.type_aliases
    }

    #[test]
    fn names_and_types() {
        let aliases = aliases(json!({
            "pet-status": {"enum": ["available", "sold"]},
            "Pet": {"type": "object", "properties": {"status": {"$ref": "#/components/schemas/pet-status"}}},
            "Blob": {}
        }));
        let rendered = aliases
            .iter()
            .map(|alias| format!("{} = {}", alias.name, alias.ty))
            .collect::<Vec<_>>();
        assert_eq!(
            rendered,
            [
                "PetStatus = \"available\" | \"sold\"",
                "Pet = { status?: PetStatus }",
                "Blob = unknown",
            ]
        );
    }

    #[test]
    fn docs_from_schema_metadata() {
        let aliases = aliases(json!({
            "Pet": {
                "title": "A pet",
                "description": "Lives in the store.",
                "deprecated": true,
                "example": {"name": "Rex"},
                "default": null,
                "type": "object"
            },
            "Plain": {"type": "string"}
        }));

        let docs = aliases[0].docs.clone().unwrap();
        assert_eq!(docs.description.as_deref(), Some("# A pet\nLives in the store."));
        let tags = docs.tags.iter().map(|tag| (tag.name.as_str(), tag.text.as_deref())).collect::<Vec<_>>();
        assert_eq!(
            tags,
            [
                ("deprecated", None),
                ("example", Some("{\n  \"name\": \"Rex\"\n}")),
                ("default", Some("null")),
            ]
        );
        assert_eq!(aliases[1].docs, None);
    }

    #[test]
    fn empty_examples_are_skipped() {
        let aliases = aliases(json!({
            "A": {"type": "string", "example": null},
            "B": {"type": "string", "example": ""},
            "C": {"type": "object", "example": {}},
            "D": {"type": "array", "example": [], "title": "List"},
            "E": {"type": "integer", "example": 0}
        }));
        assert_eq!(aliases[0].docs, None);
        assert_eq!(aliases[1].docs, None);
        assert_eq!(aliases[2].docs, None);
        let list = aliases[3].docs.clone().unwrap();
        assert_eq!(list.description.as_deref(), Some("# List"));
        assert!(list.tags.is_empty());
        assert_eq!(aliases[4].docs.clone().unwrap().tags[0].text.as_deref(), Some("0"));
    }

    #[test]
    fn examples_array_adds_one_tag_each() {
        let aliases = aliases(json!({"Id": {"type": "integer", "examples": [1, 2]}}));
        let docs = aliases[0].docs.clone().unwrap();
        assert_eq!(docs.tags.len(), 2);
        assert_eq!(docs.tags[1].text.as_deref(), Some("2"));
    }

    #[test]
    fn diagnostics_carry_the_component_location() {
        let document = Document::from_value(json!({"components": {"schemas": {"Either": {"anyOf": [
            {"type": "object", "properties": {"a": {"type": "string"}}},
            {"type": "object", "properties": {"b": {"type": "string"}}}
        ]}}}}))
        .unwrap();
        let mut scope = Scope::default();
        let diagnostics = add_components(&document, &mut scope);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location, "#/components/schemas/Either");
    }
}
