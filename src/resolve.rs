//! Same-document `$ref` resolution.
//!
//! Pointers are plain string lookups into the immutable raw tree. A resolved
//! value may itself be a `$ref`; [`resolve_chain`] follows such chains and
//! refuses to revisit a pointer.
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{GenerateError, Result};
use crate::openapi::{Document, ReferenceOr};
use crate::path_de;

/// Walk `reference` (which must start with `#/`) through `root`.
pub fn resolve<'a>(root: &'a Value, reference: &str) -> Result<&'a Value> {
    let Some(pointer) = reference.strip_prefix("#/") else {
        return Err(GenerateError::UnsupportedReference(reference.to_string()));
    };

    let mut value = root;
    for raw_segment in pointer.split('/') {
        let segment = unescape_segment(raw_segment);
        value = match value {
            Value::Null => {
                return Err(GenerateError::NullishReference {
                    reference: reference.to_string(),
                    segment,
                });
            }
            Value::Object(map) => map.get(&segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => {
                return Err(GenerateError::NonTraversableReference {
                    reference: reference.to_string(),
                    segment,
                });
            }
        }
        .ok_or_else(|| GenerateError::MissingReference {
            reference: reference.to_string(),
            segment: segment.clone(),
        })?;
    }

    Ok(value)
}

/// Resolve `reference`, then keep following while the target is itself a
/// `{ "$ref": ... }` object.
pub fn resolve_chain<'a>(root: &'a Value, reference: &str) -> Result<&'a Value> {
    let mut chain = vec![reference.to_string()];
    let mut value = resolve(root, reference)?;

    while let Some(next) = value.get("$ref").and_then(Value::as_str) {
        if chain.iter().any(|seen| seen == next) {
            chain.push(next.to_string());
            return Err(GenerateError::ReferenceCycle { chain });
        }
        chain.push(next.to_string());
        value = resolve(root, next)?;
    }

    Ok(value)
}

impl Document {
    /// Raw lookup, see [`resolve`].
    pub fn resolve(&self, reference: &str) -> Result<&Value> {
        resolve(self.raw(), reference)
    }

    /// Follow `reference` to a non-reference value and deserialize it as `T`.
    pub fn resolve_as<T: DeserializeOwned>(&self, reference: &str) -> Result<T> {
        let value = resolve_chain(self.raw(), reference)?;
        path_de::from_value_at(reference, value.clone())
    }

    /// Inline items are cloned; references are resolved and deserialized.
    pub fn resolve_item<T>(&self, item: &ReferenceOr<T>) -> Result<T>
    where
        T: DeserializeOwned + Clone,
    {
        match item {
            ReferenceOr::Item(value) => Ok(value.clone()),
            ReferenceOr::Reference { reference } => self.resolve_as(reference),
        }
    }
}

/// JSON pointer escapes: `~1` is `/`, `~0` is `~`.
fn unescape_segment(segment: &str) -> String {
    if segment.contains('~') {
        segment.replace("~1", "/").replace("~0", "~")
    } else {
        segment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::Parameter;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "components": {
                "schemas": {
                    "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
                },
                "parameters": {
                    "Id": {"name": "id", "in": "path", "required": true},
                    "Alias": {"$ref": "#/components/parameters/Id"},
                    "LoopA": {"$ref": "#/components/parameters/LoopB"},
                    "LoopB": {"$ref": "#/components/parameters/LoopA"}
                }
            },
            "paths": {"/pets/{id}": {"servers": [{"url": "a"}, {"url": "b"}]}},
            "x-misc": {"nothing": null, "label": "text"}
        })
    }

    #[test]
    fn returns_the_exact_subtree() {
        let doc = document();
        let pet = resolve(&doc, "#/components/schemas/Pet").unwrap();
        assert_eq!(pet, &doc["components"]["schemas"]["Pet"]);
    }

    #[test]
    fn missing_segment_fails() {
        let doc = document();
        assert!(matches!(
            resolve(&doc, "#/missing/x"),
            Err(GenerateError::MissingReference { segment, .. }) if segment == "missing"
        ));
    }

    #[test]
    fn null_intermediate_fails() {
        let doc = document();
        assert!(matches!(
            resolve(&doc, "#/x-misc/nothing/type"),
            Err(GenerateError::NullishReference { .. })
        ));
    }

    #[test]
    fn scalar_intermediate_fails() {
        let doc = document();
        assert!(matches!(
            resolve(&doc, "#/x-misc/label/type"),
            Err(GenerateError::NonTraversableReference { .. })
        ));
    }

    #[test]
    fn only_local_pointers_are_accepted() {
        let doc = document();
        assert!(matches!(
            resolve(&doc, "other.yaml#/components/schemas/Pet"),
            Err(GenerateError::UnsupportedReference(_))
        ));
    }

    #[test]
    fn escaped_segments_and_array_indices() {
        let doc = document();
        let url = resolve(&doc, "#/paths/~1pets~1{id}/servers/1/url").unwrap();
        assert_eq!(url, "b");
    }

    #[test]
    fn chains_are_followed() {
        let doc = Document::from_value(document()).unwrap();
        let parameter: Parameter = doc.resolve_as("#/components/parameters/Alias").unwrap();
        assert_eq!(parameter.name, "id");
        assert!(parameter.required);
    }

    #[test]
    fn cycles_are_fatal() {
        let doc = document();
        match resolve_chain(&doc, "#/components/parameters/LoopA") {
            Err(GenerateError::ReferenceCycle { chain }) => assert_eq!(
                chain,
                [
                    "#/components/parameters/LoopA",
                    "#/components/parameters/LoopB",
                    "#/components/parameters/LoopA"
                ]
            ),
            other => panic!("expected a cycle, got {other:?}"),
        }
    }
}
