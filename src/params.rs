use indexmap::IndexMap;

use crate::error::Result;
use crate::openapi::{Document, Parameter, ParameterLocation, ReferenceOr};

/// Parameters of one (pattern, method) pair, keyed by name, in insertion order.
pub type ParameterMap = IndexMap<String, Parameter>;

/// Resolve each entry and insert it by name. An entry replaces an earlier one
/// with the same name, keeping the earlier position.
pub fn add_parameters(
    document: &Document,
    parameters: &[ReferenceOr<Parameter>],
    map: &mut ParameterMap,
) -> Result<()> {
    for parameter in parameters {
        let parameter = document.resolve_item(parameter)?;
        map.insert(parameter.name.clone(), parameter);
    }
    Ok(())
}

/// Path-level parameters overlaid by operation-level ones.
pub fn merge_parameters(
    document: &Document,
    shared: &[ReferenceOr<Parameter>],
    own: &[ReferenceOr<Parameter>],
) -> Result<ParameterMap> {
    let mut map = ParameterMap::new();
    add_parameters(document, shared, &mut map)?;
    add_parameters(document, own, &mut map)?;
    Ok(map)
}

pub fn in_location(map: &ParameterMap, location: ParameterLocation) -> impl Iterator<Item = &Parameter> {
    map.values().filter(move |parameter| parameter.location == location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn parameters(value: Value) -> Vec<ReferenceOr<Parameter>> {
        serde_json::from_value(value).unwrap()
    }

    fn document() -> Document {
        Document::from_value(json!({
            "components": {"parameters": {
                "Limit": {"name": "limit", "in": "query", "schema": {"type": "integer"}}
            }}
        }))
        .unwrap()
    }

    #[test]
    fn operation_level_wins() {
        let shared = parameters(json!([
            {"name": "id", "in": "path", "required": false},
            {"name": "q", "in": "query"}
        ]));
        let own = parameters(json!([{"name": "id", "in": "path", "required": true}]));
        let map = merge_parameters(&document(), &shared, &own).unwrap();
        assert_eq!(map.len(), 2);
        assert!(map["id"].required);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["id", "q"]);
    }

    #[test]
    fn references_are_resolved() {
        let own = parameters(json!([{"$ref": "#/components/parameters/Limit"}]));
        let map = merge_parameters(&document(), &[], &own).unwrap();
        assert_eq!(map["limit"].location, ParameterLocation::Query);
        assert_eq!(in_location(&map, ParameterLocation::Query).count(), 1);
        assert_eq!(in_location(&map, ParameterLocation::Header).count(), 0);
    }

    #[test]
    fn dangling_reference_is_fatal() {
        let own = parameters(json!([{"$ref": "#/components/parameters/Missing"}]));
        assert!(merge_parameters(&document(), &[], &own).is_err());
    }
}
