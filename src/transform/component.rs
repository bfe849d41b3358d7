//! Component metadata transformer
//!
//! INSTANCE nodes carry a bound component id and a map of property
//! overrides. Property names are keyed as `Name#nodeId` in the raw response;
//! only the human-readable part before the `#` is kept. The flattened list is
//! sorted by name so output is stable across runs.

use crate::extract::model::SimplifiedComponentProperty;
use crate::types::{NodeType, RawNode};

/// Bound component id, for instance nodes only
pub fn extract_component_id(node: &RawNode) -> Option<String> {
    if node.node_type != NodeType::Instance {
        return None;
    }
    node.component_id.clone()
}

/// Flattened `{name, value, type}` property overrides, for instance nodes
pub fn extract_component_properties(node: &RawNode) -> Option<Vec<SimplifiedComponentProperty>> {
    if node.node_type != NodeType::Instance {
        return None;
    }
    let properties = node.component_properties.as_ref()?;
    if properties.is_empty() {
        return None;
    }

    let mut flattened: Vec<SimplifiedComponentProperty> = properties
        .iter()
        .map(|(raw_name, property)| SimplifiedComponentProperty {
            name: raw_name.split('#').next().unwrap_or(raw_name).to_string(),
            value: property.value.clone(),
            property_type: property.property_type.clone(),
        })
        .collect();
    flattened.sort_by(|a, b| a.name.cmp(&b.name));

    Some(flattened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> RawNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_instance_component_id() {
        let raw = node(json!({
            "id": "1:1", "name": "Button", "type": "INSTANCE", "componentId": "2:1"
        }));
        assert_eq!(extract_component_id(&raw).as_deref(), Some("2:1"));
    }

    #[test]
    fn test_non_instance_skipped() {
        let raw = node(json!({
            "id": "1:1", "name": "Button", "type": "FRAME", "componentId": "2:1"
        }));
        assert!(extract_component_id(&raw).is_none());
        assert!(extract_component_properties(&raw).is_none());
    }

    #[test]
    fn test_properties_flattened_and_sorted() {
        let raw = node(json!({
            "id": "1:1", "name": "Button", "type": "INSTANCE",
            "componentId": "2:1",
            "componentProperties": {
                "Variant#12:0": { "value": "Primary", "type": "VARIANT" },
                "Disabled#12:1": { "value": false, "type": "BOOLEAN" }
            }
        }));
        let props = extract_component_properties(&raw).unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].name, "Disabled");
        assert_eq!(props[0].value, json!(false));
        assert_eq!(props[1].name, "Variant");
        assert_eq!(props[1].property_type, "VARIANT");
    }

    #[test]
    fn test_empty_properties_skipped() {
        let raw = node(json!({
            "id": "1:1", "name": "Button", "type": "INSTANCE",
            "componentId": "2:1",
            "componentProperties": {}
        }));
        assert!(extract_component_properties(&raw).is_none());
    }
}
