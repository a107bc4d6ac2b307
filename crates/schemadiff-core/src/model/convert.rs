//! Conversion from parsed Swagger 2.0 / OpenAPI 3 schema nodes
//!
//! Building a descriptor from a schema node never fails: unknown keys are
//! ignored and constraints that do not fit the node's kind (or carry a value
//! of the wrong JSON type) are kept as stray entries. Only the document level
//! rejects input whose shape cannot hold definitions at all.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::str::FromStr;

use super::element::{Definitions, ElementShape};
use super::property::{
    ArrayConstraints, NumericConstraints, NumericFamily, PropertyDescriptor, PropertyKind,
    StringConstraints,
};
use crate::errors::{Result, SchemaDiffError};

const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";
const COMPONENTS_REF_PREFIX: &str = "#/components/schemas/";

const NUMERIC_KEYS: [&str; 5] = [
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
];

/// Definition name addressed by a local `$ref`
///
/// Anything that is not a local definitions pointer is returned unchanged.
pub fn ref_target(reference: &str) -> &str {
    reference
        .strip_prefix(DEFINITIONS_REF_PREFIX)
        .or_else(|| reference.strip_prefix(COMPONENTS_REF_PREFIX))
        .unwrap_or(reference)
}

impl Definitions {
    /// Read `definitions` (Swagger 2.0) or `components.schemas` (OpenAPI 3)
    ///
    /// A document without either section yields empty definitions.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` if the root or the definitions section is
    /// not a JSON object.
    pub fn from_document(document: &Value) -> Result<Definitions> {
        let root = document
            .as_object()
            .ok_or_else(|| SchemaDiffError::InvalidDocument {
                reason: "document root must be a JSON object".to_string(),
            })?;

        let section = match root.get("definitions") {
            Some(defs) => Some(("definitions", defs)),
            None => root
                .get("components")
                .and_then(|c| c.get("schemas"))
                .map(|s| ("components.schemas", s)),
        };

        let Some((label, section)) = section else {
            tracing::debug!("document has no definitions section");
            return Ok(Definitions::new());
        };

        let schemas = section
            .as_object()
            .ok_or_else(|| SchemaDiffError::InvalidDocument {
                reason: format!("`{}` must be a JSON object", label),
            })?;

        Ok(schemas
            .iter()
            .map(|(name, node)| (name.clone(), ElementShape::from_schema(node)))
            .collect())
    }
}

impl ElementShape {
    /// Build an element shape from a model schema node
    ///
    /// Reads `properties`, `allOf` parts and a top-level `$ref` alias. Inline
    /// `allOf` parts contribute their properties directly; own properties win.
    /// The model's `required` array is kept on the shape and applied to every
    /// property it can already see. Names inherited through a composed `$ref`
    /// are marked when the resolver flattens the element.
    pub fn from_schema(node: &Value) -> ElementShape {
        let mut shape = ElementShape::new();
        let Some(obj) = node.as_object() else {
            return shape;
        };

        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            shape.all_of.push(ref_target(reference).to_string());
        }

        shape.required = required_names(obj);
        if let Some(props) = obj.get("properties").and_then(Value::as_object) {
            for (name, prop) in props {
                let listed = shape.required.contains(name).then_some(true);
                shape.properties.insert(
                    name.clone(),
                    PropertyDescriptor::from_schema(prop, listed).with_name(name.clone()),
                );
            }
        }

        if let Some(parts) = obj.get("allOf").and_then(Value::as_array) {
            for part in parts {
                let composed = ElementShape::from_schema(part);
                for (name, prop) in composed.properties {
                    shape.properties.entry(name).or_insert(prop);
                }
                shape.all_of.extend(composed.all_of);
                shape.required.extend(composed.required);
            }
        }

        let mut properties = std::mem::take(&mut shape.properties);
        shape.apply_required(&mut properties);
        shape.properties = properties;
        shape
    }
}

impl PropertyDescriptor {
    /// Build a descriptor from a property schema node
    ///
    /// `required` is the membership in the owning model's `required` array;
    /// a boolean `required` on the node itself takes precedence.
    pub fn from_schema(node: &Value, required: Option<bool>) -> PropertyDescriptor {
        let Some(obj) = node.as_object() else {
            return PropertyDescriptor::object(ElementShape::new());
        };

        let declared = obj.get("type").and_then(Value::as_str);
        let mut prop = PropertyDescriptor::new(infer_kind(obj, declared, node));

        if let Some(type_name) = declared {
            prop = prop.with_type_name(type_name);
        }
        if let Some(format) = obj.get("format").and_then(Value::as_str) {
            prop = prop.with_format(format);
        }
        if let Some(description) = obj.get("description").and_then(Value::as_str) {
            prop = prop.with_description(description);
        }
        if let Some(default) = obj.get("default") {
            prop = prop.with_default(default.clone());
        }
        if let Some(required) = obj.get("required").and_then(Value::as_bool).or(required) {
            prop = prop.with_required(required);
        }
        if let Some(read_only) = obj.get("readOnly").and_then(Value::as_bool) {
            prop = prop.with_read_only(read_only);
        }
        if let Some(access) = obj
            .get("x-access")
            .or_else(|| obj.get("access"))
            .and_then(Value::as_str)
        {
            prop = prop.with_access(access);
        }
        if let Some(values) = obj.get("enum").and_then(Value::as_array) {
            prop = prop.with_enum_values(values.clone());
        }

        apply_constraints(prop, obj)
    }
}

fn required_names(obj: &Map<String, Value>) -> BTreeSet<String> {
    obj.get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn single_ref_all_of(obj: &Map<String, Value>) -> Option<&str> {
    match obj.get("allOf").and_then(Value::as_array)?.as_slice() {
        [only] if obj.get("properties").is_none() => only.get("$ref").and_then(Value::as_str),
        _ => None,
    }
}

fn infer_kind(obj: &Map<String, Value>, declared: Option<&str>, node: &Value) -> PropertyKind {
    if let Some(reference) = obj
        .get("$ref")
        .and_then(Value::as_str)
        .or_else(|| single_ref_all_of(obj))
    {
        return PropertyKind::Reference {
            target: ref_target(reference).to_string(),
        };
    }

    match declared {
        Some("string") => PropertyKind::String(StringConstraints::default()),
        Some("integer") => PropertyKind::Numeric(NumericConstraints::new(NumericFamily::Integer)),
        Some("number") => PropertyKind::Numeric(NumericConstraints::new(NumericFamily::Number)),
        Some("boolean") => PropertyKind::Boolean,
        Some("array") => PropertyKind::Array(ArrayConstraints::default()),
        Some("object") => PropertyKind::Object(ElementShape::from_schema(node)),
        None if obj.contains_key("items") => PropertyKind::Array(ArrayConstraints::default()),
        None => PropertyKind::Object(ElementShape::from_schema(node)),
        // Vendor type names keep whichever payload their constraints fit
        Some(_) if NUMERIC_KEYS.iter().any(|k| obj.contains_key(*k)) => {
            PropertyKind::Numeric(NumericConstraints::new(NumericFamily::Number))
        }
        Some(_) => PropertyKind::String(StringConstraints::default()),
    }
}

fn apply_constraints(mut prop: PropertyDescriptor, obj: &Map<String, Value>) -> PropertyDescriptor {
    for (key, value) in obj {
        prop = match key.as_str() {
            "pattern" => match value.as_str() {
                Some(pattern) => prop.with_pattern(pattern),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            "minLength" => match value.as_u64() {
                Some(n) => prop.with_min_length(n),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            "maxLength" => match value.as_u64() {
                Some(n) => prop.with_max_length(n),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            "allowEmptyValue" => match value.as_bool() {
                Some(b) => prop.with_allow_empty_value(b),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            "minimum" => match decimal(value) {
                Some(d) => prop.with_minimum(d),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            "maximum" => match decimal(value) {
                Some(d) => prop.with_maximum(d),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            "multipleOf" => match decimal(value) {
                Some(d) => prop.with_multiple_of(d),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            "exclusiveMinimum" => exclusive_bound(prop, key, value, Bound::Lower),
            "exclusiveMaximum" => exclusive_bound(prop, key, value, Bound::Upper),
            "items" => prop.with_items(PropertyDescriptor::from_schema(value, None)),
            "minItems" => match value.as_u64() {
                Some(n) => prop.with_min_items(n),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            "maxItems" => match value.as_u64() {
                Some(n) => prop.with_max_items(n),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            "uniqueItems" => match value.as_bool() {
                Some(b) => prop.with_unique_items(b),
                None => prop.with_stray(key.clone(), value.clone()),
            },
            _ => prop,
        };
    }
    prop
}

#[derive(Clone, Copy)]
enum Bound {
    Lower,
    Upper,
}

/// Swagger 2.0 / OpenAPI 3.0 use a boolean flag; OpenAPI 3.1 puts the bound
/// itself in the exclusive keyword. A number too wide for a `Decimal` is kept
/// as a stray bound under the plain keyword.
fn exclusive_bound(prop: PropertyDescriptor, key: &str, value: &Value, bound: Bound) -> PropertyDescriptor {
    if let Some(flag) = value.as_bool() {
        return match bound {
            Bound::Lower => prop.with_exclusive_minimum(flag),
            Bound::Upper => prop.with_exclusive_maximum(flag),
        };
    }
    match (decimal(value), bound) {
        (Some(d), Bound::Lower) => prop.with_minimum(d).with_exclusive_minimum(true),
        (Some(d), Bound::Upper) => prop.with_maximum(d).with_exclusive_maximum(true),
        (None, Bound::Lower) if value.is_number() => prop
            .with_stray("minimum", value.clone())
            .with_exclusive_minimum(true),
        (None, Bound::Upper) if value.is_number() => prop
            .with_stray("maximum", value.clone())
            .with_exclusive_maximum(true),
        (None, _) => prop.with_stray(key.to_string(), value.clone()),
    }
}

/// Exact decimal for a JSON number; `None` outside the `Decimal` range
fn decimal(value: &Value) -> Option<Decimal> {
    let Value::Number(number) = value else {
        return None;
    };
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_target_strips_local_prefixes() {
        assert_eq!(ref_target("#/definitions/Account"), "Account");
        assert_eq!(ref_target("#/components/schemas/Account"), "Account");
        assert_eq!(ref_target("Account"), "Account");
        assert_eq!(ref_target("other.json#/definitions/X"), "other.json#/definitions/X");
    }

    #[test]
    fn test_string_property_with_constraints() {
        let prop = PropertyDescriptor::from_schema(
            &json!({"type": "string", "maxLength": 20, "pattern": "[a-z]+", "readOnly": true}),
            Some(true),
        );

        let expected = PropertyDescriptor::string()
            .with_type_name("string")
            .with_required(true)
            .with_read_only(true)
            .with_max_length(20)
            .with_pattern("[a-z]+");
        assert_eq!(prop, expected);
    }

    #[test]
    fn test_node_required_flag_wins_over_model_list() {
        let prop = PropertyDescriptor::from_schema(&json!({"type": "string", "required": false}), Some(true));
        assert_eq!(prop.meta().required, Some(false));
    }

    #[test]
    fn test_misplaced_constraint_is_stray() {
        let prop = PropertyDescriptor::from_schema(&json!({"type": "boolean", "maxLength": 3}), None);
        assert_eq!(prop.kind(), &PropertyKind::Boolean);
        assert_eq!(prop.stray().get("maxLength"), Some(&json!(3)));

        let wrong_type = PropertyDescriptor::from_schema(&json!({"type": "string", "maxLength": "ten"}), None);
        assert_eq!(wrong_type.stray().get("maxLength"), Some(&json!("ten")));
    }

    #[test]
    fn test_numeric_bounds_parse_as_decimal() {
        let prop = PropertyDescriptor::from_schema(
            &json!({"type": "number", "minimum": 0.5, "maximum": 1e3, "exclusiveMaximum": true}),
            None,
        );
        match prop.kind() {
            PropertyKind::Numeric(c) => {
                assert_eq!(c.minimum, Some(Decimal::new(5, 1)));
                assert_eq!(c.maximum, Some(Decimal::new(1000, 0)));
                assert_eq!(c.exclusive_maximum, Some(true));
            }
            other => panic!("expected numeric kind, got {:?}", other),
        }
    }

    #[test]
    fn test_exclusive_bound_as_number() {
        let prop = PropertyDescriptor::from_schema(&json!({"type": "integer", "exclusiveMinimum": 5}), None);
        match prop.kind() {
            PropertyKind::Numeric(c) => {
                assert_eq!(c.minimum, Some(Decimal::new(5, 0)));
                assert_eq!(c.exclusive_minimum, Some(true));
            }
            other => panic!("expected numeric kind, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_bounds_stay_numbers() {
        let prop = PropertyDescriptor::from_schema(
            &json!({"type": "number", "maximum": 1e30, "exclusiveMinimum": -1e30}),
            None,
        );
        assert_eq!(prop.stray().get("maximum"), Some(&json!(1e30)));
        assert_eq!(prop.stray().get("minimum"), Some(&json!(-1e30)));
        assert!(!prop.stray().contains_key("exclusiveMinimum"));
        match prop.kind() {
            PropertyKind::Numeric(c) => {
                assert_eq!(c.maximum, None);
                assert_eq!(c.exclusive_minimum, Some(true));
            }
            other => panic!("expected numeric kind, got {:?}", other),
        }
    }

    #[test]
    fn test_reference_and_single_all_of_reference() {
        let direct = PropertyDescriptor::from_schema(&json!({"$ref": "#/definitions/Address"}), None);
        assert_eq!(direct.reference_target(), Some("Address"));

        let wrapped = PropertyDescriptor::from_schema(
            &json!({"allOf": [{"$ref": "#/components/schemas/Address"}], "description": "home"}),
            None,
        );
        assert_eq!(wrapped.reference_target(), Some("Address"));
        assert_eq!(wrapped.meta().description.as_deref(), Some("home"));
    }

    #[test]
    fn test_array_items_and_inferred_kinds() {
        let prop = PropertyDescriptor::from_schema(
            &json!({"items": {"$ref": "#/definitions/Tag"}, "maxItems": 5}),
            None,
        );
        assert_eq!(prop.type_name(), "array");
        assert_eq!(prop.reference_target(), Some("Tag"));

        let inline = PropertyDescriptor::from_schema(&json!({"properties": {"street": {"type": "string"}}}), None);
        match inline.kind() {
            PropertyKind::Object(shape) => assert!(shape.properties.contains_key("street")),
            other => panic!("expected object kind, got {:?}", other),
        }
    }

    #[test]
    fn test_vendor_type_name_is_kept() {
        let prop = PropertyDescriptor::from_schema(&json!({"type": "limitedString", "maxLength": 4}), None);
        assert_eq!(prop.type_name(), "limitedString");
        assert!(matches!(prop.kind(), PropertyKind::String(_)));

        let numeric = PropertyDescriptor::from_schema(&json!({"type": "money", "minimum": 0}), None);
        assert!(matches!(numeric.kind(), PropertyKind::Numeric(_)));
    }

    #[test]
    fn test_shape_reads_required_list_and_all_of() {
        let shape = ElementShape::from_schema(&json!({
            "allOf": [
                {"$ref": "#/definitions/Base"},
                {"properties": {"id": {"type": "integer"}, "name": {"type": "integer"}}}
            ],
            "required": ["name"],
            "properties": {"name": {"type": "string"}}
        }));

        assert_eq!(shape.all_of, vec!["Base".to_string()]);
        assert_eq!(shape.properties.len(), 2);
        let name = &shape.properties["name"];
        assert_eq!(name.type_name(), "string");
        assert_eq!(name.meta().required, Some(true));
        assert_eq!(name.meta().name.as_deref(), Some("name"));
        assert_eq!(shape.properties["id"].meta().required, None);
    }

    #[test]
    fn test_required_list_reaches_inline_all_of_parts() {
        let shape = ElementShape::from_schema(&json!({
            "allOf": [
                {"$ref": "#/definitions/Base"},
                {"properties": {"tag": {"type": "string"}}, "required": ["note"]},
                {"properties": {"note": {"type": "string"}}}
            ],
            "required": ["id", "tag"]
        }));

        assert_eq!(shape.properties["tag"].meta().required, Some(true));
        assert_eq!(shape.properties["note"].meta().required, Some(true));
        assert_eq!(
            shape.required.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["id", "note", "tag"]
        );
    }

    #[test]
    fn test_from_document_sections() {
        let swagger = json!({"swagger": "2.0", "definitions": {"Pet": {"properties": {}}}});
        assert!(Definitions::from_document(&swagger).map(|d| d.contains("Pet")).unwrap_or(false));

        let openapi = json!({"openapi": "3.0.0", "components": {"schemas": {"Pet": {}}}});
        assert!(Definitions::from_document(&openapi).map(|d| d.contains("Pet")).unwrap_or(false));

        let bare = json!({"openapi": "3.0.0"});
        assert!(Definitions::from_document(&bare).map(|d| d.is_empty()).unwrap_or(false));
    }

    #[test]
    fn test_from_document_rejects_wrong_shapes() {
        let not_object = Definitions::from_document(&json!([1, 2]));
        assert!(matches!(not_object, Err(SchemaDiffError::InvalidDocument { .. })));

        let bad_section = Definitions::from_document(&json!({"definitions": []}));
        match bad_section {
            Err(SchemaDiffError::InvalidDocument { reason }) => assert!(reason.contains("definitions")),
            other => panic!("expected InvalidDocument, got {:?}", other),
        }
    }
}
