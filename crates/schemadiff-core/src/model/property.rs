//! Property descriptor model
//!
//! A `PropertyDescriptor` is the normalized shape of one schema attribute set.
//! The kind is fixed at construction and carries the constraints that apply to
//! it; everything else lives in kind-agnostic metadata. Every attribute is
//! optional so that "present in one snapshot, absent in the other" is itself a
//! detectable change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::element::ElementShape;

/// Kind-agnostic metadata shared by every property kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyMeta {
    pub name: Option<String>,

    /// Declared type as written in the source document
    pub type_name: Option<String>,

    pub format: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub required: Option<bool>,
    pub read_only: Option<bool>,

    /// Vendor-level access classifier (`x-access`)
    pub access: Option<String>,

    pub enum_values: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringConstraints {
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub allow_empty_value: Option<bool>,
}

/// Integer or floating numeric family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericFamily {
    Integer,
    Number,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericConstraints {
    pub family: NumericFamily,
    pub minimum: Option<Decimal>,
    pub maximum: Option<Decimal>,
    pub exclusive_minimum: Option<bool>,
    pub exclusive_maximum: Option<bool>,
    pub multiple_of: Option<Decimal>,
}

impl NumericConstraints {
    pub fn new(family: NumericFamily) -> Self {
        Self {
            family,
            minimum: None,
            maximum: None,
            exclusive_minimum: None,
            exclusive_maximum: None,
            multiple_of: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayConstraints {
    pub items: Option<Box<PropertyDescriptor>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
}

/// Closed set of property kinds with their kind-specific payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyKind {
    String(StringConstraints),
    Numeric(NumericConstraints),
    Boolean,
    Array(ArrayConstraints),
    Object(ElementShape),
    Reference { target: String },
}

impl PropertyKind {
    /// Type name used when the source did not declare one
    pub fn canonical_name(&self) -> &'static str {
        match self {
            PropertyKind::String(_) => "string",
            PropertyKind::Numeric(c) => match c.family {
                NumericFamily::Integer => "integer",
                NumericFamily::Number => "number",
            },
            PropertyKind::Boolean => "boolean",
            PropertyKind::Array(_) => "array",
            PropertyKind::Object(_) => "object",
            PropertyKind::Reference { .. } => "ref",
        }
    }

    /// Whether both kinds carry the same constraint payload type
    ///
    /// Integer and number share the numeric payload, so they are the same
    /// kind here even though their canonical names differ.
    pub fn same_kind(&self, other: &PropertyKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// One property's full declared shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    kind: PropertyKind,
    meta: PropertyMeta,

    /// Constraint keys supplied for a kind they do not apply to
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    stray: BTreeMap<String, Value>,
}

impl PropertyDescriptor {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            meta: PropertyMeta::default(),
            stray: BTreeMap::new(),
        }
    }

    pub fn string() -> Self {
        Self::new(PropertyKind::String(StringConstraints::default()))
    }

    pub fn integer() -> Self {
        Self::new(PropertyKind::Numeric(NumericConstraints::new(
            NumericFamily::Integer,
        )))
    }

    pub fn number() -> Self {
        Self::new(PropertyKind::Numeric(NumericConstraints::new(
            NumericFamily::Number,
        )))
    }

    pub fn boolean() -> Self {
        Self::new(PropertyKind::Boolean)
    }

    /// Array property; `items` may be set later with `with_items`
    pub fn array() -> Self {
        Self::new(PropertyKind::Array(ArrayConstraints::default()))
    }

    /// Inline object property
    pub fn object(shape: ElementShape) -> Self {
        Self::new(PropertyKind::Object(shape))
    }

    /// Reference to a named definition
    pub fn reference(target: impl Into<String>) -> Self {
        Self::new(PropertyKind::Reference {
            target: target.into(),
        })
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    pub fn stray(&self) -> &BTreeMap<String, Value> {
        &self.stray
    }

    /// Declared type name, falling back to the kind's canonical name
    pub fn type_name(&self) -> &str {
        self.meta
            .type_name
            .as_deref()
            .unwrap_or_else(|| self.kind.canonical_name())
    }

    /// Definition this property points at, directly or through array items
    pub fn reference_target(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Reference { target } => Some(target),
            PropertyKind::Array(c) => c.items.as_ref().and_then(|i| i.reference_target()),
            _ => None,
        }
    }

    // ========== Metadata ==========

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.meta.name = Some(name.into());
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.meta.type_name = Some(type_name.into());
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.meta.format = Some(format.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.meta.default = Some(default);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.meta.required = Some(required);
        self
    }

    /// Membership in the owning model's `required` list; an explicit flag on
    /// the property itself is left alone
    pub fn list_as_required(&mut self) {
        self.meta.required.get_or_insert(true);
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.meta.read_only = Some(read_only);
        self
    }

    pub fn with_access(mut self, access: impl Into<String>) -> Self {
        self.meta.access = Some(access.into());
        self
    }

    pub fn with_enum_values(mut self, values: Vec<Value>) -> Self {
        self.meta.enum_values = Some(values);
        self
    }

    /// Record a constraint that does not belong to this descriptor's kind
    pub fn with_stray(mut self, key: impl Into<String>, value: Value) -> Self {
        self.stray.insert(key.into(), value);
        self
    }

    // ========== String constraints ==========

    pub fn with_pattern(self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let raw = Value::from(pattern.clone());
        self.with_string_constraint("pattern", raw, |c| c.pattern = Some(pattern))
    }

    pub fn with_min_length(self, min_length: u64) -> Self {
        self.with_string_constraint("minLength", Value::from(min_length), |c| {
            c.min_length = Some(min_length)
        })
    }

    pub fn with_max_length(self, max_length: u64) -> Self {
        self.with_string_constraint("maxLength", Value::from(max_length), |c| {
            c.max_length = Some(max_length)
        })
    }

    pub fn with_allow_empty_value(self, allow: bool) -> Self {
        self.with_string_constraint("allowEmptyValue", Value::from(allow), |c| {
            c.allow_empty_value = Some(allow)
        })
    }

    // ========== Numeric constraints ==========

    pub fn with_minimum(self, minimum: Decimal) -> Self {
        self.with_numeric_constraint("minimum", decimal_value(minimum), |c| {
            c.minimum = Some(minimum)
        })
    }

    pub fn with_maximum(self, maximum: Decimal) -> Self {
        self.with_numeric_constraint("maximum", decimal_value(maximum), |c| {
            c.maximum = Some(maximum)
        })
    }

    pub fn with_exclusive_minimum(self, exclusive: bool) -> Self {
        self.with_numeric_constraint("exclusiveMinimum", Value::from(exclusive), |c| {
            c.exclusive_minimum = Some(exclusive)
        })
    }

    pub fn with_exclusive_maximum(self, exclusive: bool) -> Self {
        self.with_numeric_constraint("exclusiveMaximum", Value::from(exclusive), |c| {
            c.exclusive_maximum = Some(exclusive)
        })
    }

    pub fn with_multiple_of(self, multiple_of: Decimal) -> Self {
        self.with_numeric_constraint("multipleOf", decimal_value(multiple_of), |c| {
            c.multiple_of = Some(multiple_of)
        })
    }

    // ========== Array constraints ==========

    pub fn with_items(self, items: PropertyDescriptor) -> Self {
        let raw = serde_json::to_value(&items).unwrap_or(Value::Null);
        self.with_array_constraint("items", raw, |c| c.items = Some(Box::new(items)))
    }

    pub fn with_min_items(self, min_items: u64) -> Self {
        self.with_array_constraint("minItems", Value::from(min_items), |c| {
            c.min_items = Some(min_items)
        })
    }

    pub fn with_max_items(self, max_items: u64) -> Self {
        self.with_array_constraint("maxItems", Value::from(max_items), |c| {
            c.max_items = Some(max_items)
        })
    }

    pub fn with_unique_items(self, unique: bool) -> Self {
        self.with_array_constraint("uniqueItems", Value::from(unique), |c| {
            c.unique_items = Some(unique)
        })
    }

    fn with_string_constraint(
        mut self,
        key: &str,
        raw: Value,
        apply: impl FnOnce(&mut StringConstraints),
    ) -> Self {
        match &mut self.kind {
            PropertyKind::String(c) => apply(c),
            _ => {
                self.stray.insert(key.to_string(), raw);
            }
        }
        self
    }

    fn with_numeric_constraint(
        mut self,
        key: &str,
        raw: Value,
        apply: impl FnOnce(&mut NumericConstraints),
    ) -> Self {
        match &mut self.kind {
            PropertyKind::Numeric(c) => apply(c),
            _ => {
                self.stray.insert(key.to_string(), raw);
            }
        }
        self
    }

    fn with_array_constraint(
        mut self,
        key: &str,
        raw: Value,
        apply: impl FnOnce(&mut ArrayConstraints),
    ) -> Self {
        match &mut self.kind {
            PropertyKind::Array(c) => apply(c),
            _ => {
                self.stray.insert(key.to_string(), raw);
            }
        }
        self
    }
}

fn decimal_value(value: Decimal) -> Value {
    Value::from(value.to_string())
}
