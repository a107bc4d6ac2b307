//! Compatibility rule table
//!
//! `evaluate` walks every attribute of two descriptors for the same property
//! and classifies each one that differs. Dispatch is by property kind; when
//! the kinds differ only the type rule and the kind-agnostic rules apply.

pub mod constraints;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::model::{
    ArrayConstraints, NumericConstraints, PropertyDescriptor, PropertyKind, StringConstraints,
};

/// Severity of one attribute change, ordered from harmless to breaking
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compatibility {
    NonBreaking,
    PotentiallyBreaking,
    Breaking,
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compatibility::NonBreaking => f.write_str("non-breaking"),
            Compatibility::PotentiallyBreaking => f.write_str("potentially-breaking"),
            Compatibility::Breaking => f.write_str("breaking"),
        }
    }
}

/// One differing attribute with its rendered values and classification
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeChange {
    pub attribute: String,
    pub from: String,
    pub to: String,
    pub compatibility: Compatibility,
}

impl AttributeChange {
    /// Stable finding message under a scoped property key
    ///
    /// `key` already ends in `.`, e.g. `scope.testProperty.`.
    pub fn message(&self, key: &str) -> String {
        format!(
            "{}{}.changed.from.{}.to.{}",
            key, self.attribute, self.from, self.to
        )
    }
}

/// Classify every attribute that differs between two descriptors
pub fn evaluate(existing: &PropertyDescriptor, future: &PropertyDescriptor) -> Vec<AttributeChange> {
    let mut deltas = Deltas::new(String::new());
    deltas.descriptor(existing, future);
    deltas.changes
}

/// Scalar rendering used in finding messages; absent values render as `null`
trait Render {
    fn render(&self) -> String;
}

impl Render for bool {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl Render for u64 {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl Render for Decimal {
    fn render(&self) -> String {
        self.normalize().to_string()
    }
}

impl Render for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl Render for Value {
    fn render(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::String(s) => s.clone(),
            Value::Array(values) => values.render(),
            other => other.to_string(),
        }
    }
}

impl Render for Vec<Value> {
    fn render(&self) -> String {
        let parts: Vec<String> = self.iter().map(Render::render).collect();
        format!("[{}]", parts.join(","))
    }
}

impl<T: Render> Render for Option<T> {
    fn render(&self) -> String {
        match self {
            Some(value) => value.render(),
            None => "null".to_string(),
        }
    }
}

impl<T: Render + ?Sized> Render for &T {
    fn render(&self) -> String {
        (**self).render()
    }
}

type FlagRule = fn(&Option<bool>, &Option<bool>) -> Compatibility;

/// Numeric bounds compared by the bound rules even when they do not fit a
/// `Decimal`; the converter keeps such values as stray JSON numbers
const WIDE_BOUND_KEYS: [&str; 2] = ["minimum", "maximum"];

/// A numeric bound, exact when it fits a `Decimal`
#[derive(Debug, Clone, Copy)]
enum Magnitude<'a> {
    Exact(Decimal),
    Approx(f64, &'a Value),
}

impl<'a> Magnitude<'a> {
    fn lookup(exact: Option<Decimal>, raw: Option<&'a Value>) -> Option<Self> {
        exact.map(Magnitude::Exact).or_else(|| {
            let raw = raw?;
            raw.as_f64().map(|x| Magnitude::Approx(x, raw))
        })
    }

    fn as_f64(&self) -> f64 {
        match self {
            Magnitude::Exact(d) => d.to_f64().unwrap_or(f64::NAN),
            Magnitude::Approx(x, _) => *x,
        }
    }
}

impl Ord for Magnitude<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Magnitude::Exact(a), Magnitude::Exact(b)) => a.cmp(b),
            _ => self.as_f64().total_cmp(&other.as_f64()),
        }
    }
}

impl PartialOrd for Magnitude<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Magnitude<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Magnitude<'_> {}

impl Render for Magnitude<'_> {
    fn render(&self) -> String {
        match self {
            Magnitude::Exact(d) => d.render(),
            Magnitude::Approx(_, raw) => raw.render(),
        }
    }
}

/// Stray `key` on two numeric descriptors that the bound rules can take over
fn wide_bound(old: &PropertyDescriptor, new: &PropertyDescriptor, key: &str) -> bool {
    let numeric = |p: &PropertyDescriptor| matches!(p.kind(), PropertyKind::Numeric(_));
    let number_or_absent = |p: &PropertyDescriptor| p.stray().get(key).map_or(true, Value::is_number);
    WIDE_BOUND_KEYS.contains(&key)
        && numeric(old)
        && numeric(new)
        && number_or_absent(old)
        && number_or_absent(new)
}

struct Deltas {
    prefix: String,
    changes: Vec<AttributeChange>,
}

impl Deltas {
    fn new(prefix: String) -> Self {
        Self {
            prefix,
            changes: Vec::new(),
        }
    }

    fn push(&mut self, attribute: &str, from: String, to: String, compatibility: Compatibility) {
        self.changes.push(AttributeChange {
            attribute: format!("{}{}", self.prefix, attribute),
            from,
            to,
            compatibility,
        });
    }

    fn record<T, F>(&mut self, attribute: &str, old: &T, new: &T, classify: F)
    where
        T: Render + PartialEq + ?Sized,
        F: FnOnce(&T, &T) -> Compatibility,
    {
        if old == new {
            return;
        }
        let compatibility = classify(old, new);
        self.push(attribute, old.render(), new.render(), compatibility);
    }

    fn descriptor(&mut self, old: &PropertyDescriptor, new: &PropertyDescriptor) {
        let same_kind = old.kind().same_kind(new.kind());
        if old.type_name() != new.type_name() {
            self.push(
                "type",
                old.type_name().to_string(),
                new.type_name().to_string(),
                Compatibility::PotentiallyBreaking,
            );
        } else if !same_kind {
            self.push(
                "type",
                old.kind().canonical_name().to_string(),
                new.kind().canonical_name().to_string(),
                Compatibility::PotentiallyBreaking,
            );
        }

        self.common(old, new);

        if !same_kind {
            return;
        }
        match (old.kind(), new.kind()) {
            (PropertyKind::String(a), PropertyKind::String(b)) => self.strings(a, b),
            (PropertyKind::Numeric(a), PropertyKind::Numeric(b)) => self.numerics(old, new, a, b),
            (PropertyKind::Array(a), PropertyKind::Array(b)) => self.arrays(a, b),
            (PropertyKind::Reference { target: a }, PropertyKind::Reference { target: b }) => {
                self.record("ref", a, b, constraints::informational)
            }
            // Boolean has no payload; inline objects are compared property by property
            _ => {}
        }
    }

    fn common(&mut self, old: &PropertyDescriptor, new: &PropertyDescriptor) {
        let (a, b) = (old.meta(), new.meta());
        self.record("required", &a.required, &b.required, constraints::flag_tightened);
        if !constraints::same_members(&a.enum_values, &b.enum_values) {
            self.record("enum", &a.enum_values, &b.enum_values, constraints::enumeration);
        }
        self.record("readOnly", &a.read_only, &b.read_only, constraints::informational);
        self.record("format", &a.format, &b.format, constraints::informational);
        self.record("description", &a.description, &b.description, constraints::informational);
        self.record("default", &a.default, &b.default, constraints::informational);
        self.record("access", &a.access, &b.access, constraints::informational);
        self.record("name", &a.name, &b.name, constraints::informational);

        let keys: BTreeSet<&String> = old.stray().keys().chain(new.stray().keys()).collect();
        for key in keys.into_iter().filter(|key| !wide_bound(old, new, key)) {
            self.record(
                key,
                &old.stray().get(key),
                &new.stray().get(key),
                constraints::undecidable,
            );
        }
    }

    fn strings(&mut self, a: &StringConstraints, b: &StringConstraints) {
        self.record("pattern", &a.pattern, &b.pattern, constraints::undecidable);
        self.record("minLength", &a.min_length, &b.min_length, constraints::lower_count);
        self.record("maxLength", &a.max_length, &b.max_length, constraints::upper_bound);
        self.record(
            "allowEmptyValue",
            &a.allow_empty_value,
            &b.allow_empty_value,
            constraints::flag_relaxed,
        );
    }

    fn numerics(
        &mut self,
        old: &PropertyDescriptor,
        new: &PropertyDescriptor,
        a: &NumericConstraints,
        b: &NumericConstraints,
    ) {
        let (min_wide, max_wide) = (wide_bound(old, new, "minimum"), wide_bound(old, new, "maximum"));
        let min_a = Magnitude::lookup(a.minimum, old.stray().get("minimum").filter(|_| min_wide));
        let min_b = Magnitude::lookup(b.minimum, new.stray().get("minimum").filter(|_| min_wide));
        let max_a = Magnitude::lookup(a.maximum, old.stray().get("maximum").filter(|_| max_wide));
        let max_b = Magnitude::lookup(b.maximum, new.stray().get("maximum").filter(|_| max_wide));

        self.record("minimum", &min_a, &min_b, constraints::lower_bound);
        self.record("maximum", &max_a, &max_b, constraints::upper_bound);
        self.record("multipleOf", &a.multiple_of, &b.multiple_of, constraints::multiple_of);

        // A flag moving with its bound is carried by the bound rule
        let exclusive_min: FlagRule = if min_a == min_b {
            constraints::flag_tightened
        } else {
            constraints::informational
        };
        self.record(
            "exclusiveMinimum",
            &a.exclusive_minimum,
            &b.exclusive_minimum,
            exclusive_min,
        );

        let exclusive_max: FlagRule = if max_a == max_b {
            constraints::flag_tightened
        } else {
            constraints::informational
        };
        self.record(
            "exclusiveMaximum",
            &a.exclusive_maximum,
            &b.exclusive_maximum,
            exclusive_max,
        );
    }

    fn arrays(&mut self, a: &ArrayConstraints, b: &ArrayConstraints) {
        self.record("minItems", &a.min_items, &b.min_items, constraints::lower_count);
        self.record("maxItems", &a.max_items, &b.max_items, constraints::upper_bound);
        self.record("uniqueItems", &a.unique_items, &b.unique_items, constraints::flag_tightened);

        match (&a.items, &b.items) {
            (Some(old), Some(new)) => {
                let mut nested = Deltas::new(format!("{}items.", self.prefix));
                nested.descriptor(old, new);
                self.changes.extend(nested.changes);
            }
            // Absent items accept anything
            (None, Some(new)) => self.push(
                "items",
                "null".to_string(),
                new.type_name().to_string(),
                Compatibility::Breaking,
            ),
            (Some(old), None) => self.push(
                "items",
                old.type_name().to_string(),
                "null".to_string(),
                Compatibility::NonBreaking,
            ),
            (None, None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classifications(changes: &[AttributeChange]) -> Vec<(&str, Compatibility)> {
        changes
            .iter()
            .map(|c| (c.attribute.as_str(), c.compatibility))
            .collect()
    }

    #[test]
    fn test_identical_descriptors_have_no_changes() {
        let prop = PropertyDescriptor::string().with_max_length(10).with_required(true);
        assert!(evaluate(&prop, &prop.clone()).is_empty());
    }

    #[test]
    fn test_message_format() {
        let changes = evaluate(
            &PropertyDescriptor::string().with_type_name("unlimitedString"),
            &PropertyDescriptor::string().with_type_name("limitedString"),
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0].message("scope.testProperty."),
            "scope.testProperty.type.changed.from.unlimitedString.to.limitedString"
        );
    }

    #[test]
    fn test_absent_value_renders_null() {
        let changes = evaluate(
            &PropertyDescriptor::string(),
            &PropertyDescriptor::string().with_max_length(5),
        );
        assert_eq!(changes[0].from, "null");
        assert_eq!(changes[0].to, "5");
        assert_eq!(changes[0].compatibility, Compatibility::Breaking);
    }

    #[test]
    fn test_enum_renders_as_list() {
        let changes = evaluate(
            &PropertyDescriptor::string().with_enum_values(vec![json!("a"), json!("b")]),
            &PropertyDescriptor::string().with_enum_values(vec![json!("a")]),
        );
        assert_eq!(changes[0].from, "[a,b]");
        assert_eq!(changes[0].to, "[a]");
        assert_eq!(changes[0].compatibility, Compatibility::Breaking);
    }

    #[test]
    fn test_reordered_enum_is_not_a_change() {
        let values = |names: &[&str]| names.iter().map(|n| json!(n)).collect::<Vec<_>>();
        let old = PropertyDescriptor::string().with_enum_values(values(&["a", "b", "c"]));

        let reordered = PropertyDescriptor::string().with_enum_values(values(&["c", "a", "b"]));
        assert!(evaluate(&old, &reordered).is_empty());

        let widened = PropertyDescriptor::string().with_enum_values(values(&["b", "a", "c", "d"]));
        assert_eq!(classifications(&evaluate(&old, &widened)), vec![("enum", Compatibility::NonBreaking)]);
    }

    #[test]
    fn test_kind_change_only_applies_common_rules() {
        let changes = evaluate(
            &PropertyDescriptor::string().with_max_length(3).with_required(false),
            &PropertyDescriptor::integer().with_maximum(Decimal::new(3, 0)).with_required(true),
        );
        assert_eq!(
            classifications(&changes),
            vec![
                ("type", Compatibility::PotentiallyBreaking),
                ("required", Compatibility::Breaking),
            ]
        );
    }

    #[test]
    fn test_same_declared_name_different_kind_is_type_change() {
        let changes = evaluate(
            &PropertyDescriptor::string().with_type_name("custom"),
            &PropertyDescriptor::number().with_type_name("custom"),
        );
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].from, "string");
        assert_eq!(changes[0].to, "number");
    }

    #[test]
    fn test_exclusive_flag_with_moving_bound_is_informational() {
        let changes = evaluate(
            &PropertyDescriptor::number().with_maximum(Decimal::new(10, 0)),
            &PropertyDescriptor::number()
                .with_maximum(Decimal::new(20, 0))
                .with_exclusive_maximum(true),
        );
        assert_eq!(
            classifications(&changes),
            vec![
                ("maximum", Compatibility::NonBreaking),
                ("exclusiveMaximum", Compatibility::NonBreaking),
            ]
        );
    }

    #[test]
    fn test_exclusive_flag_with_fixed_bound_is_directional() {
        let inclusive = PropertyDescriptor::number()
            .with_minimum(Decimal::new(0, 0))
            .with_exclusive_minimum(false);
        let exclusive = PropertyDescriptor::number()
            .with_minimum(Decimal::new(0, 0))
            .with_exclusive_minimum(true);

        assert_eq!(
            classifications(&evaluate(&inclusive, &exclusive)),
            vec![("exclusiveMinimum", Compatibility::Breaking)]
        );
        assert_eq!(
            classifications(&evaluate(&exclusive, &inclusive)),
            vec![("exclusiveMinimum", Compatibility::NonBreaking)]
        );
    }

    #[test]
    fn test_bounds_beyond_decimal_range_keep_direction() {
        let huge = PropertyDescriptor::number().with_stray("maximum", json!(1e30));
        let bounded = PropertyDescriptor::number().with_maximum(Decimal::new(100, 0));
        let bigger = PropertyDescriptor::number().with_stray("maximum", json!(1e31));

        let forward = evaluate(&huge, &bounded);
        assert_eq!(classifications(&forward), vec![("maximum", Compatibility::Breaking)]);
        assert_eq!(forward[0].from, "1e30");
        assert_eq!(forward[0].to, "100");

        assert_eq!(
            classifications(&evaluate(&bounded, &huge)),
            vec![("maximum", Compatibility::NonBreaking)]
        );
        assert_eq!(
            classifications(&evaluate(&bigger, &huge)),
            vec![("maximum", Compatibility::Breaking)]
        );

        let tiny = PropertyDescriptor::number().with_stray("minimum", json!(1e-30));
        assert_eq!(
            classifications(&evaluate(&PropertyDescriptor::number().with_minimum(Decimal::ZERO), &tiny)),
            vec![("minimum", Compatibility::Breaking)]
        );
    }

    #[test]
    fn test_items_rules_are_prefixed() {
        let changes = evaluate(
            &PropertyDescriptor::array().with_items(PropertyDescriptor::string().with_max_length(10)),
            &PropertyDescriptor::array().with_items(PropertyDescriptor::string().with_max_length(5)),
        );
        assert_eq!(classifications(&changes), vec![("items.maxLength", Compatibility::Breaking)]);
    }

    #[test]
    fn test_stray_difference_is_potentially_breaking() {
        let changes = evaluate(
            &PropertyDescriptor::boolean().with_stray("maxLength", json!(3)),
            &PropertyDescriptor::boolean(),
        );
        assert_eq!(
            classifications(&changes),
            vec![("maxLength", Compatibility::PotentiallyBreaking)]
        );
        assert_eq!(changes[0].to, "null");
    }

    #[test]
    fn test_compatibility_ordering() {
        assert!(Compatibility::NonBreaking < Compatibility::PotentiallyBreaking);
        assert!(Compatibility::PotentiallyBreaking < Compatibility::Breaking);
    }
}
