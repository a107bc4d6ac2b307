use schemadiff_core::model::{Definitions, PropertyDescriptor};
use schemadiff_core::{compare, DiffReport};
use serde_json::Value;

const ELABORATE_EXAMPLE: &str = include_str!("../fixtures/elaborate_example_v1.json");

/// Parsed Swagger 2.0 fixture document
#[allow(dead_code)]
pub fn fixture_document() -> Value {
    serde_json::from_str(ELABORATE_EXAMPLE).unwrap()
}

/// Fresh definitions converted from the fixture
///
/// Each call returns an independent copy, so tests can mutate one snapshot
/// and compare it against another.
#[allow(dead_code)]
pub fn fixture_definitions() -> Definitions {
    Definitions::from_document(&fixture_document()).unwrap()
}

/// Insert (or replace) a property on a named element
#[allow(dead_code)]
pub fn put_property(defs: &mut Definitions, element: &str, name: &str, property: PropertyDescriptor) {
    defs.get_mut(element)
        .unwrap_or_else(|| panic!("fixture has no element {}", element))
        .properties
        .insert(name.to_string(), property);
}

/// Remove a property from a named element
#[allow(dead_code)]
pub fn drop_property(defs: &mut Definitions, element: &str, name: &str) {
    defs.get_mut(element)
        .unwrap_or_else(|| panic!("fixture has no element {}", element))
        .properties
        .remove(name);
}

/// Compare `Account` across two fixture snapshots that differ only in
/// `Account.testProperty`
#[allow(dead_code)]
pub fn diff_account_property(existing: PropertyDescriptor, future: PropertyDescriptor) -> DiffReport {
    let mut existing_defs = fixture_definitions();
    let mut future_defs = fixture_definitions();
    put_property(&mut existing_defs, "Account", "testProperty", existing);
    put_property(&mut future_defs, "Account", "testProperty", future);
    compare(&existing_defs, &future_defs, "Account", "Account", "scope").unwrap()
}

/// Assert the sizes of all five report maps
#[allow(dead_code)]
pub fn assert_sizes(
    report: &DiffReport,
    added: usize,
    removed: usize,
    changed: usize,
    breaking: usize,
    potentially_breaking: usize,
) {
    assert_eq!(report.added().len(), added, "added: {:?}", report.added().keys());
    assert_eq!(report.removed().len(), removed, "removed: {:?}", report.removed().keys());
    assert_eq!(report.changed().len(), changed, "changed: {:?}", report.changed());
    assert_eq!(report.breaking().len(), breaking, "breaking: {:?}", report.breaking());
    assert_eq!(
        report.potentially_breaking().len(),
        potentially_breaking,
        "potentially_breaking: {:?}",
        report.potentially_breaking()
    );
}
