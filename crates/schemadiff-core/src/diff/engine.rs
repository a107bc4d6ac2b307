//! Element comparison engine.
//!
//! The entry points are [`compare`] and [`compare_with_options`], which take
//! two definition snapshots and the element to compare in each, and produce a
//! [`DiffReport`].

use std::collections::BTreeSet;
use std::time::Instant;

use crate::diff::options::CompareOptions;
use crate::diff::report::{DiffReport, Scope};
use crate::diff::resolver::{RecursionGuard, Resolver};
use crate::errors::{Result, SchemaDiffError, Side};
use crate::model::{Definitions, PropertyDescriptor, PropertyKind, PropertySet};
use crate::rules;
use crate::{log_op_end, log_op_error, log_op_start};

/// Compare `existing_ref` in `existing` against `future_ref` in `future`
///
/// Finding keys are qualified with `scope`. References are followed with no
/// depth cap; see [`compare_with_options`].
///
/// # Errors
///
/// - `EmptyReference` if either element reference is empty or whitespace
/// - `EmptyScope` if the scope is empty or whitespace
pub fn compare(
    existing: &Definitions,
    future: &Definitions,
    existing_ref: &str,
    future_ref: &str,
    scope: &str,
) -> Result<DiffReport> {
    compare_with_options(
        existing,
        future,
        existing_ref,
        future_ref,
        scope,
        &CompareOptions::default(),
    )
}

/// Compare two elements with explicit options
///
/// # Errors
///
/// Same as [`compare`].
pub fn compare_with_options(
    existing: &Definitions,
    future: &Definitions,
    existing_ref: &str,
    future_ref: &str,
    scope: &str,
    options: &CompareOptions,
) -> Result<DiffReport> {
    log_op_start!(
        "compare",
        existing_ref = existing_ref,
        future_ref = future_ref,
        scope = scope
    );
    let start = Instant::now();

    let report = compare_impl(existing, future, existing_ref, future_ref, scope, options).map_err(
        |e| {
            log_op_error!(
                "compare",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                existing_ref = existing_ref,
                future_ref = future_ref,
                scope = scope
            );
            e
        },
    )?;

    log_op_end!(
        "compare",
        duration_ms = start.elapsed().as_millis() as u64,
        existing_ref = existing_ref,
        future_ref = future_ref,
        added_len = report.added().len() as u64,
        removed_len = report.removed().len() as u64,
        changed_len = report.changed().len() as u64,
        breaking_len = report.breaking().len() as u64,
        potentially_breaking_len = report.potentially_breaking().len() as u64
    );
    Ok(report)
}

fn compare_impl(
    existing: &Definitions,
    future: &Definitions,
    existing_ref: &str,
    future_ref: &str,
    scope: &str,
    options: &CompareOptions,
) -> Result<DiffReport> {
    if existing_ref.trim().is_empty() {
        return Err(SchemaDiffError::EmptyReference {
            side: Side::Existing,
        });
    }
    if future_ref.trim().is_empty() {
        return Err(SchemaDiffError::EmptyReference { side: Side::Future });
    }
    if scope.trim().is_empty() {
        return Err(SchemaDiffError::EmptyScope);
    }

    let mut differ = Differ {
        existing: Resolver::new(existing),
        future: Resolver::new(future),
        options,
        guard: RecursionGuard::new(),
    };
    Ok(differ.elements(existing_ref, future_ref, &Scope::root(scope)))
}

struct Differ<'a> {
    existing: Resolver<'a>,
    future: Resolver<'a>,
    options: &'a CompareOptions,
    guard: RecursionGuard,
}

impl Differ<'_> {
    fn elements(&mut self, existing_ref: &str, future_ref: &str, scope: &Scope) -> DiffReport {
        if !self.guard.enter(existing_ref, future_ref) {
            tracing::debug!(
                existing_ref,
                future_ref,
                scope = scope.prefix(),
                "reference cycle, branch truncated"
            );
            return DiffReport::default();
        }

        let old = self.existing.resolve(existing_ref);
        let new = self.future.resolve(future_ref);
        let report = self.property_sets(&old, &new, scope);

        self.guard.leave(existing_ref, future_ref);
        report
    }

    fn property_sets(&mut self, old: &PropertySet, new: &PropertySet, scope: &Scope) -> DiffReport {
        let mut report = DiffReport::default();
        let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

        for name in names {
            match (old.get(name), new.get(name)) {
                (None, Some(added)) => report.record_added(scope, name, added.clone()),
                (Some(removed), None) => report.record_removed(scope, name, removed.clone()),
                (Some(e), Some(f)) => {
                    if e != f {
                        report.record_changed(scope, name, rules::evaluate(e, f));
                    }
                    let nested = self.descend(e, f, &scope.child(name));
                    report.merge(nested);
                }
                (None, None) => {}
            }
        }
        report
    }

    fn descend(&mut self, e: &PropertyDescriptor, f: &PropertyDescriptor, scope: &Scope) -> DiffReport {
        match (e.kind(), f.kind()) {
            (PropertyKind::Reference { target: a }, PropertyKind::Reference { target: b }) => {
                if !self.options.follow_references {
                    return DiffReport::default();
                }
                if let Some(max) = self.options.max_depth {
                    if self.guard.depth() > max {
                        tracing::debug!(
                            existing_ref = %a,
                            future_ref = %b,
                            max_depth = max as u64,
                            "depth cap reached, branch truncated"
                        );
                        return DiffReport::default();
                    }
                }
                self.elements(a, b, scope)
            }
            (PropertyKind::Object(a), PropertyKind::Object(b)) => {
                let old = self.existing.flatten(a);
                let new = self.future.flatten(b);
                self.property_sets(&old, &new, scope)
            }
            (PropertyKind::Array(a), PropertyKind::Array(b)) => match (&a.items, &b.items) {
                (Some(x), Some(y)) => self.descend(x, y, scope),
                _ => DiffReport::default(),
            },
            _ => DiffReport::default(),
        }
    }
}
