//! Directional classification per constraint kind
//!
//! Each function receives the existing and future value of one attribute
//! (already known to differ) and classifies the change. Narrowing the set of
//! accepted values is breaking; widening it is not.

use rust_decimal::Decimal;
use serde_json::Value;

use super::Compatibility;

fn enabled(flag: &Option<bool>) -> bool {
    flag.unwrap_or(false)
}

/// A flag whose `true` value restricts input (`required`, `uniqueItems`,
/// an exclusive flag with its bound unchanged)
pub fn flag_tightened(old: &Option<bool>, new: &Option<bool>) -> Compatibility {
    if !enabled(old) && enabled(new) {
        Compatibility::Breaking
    } else {
        Compatibility::NonBreaking
    }
}

/// A flag whose `true` value admits extra input (`allowEmptyValue`)
pub fn flag_relaxed(old: &Option<bool>, new: &Option<bool>) -> Compatibility {
    if enabled(old) && !enabled(new) {
        Compatibility::Breaking
    } else {
        Compatibility::NonBreaking
    }
}

/// Upper bounds (`maximum`, `maxLength`, `maxItems`); absent means unbounded
pub fn upper_bound<T: Ord>(old: &Option<T>, new: &Option<T>) -> Compatibility {
    match (old, new) {
        (None, Some(_)) => Compatibility::Breaking,
        (Some(old), Some(new)) if new < old => Compatibility::Breaking,
        _ => Compatibility::NonBreaking,
    }
}

/// Lower bounds (`minimum`); absent means unbounded
pub fn lower_bound<T: Ord>(old: &Option<T>, new: &Option<T>) -> Compatibility {
    match (old, new) {
        (None, Some(_)) => Compatibility::Breaking,
        (Some(old), Some(new)) if new > old => Compatibility::Breaking,
        _ => Compatibility::NonBreaking,
    }
}

/// Lower counts (`minLength`, `minItems`); absent is the same as zero
pub fn lower_count(old: &Option<u64>, new: &Option<u64>) -> Compatibility {
    if new.unwrap_or(0) > old.unwrap_or(0) {
        Compatibility::Breaking
    } else {
        Compatibility::NonBreaking
    }
}

pub fn multiple_of(old: &Option<Decimal>, new: &Option<Decimal>) -> Compatibility {
    match (old, new) {
        (None, Some(_)) => Compatibility::Breaking,
        (Some(_), None) | (None, None) => Compatibility::NonBreaking,
        (Some(old), Some(new)) => {
            if old.is_zero() || new.is_zero() {
                Compatibility::PotentiallyBreaking
            } else if (*new % *old).is_zero() {
                Compatibility::Breaking
            } else if (*old % *new).is_zero() {
                Compatibility::NonBreaking
            } else {
                Compatibility::PotentiallyBreaking
            }
        }
    }
}

/// Enumerations: dropping an accepted value breaks, adding one does not
pub fn enumeration(old: &Option<Vec<Value>>, new: &Option<Vec<Value>>) -> Compatibility {
    match (old, new) {
        (None, Some(_)) => Compatibility::Breaking,
        (Some(old), Some(new)) if old.iter().any(|v| !new.contains(v)) => {
            Compatibility::Breaking
        }
        _ => Compatibility::NonBreaking,
    }
}

/// Enumerations listing the same values in any order accept the same input
pub fn same_members(old: &Option<Vec<Value>>, new: &Option<Vec<Value>>) -> bool {
    match (old, new) {
        (Some(old), Some(new)) => {
            old.iter().all(|v| new.contains(v)) && new.iter().all(|v| old.contains(v))
        }
        (None, None) => true,
        _ => false,
    }
}

/// Changes whose effect on accepted input cannot be decided (`pattern`,
/// `type`, stray constraints)
pub fn undecidable<T: ?Sized>(_old: &T, _new: &T) -> Compatibility {
    Compatibility::PotentiallyBreaking
}

/// Documentation and metadata changes
pub fn informational<T: ?Sized>(_old: &T, _new: &T) -> Compatibility {
    Compatibility::NonBreaking
}
