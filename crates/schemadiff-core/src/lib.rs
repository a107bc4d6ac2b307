//! schemadiff core - schema element differencing and compatibility classification
//!
//! This crate provides:
//! - A uniform property model over string, numeric, boolean, array, object
//!   and reference kinds, with conversion from Swagger 2.0 / OpenAPI 3 nodes
//! - A directional compatibility rule table per constraint kind
//! - The element differencer with recursion-guarded reference traversal
//! - A scoped, serializable diff report with severity roll-up and digest

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod rules;

// Re-export commonly used types
pub use diff::{compare, compare_with_options, CompareOptions, DiffReport};
pub use errors::{ExError, ExErrorKind, Result, SchemaDiffError};
pub use model::{Definitions, ElementShape, PropertyDescriptor, PropertyKind};
pub use rules::{AttributeChange, Compatibility};
