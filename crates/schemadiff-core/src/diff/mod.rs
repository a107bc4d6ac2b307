//! Schema element diff engine.
//!
//! Compares one named element across two definition snapshots and produces
//! a structured, deterministic report of added, removed and changed
//! properties, with every attribute change classified for compatibility.
//!
//! ## Entry point
//!
//! ```
//! use schemadiff_core::diff::compare;
//! use schemadiff_core::model::{Definitions, ElementShape, PropertyDescriptor};
//!
//! let existing = Definitions::new().with_element(
//!     "Account",
//!     ElementShape::new().with_property("name", PropertyDescriptor::string().with_max_length(20)),
//! );
//! let future = Definitions::new().with_element(
//!     "Account",
//!     ElementShape::new().with_property("name", PropertyDescriptor::string().with_max_length(10)),
//! );
//!
//! let report = compare(&existing, &future, "Account", "Account", "scope").unwrap();
//! assert!(report.breaking().contains_key("scope.name."));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical reports and digests.
//! - **Termination**: reference cycles are cut by a recursion guard keyed on
//!   the pair of element names being compared.
//! - **Absence is data**: missing properties and dangling references surface
//!   as added/removed entries, never as errors.

pub mod engine;
pub mod options;
pub mod report;
pub mod resolver;

pub use engine::{compare, compare_with_options};
pub use options::CompareOptions;
pub use report::{DiffReport, Scope};
pub use resolver::{RecursionGuard, Resolver};
