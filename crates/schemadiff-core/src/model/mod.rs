pub mod convert;
pub mod element;
pub mod property;

pub use convert::ref_target;
pub use element::{Definitions, ElementShape, PropertySet};
pub use property::{
    ArrayConstraints, NumericConstraints, NumericFamily, PropertyDescriptor, PropertyKind,
    PropertyMeta, StringConstraints,
};
