//! Board model and generator

pub mod field;
pub mod layout;
pub mod names;

pub use field::{Field, FieldKind, PropertyField};
pub use layout::Board;
pub use names::property_name;
