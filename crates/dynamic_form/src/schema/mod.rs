//! Schema registry: which fields make up which form type.
//!
//! - `field.rs`    : `FieldKind` and `FieldDescriptor`
//! - `registry.rs` : `FormType` and the immutable `SchemaRegistry`

mod field;
mod registry;

pub use field::{FieldDescriptor, FieldKind};
pub use registry::{FormType, SchemaRegistry};
