//! Schema Index and Field Resolver.
//!
//! The annotated schema is indexed once; every lookup derives a fresh
//! descriptor with the field's directives already interpreted.

mod descriptor;
mod index;

pub use descriptor::{ArgDescriptor, FieldDescriptor, FieldKind, QueryRootInfo};
pub use index::SchemaIndex;
