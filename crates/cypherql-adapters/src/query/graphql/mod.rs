//! Executable GraphQL documents.
//!
//! The operation text is parsed with `async-graphql-parser` and converted
//! straight into the owned [`ast`] the compiler walks.

pub mod ast;
mod parser;
pub(crate) mod values;

pub use ast::{Document, Field, FragmentDefinition, OperationDefinition, Selection, SelectionSet};
pub use parser::parse;
