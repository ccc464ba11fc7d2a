//! # cypherql-common
//!
//! Foundation layer for cypherql: shared enums, error types, and utilities.
//!
//! This crate provides the building blocks used by all other cypherql
//! crates. It has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Shared enums (QueryLanguage, OperationKind, Direction)
//! - [`utils`] - Utility functions and helpers (errors, suggestions)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{Direction, OperationKind, QueryLanguage};
pub use utils::error::{
    CompileError, Error, ParseError, ParseKind, ReshapeError, Result, SchemaError,
};
