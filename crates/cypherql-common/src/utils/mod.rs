//! Common utilities used throughout cypherql.
//!
//! - [`error`] - Error types like [`Error`] and [`SchemaError`](error::SchemaError)
//! - [`strings`] - Name suggestions and identifier helpers

pub mod error;
pub mod strings;

pub use error::{Error, Result};
