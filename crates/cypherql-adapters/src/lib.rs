//! # cypherql-adapters
//!
//! Adapters layer for cypherql: everything that turns external text into
//! owned domain values the compiler can work with.
//!
//! ## Modules
//!
//! - [`schema`] - Annotated SDL parsing into a [`SchemaDocument`](schema::SchemaDocument)
//! - [`query`] - GraphQL operations, openCypher fragments, and Gremlin responses

pub mod query;
pub mod schema;
