//! # cypherql-engine
//!
//! The compiler proper: turns one GraphQL operation, validated against an
//! annotated schema, into an openCypher statement with bound parameters or
//! a Gremlin script, and shapes results back into GraphQL JSON.
//!
//! ## Modules
//!
//! - [`schema`] - Schema Index and Field Resolver
//! - [`compile`] - Statement Builder, Query and Mutation Synthesizers
//! - [`reshape`] - Gremlin result reshaping
//! - [`resolver`] - Execution boundary
//! - [`config`] - Configuration options

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compile;
pub mod config;
pub mod reshape;
pub mod resolver;
pub mod schema;

pub use compile::{CompiledQuery, Compiler};
pub use config::{Config, ConfigError, MalformedElementPolicy};
pub use reshape::Reshaper;
pub use resolver::{ExecutionError, GraphResolver, QueryExecutor};
pub use schema::SchemaIndex;
