//! Shared type definitions for cypherql.
//!
//! - Target query languages ([`QueryLanguage`])
//! - GraphQL root operation kinds ([`OperationKind`])
//! - Relationship directions ([`Direction`])

mod kinds;

pub use kinds::{Direction, OperationKind, QueryLanguage};
