//! Query language adapters.
//!
//! - [`graphql`] - Executable GraphQL documents (the compiler's input)
//! - [`cypher`] - Lexing and scoped rewriting of openCypher fragments
//! - [`gremlin`] - Decoding of GraphSON typed JSON responses
//! - [`template`] - `$placeholder` substitution

pub mod cypher;
pub mod graphql;
pub mod gremlin;
pub mod template;
