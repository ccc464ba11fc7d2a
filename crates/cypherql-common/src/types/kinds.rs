//! Small enums shared by the compiler, the adapters, and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The graph query language a compiled statement targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryLanguage {
    /// Declarative openCypher (MATCH/WITH/RETURN).
    #[default]
    #[serde(rename = "opencypher")]
    OpenCypher,
    /// Imperative Gremlin traversal script, passed through verbatim.
    #[serde(rename = "gremlin")]
    Gremlin,
}

impl QueryLanguage {
    /// Returns the endpoint path segment the statement is posted to.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::OpenCypher => "/opencypher",
            Self::Gremlin => "/gremlin",
        }
    }
}

impl fmt::Display for QueryLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenCypher => write!(f, "opencypher"),
            Self::Gremlin => write!(f, "gremlin"),
        }
    }
}

/// The root operation type a field is declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// A field of the `Query` root type.
    Query,
    /// A field of the `Mutation` root type.
    Mutation,
}

impl OperationKind {
    /// Returns the conventional root type name for this kind.
    #[must_use]
    pub const fn root_type_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root_type_name())
    }
}

/// Direction of a relationship traversal, as seen from the parent node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Edge points into the parent: `(parent)<-[e]-(child)`.
    In,
    /// Edge points away from the parent: `(parent)-[e]->(child)`.
    #[default]
    Out,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN" => Ok(Self::In),
            "OUT" => Ok(Self::Out),
            other => Err(format!("unknown relationship direction '{other}'")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "IN"),
            Self::Out => write!(f, "OUT"),
        }
    }
}
