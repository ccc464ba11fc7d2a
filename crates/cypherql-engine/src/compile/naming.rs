//! Mutation naming contract.
//!
//! The root mutation field name selects the write template and names the
//! node or edge type it writes. Rules are anchored and tried in order; the
//! first capture group is the GraphQL type name.
//!
//! | Pattern | Shape |
//! |---|---|
//! | `^createNode(\w+)$` | [`MutationShape::CreateNode`] |
//! | `^updateNode(\w+)$` | [`MutationShape::UpdateNode`] |
//! | `^deleteNode(\w+)$` | [`MutationShape::DeleteNode`] |
//! | `^connectNode\w*?Edge(\w+)$` | [`MutationShape::ConnectEdge`] |
//! | `^updateEdge(\w+?)From\w*$`, `^updateEdge(\w+)$` | [`MutationShape::UpdateEdge`] |
//! | `^deleteEdge(\w+?)From\w*$`, `^deleteEdge(\w+)$` | [`MutationShape::DeleteEdge`] |

use cypherql_common::utils::error::{Error, Result};
use regex::Regex;

/// Write template selected by a mutation name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationShape {
    /// `CREATE` a node.
    CreateNode,
    /// `SET` properties on a node found by identity.
    UpdateNode,
    /// `DETACH DELETE` a node found by identity.
    DeleteNode,
    /// `CREATE` an edge between two nodes found by identity.
    ConnectEdge,
    /// `SET` properties on an edge.
    UpdateEdge,
    /// `DELETE` an edge.
    DeleteEdge,
}

/// A classified mutation name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationName {
    /// Template to use.
    pub shape: MutationShape,
    /// Node or edge type name taken from the field name.
    pub type_name: String,
}

/// Compiled naming rules.
#[derive(Debug, Clone)]
pub struct MutationConvention {
    rules: Vec<(MutationShape, Regex)>,
}

const RULES: &[(MutationShape, &str)] = &[
    (MutationShape::CreateNode, r"^createNode(\w+)$"),
    (MutationShape::UpdateNode, r"^updateNode(\w+)$"),
    (MutationShape::DeleteNode, r"^deleteNode(\w+)$"),
    (MutationShape::ConnectEdge, r"^connectNode\w*?Edge(\w+)$"),
    (MutationShape::UpdateEdge, r"^updateEdge(\w+?)From\w*$"),
    (MutationShape::UpdateEdge, r"^updateEdge(\w+)$"),
    (MutationShape::DeleteEdge, r"^deleteEdge(\w+?)From\w*$"),
    (MutationShape::DeleteEdge, r"^deleteEdge(\w+)$"),
];

impl MutationConvention {
    /// Compiles the naming rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if a rule fails to compile.
    pub fn new() -> Result<Self> {
        let rules = RULES
            .iter()
            .map(|&(shape, pattern)| {
                Regex::new(pattern)
                    .map(|re| (shape, re))
                    .map_err(|e| Error::Internal(format!("mutation rule {pattern}: {e}")))
            })
            .collect::<Result<_>>()?;
        Ok(Self { rules })
    }

    /// Classifies a root mutation field name.
    pub fn classify(&self, field_name: &str) -> Option<MutationName> {
        self.rules.iter().find_map(|(shape, re)| {
            let caps = re.captures(field_name)?;
            Some(MutationName {
                shape: *shape,
                type_name: caps.get(1)?.as_str().to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str) -> Option<(MutationShape, String)> {
        MutationConvention::new()
            .unwrap()
            .classify(name)
            .map(|m| (m.shape, m.type_name))
    }

    #[test]
    fn test_node_mutations() {
        assert_eq!(
            classify("createNodePerson"),
            Some((MutationShape::CreateNode, "Person".to_string()))
        );
        assert_eq!(
            classify("updateNodeAirport"),
            Some((MutationShape::UpdateNode, "Airport".to_string()))
        );
        assert_eq!(
            classify("deleteNodePerson"),
            Some((MutationShape::DeleteNode, "Person".to_string()))
        );
    }

    #[test]
    fn test_edge_mutations() {
        assert_eq!(
            classify("connectNodePersonToPersonEdgeKnows"),
            Some((MutationShape::ConnectEdge, "Knows".to_string()))
        );
        assert_eq!(
            classify("updateEdgeKnowsFromPerson"),
            Some((MutationShape::UpdateEdge, "Knows".to_string()))
        );
        assert_eq!(
            classify("updateEdgeRoute"),
            Some((MutationShape::UpdateEdge, "Route".to_string()))
        );
        assert_eq!(
            classify("deleteEdgeRouteFromAirportToAirport"),
            Some((MutationShape::DeleteEdge, "Route".to_string()))
        );
    }

    #[test]
    fn test_unmatched_names() {
        assert_eq!(classify("createNode"), None);
        assert_eq!(classify("addPerson"), None);
        assert_eq!(classify("xcreateNodePerson"), None);
    }
}
