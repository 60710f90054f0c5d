use netgen_core::errors::{ErrorInfo, NetgenError};
use netgen_core::provenance::SchemaVersion;
use netgen_core::NodeId;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;

const GRAPH_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &Graph) -> Result<String, NetgenError> {
    let document = GraphDocument::from_graph(graph);
    serde_json::to_string_pretty(&document)
        .map_err(|err| NetgenError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
pub fn graph_from_json(json: &str) -> Result<Graph, NetgenError> {
    let document: GraphDocument = serde_json::from_str(json)
        .map_err(|err| NetgenError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    document.into_graph()
}

/// Versioned, serde friendly representation of a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Schema of the payload.
    pub schema_version: SchemaVersion,
    /// Raw node identifiers in ascending order.
    pub nodes: Vec<u64>,
    /// Raw `(low, high)` edge pairs in canonical order.
    pub edges: Vec<(u64, u64)>,
}

impl GraphDocument {
    /// Captures the graph into a document.
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            schema_version: GRAPH_SCHEMA,
            nodes: graph.nodes().map(|id| id.as_raw()).collect(),
            edges: graph
                .edges()
                .map(|(a, b)| (a.as_raw(), b.as_raw()))
                .collect(),
        }
    }

    /// Rebuilds the graph, validating schema and edge endpoints.
    pub fn into_graph(self) -> Result<Graph, NetgenError> {
        if self.schema_version.major != GRAPH_SCHEMA.major {
            return Err(NetgenError::Serde(
                ErrorInfo::new("schema-mismatch", "unsupported graph schema version")
                    .with_context("major", self.schema_version.major)
                    .with_context("expected", GRAPH_SCHEMA.major),
            ));
        }
        let mut graph = Graph::with_nodes(self.nodes.into_iter().map(NodeId::from_raw));
        for (a, b) in self.edges {
            graph.add_edge(NodeId::from_raw(a), NodeId::from_raw(b))?;
        }
        Ok(graph)
    }
}
