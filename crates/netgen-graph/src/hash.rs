use sha2::{Digest, Sha256};

use crate::graph::Graph;

/// Computes the canonical structural hash for the provided graph.
///
/// The digest covers the sorted node list and the canonical edge list, so two
/// graphs hash equal exactly when they have the same nodes and edges.
pub fn canonical_hash(graph: &Graph) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"netgen-graph:v1");

    hasher.update((graph.node_count() as u64).to_le_bytes());
    for node in graph.nodes() {
        hasher.update(node.as_raw().to_le_bytes());
    }

    hasher.update((graph.edge_count() as u64).to_le_bytes());
    for (a, b) in graph.edges() {
        hasher.update(a.as_raw().to_le_bytes());
        hasher.update(b.as_raw().to_le_bytes());
    }

    format!("{:x}", hasher.finalize())
}
