use std::collections::{BTreeMap, BTreeSet};

use netgen_core::errors::{ErrorInfo, NetgenError};
use netgen_core::NodeId;

/// Simple undirected graph over [`NodeId`]s.
///
/// Nodes and adjacency lists are kept in ordered collections so that every
/// traversal (and therefore every serialized artifact) is deterministic.
/// Edges are unordered pairs of distinct nodes; parallel edges collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
    edge_count: usize,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an edgeless graph containing the provided nodes.
    pub fn with_nodes(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        graph
    }

    /// Creates the complete graph over the provided nodes.
    pub fn complete(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let members: Vec<NodeId> = nodes.into_iter().collect();
        let mut graph = Self::with_nodes(members.iter().copied());
        for (offset, &a) in members.iter().enumerate() {
            for &b in &members[offset + 1..] {
                if a != b {
                    graph.link(a, b);
                }
            }
        }
        graph
    }

    /// Adds a node, returning `false` when it was already present.
    pub fn add_node(&mut self, node: NodeId) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, BTreeSet::new());
        true
    }

    /// Adds an undirected edge between two existing, distinct nodes.
    ///
    /// Returns `Ok(false)` when the edge was already present.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool, NetgenError> {
        if a == b {
            return Err(NetgenError::Graph(
                ErrorInfo::new("self-loop", "edges must join two distinct nodes")
                    .with_context("node", a),
            ));
        }
        for node in [a, b] {
            if !self.adjacency.contains_key(&node) {
                return Err(NetgenError::Graph(
                    ErrorInfo::new("unknown-node", "edge endpoint is not a node of the graph")
                        .with_context("node", node),
                ));
            }
        }
        Ok(self.link(a, b))
    }

    fn link(&mut self, a: NodeId, b: NodeId) -> bool {
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        if inserted {
            self.edge_count += 1;
        }
        inserted
    }

    /// Returns whether the node is part of the graph.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Returns whether the undirected edge `{a, b}` is part of the graph.
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency
            .get(&a)
            .map(|neighbors| neighbors.contains(&b))
            .unwrap_or(false)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterates over nodes in ascending order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Iterates over edges as `(low, high)` pairs in lexicographic order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency.iter().flat_map(|(&node, neighbors)| {
            neighbors
                .range(node..)
                .filter(move |&&other| other != node)
                .map(move |&other| (node, other))
        })
    }

    /// Returns the neighbors of a node in ascending order.
    pub fn neighbors(
        &self,
        node: NodeId,
    ) -> Result<impl Iterator<Item = NodeId> + '_, NetgenError> {
        self.adjacency
            .get(&node)
            .map(|neighbors| neighbors.iter().copied())
            .ok_or_else(|| {
                NetgenError::Graph(
                    ErrorInfo::new("unknown-node", "node is not part of the graph")
                        .with_context("node", node),
                )
            })
    }

    /// Returns the degree of a node.
    pub fn degree(&self, node: NodeId) -> Result<usize, NetgenError> {
        Ok(self.neighbors(node)?.count())
    }
}
