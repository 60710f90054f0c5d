use std::collections::BTreeMap;

use netgen_core::errors::{ErrorInfo, NetgenError};
use netgen_core::NodeId;

use crate::graph::Graph;

/// Combines graphs whose node identifiers are pairwise disjoint.
///
/// All nodes of every input are added before any edge. A node identifier that
/// appears in more than one input is rejected with `node-id-collision` rather
/// than being merged.
pub fn union_disjoint<'a, I>(graphs: I) -> Result<Graph, NetgenError>
where
    I: IntoIterator<Item = &'a Graph>,
{
    let graphs: Vec<&Graph> = graphs.into_iter().collect();
    let mut owners: BTreeMap<NodeId, usize> = BTreeMap::new();
    let mut master = Graph::new();
    for (index, graph) in graphs.iter().enumerate() {
        for node in graph.nodes() {
            if let Some(&owner) = owners.get(&node) {
                return Err(collision(node, owner, index));
            }
            owners.insert(node, index);
            master.add_node(node);
        }
    }
    for graph in &graphs {
        for (a, b) in graph.edges() {
            master.add_edge(a, b)?;
        }
    }
    Ok(master)
}

/// Combines graphs after passing every node through `relabel`.
///
/// `relabel` receives the position of the input graph and the original node
/// identifier. The relabeled inputs must be disjoint and the relabeling must
/// be injective within each input.
pub fn union_relabeled<'a, I, F>(graphs: I, relabel: F) -> Result<Graph, NetgenError>
where
    I: IntoIterator<Item = &'a Graph>,
    F: Fn(usize, NodeId) -> NodeId,
{
    let mut relabeled = Vec::new();
    for (index, graph) in graphs.into_iter().enumerate() {
        let mut mapped = Graph::new();
        for node in graph.nodes() {
            let target = relabel(index, node);
            if !mapped.add_node(target) {
                return Err(NetgenError::Graph(
                    ErrorInfo::new(
                        "relabel-not-injective",
                        "relabeling maps two nodes of one graph to the same identifier",
                    )
                    .with_context("graph", index)
                    .with_context("node", target),
                ));
            }
        }
        for (a, b) in graph.edges() {
            mapped.add_edge(relabel(index, a), relabel(index, b))?;
        }
        relabeled.push(mapped);
    }
    union_disjoint(relabeled.iter())
}

fn collision(node: NodeId, first: usize, second: usize) -> NetgenError {
    NetgenError::Graph(
        ErrorInfo::new(
            "node-id-collision",
            "node identifier appears in more than one input graph",
        )
        .with_context("node", node)
        .with_context("first_graph", first)
        .with_context("graph", second)
        .with_hint("use union_relabeled to shift identifiers into disjoint ranges"),
    )
}
