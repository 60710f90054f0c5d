use std::collections::{BTreeSet, VecDeque};

use netgen_core::NodeId;

use crate::graph::Graph;

/// Returns the connected components of the graph.
///
/// Each component is sorted, and components are ordered by their smallest node.
pub fn connected_components(graph: &Graph) -> Vec<Vec<NodeId>> {
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();
    let mut components = Vec::new();
    for start in graph.nodes() {
        if !visited.insert(start) {
            continue;
        }
        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            // nodes come from the graph itself, so the lookup cannot fail
            let Ok(neighbors) = graph.neighbors(node) else {
                continue;
            };
            for next in neighbors {
                if visited.insert(next) {
                    component.push(next);
                    queue.push_back(next);
                }
            }
        }
        component.sort();
        components.push(component);
    }
    components
}

/// Returns whether the graph consists of exactly one connected component.
///
/// The empty graph is reported as not connected.
pub fn is_connected(graph: &Graph) -> bool {
    if graph.node_count() == 0 {
        return false;
    }
    connected_components(graph).len() == 1
}
