use netgen_core::errors::{ErrorInfo, NetgenError};
use netgen_core::NodeId;
use tracing::debug;

use crate::graph::Graph;
use crate::union::union_disjoint;

/// Clique-gate graph together with the node blocks it was assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliqueGateGraph {
    /// The assembled graph.
    pub graph: Graph,
    /// Node blocks of every gate, in wiring order.
    pub gates: Vec<Vec<NodeId>>,
    /// Node blocks of every big component.
    pub components: Vec<Vec<NodeId>>,
    /// `(source, destination)` component indices joined by each gate.
    pub gate_pairs: Vec<(usize, usize)>,
}

impl CliqueGateGraph {
    /// Number of gates, `C(num_big_components, 2)`.
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }
}

/// Builds a clique-gate graph.
///
/// The graph consists of `num_big_components` complete graphs of
/// `big_component_size` nodes. Every unordered pair of big components is
/// joined by its own complete "gate" of `gate_size` nodes: the first half of
/// the gate is wired one-to-one onto the leading nodes of the source component
/// and the second half onto the leading nodes of the destination component.
///
/// Gates take the identifiers `[0, num_gates * gate_size)`; big components
/// follow in contiguous blocks.
pub fn make_complete_clique_gate_graph(
    num_big_components: usize,
    big_component_size: usize,
    gate_size: usize,
) -> Result<CliqueGateGraph, NetgenError> {
    validate(num_big_components, big_component_size, gate_size)?;

    let num_gates = num_big_components * (num_big_components - 1) / 2;
    let gates: Vec<Vec<NodeId>> = (0..num_gates)
        .map(|gate| block(gate * gate_size, gate_size))
        .collect();
    let first_component_id = num_gates * gate_size;
    let components: Vec<Vec<NodeId>> = (0..num_big_components)
        .map(|comp| block(first_component_id + comp * big_component_size, big_component_size))
        .collect();

    let cliques: Vec<Graph> = gates
        .iter()
        .chain(components.iter())
        .map(|ids| Graph::complete(ids.iter().copied()))
        .collect();
    let mut graph = union_disjoint(cliques.iter())?;

    let half = gate_size / 2;
    let mut gate_pairs = Vec::with_capacity(num_gates);
    let mut pairs = (0..num_big_components)
        .flat_map(|src| (src + 1..num_big_components).map(move |dst| (src, dst)));
    for gate in &gates {
        let Some((src, dst)) = pairs.next() else {
            break;
        };
        let (src_half, dst_half) = gate.split_at(half);
        for (&gate_node, &comp_node) in src_half.iter().zip(&components[src]) {
            graph.add_edge(gate_node, comp_node)?;
        }
        for (&gate_node, &comp_node) in dst_half.iter().zip(&components[dst]) {
            graph.add_edge(gate_node, comp_node)?;
        }
        gate_pairs.push((src, dst));
    }

    debug!(
        num_big_components,
        big_component_size,
        gate_size,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built clique-gate graph"
    );

    Ok(CliqueGateGraph {
        graph,
        gates,
        components,
        gate_pairs,
    })
}

fn block(start: usize, len: usize) -> Vec<NodeId> {
    (start..start + len).map(NodeId::from_index).collect()
}

fn validate(
    num_big_components: usize,
    big_component_size: usize,
    gate_size: usize,
) -> Result<(), NetgenError> {
    if num_big_components < 2 {
        return Err(NetgenError::Config(
            ErrorInfo::new(
                "too-few-components",
                "a clique-gate graph needs at least two big components",
            )
            .with_context("num_big_components", num_big_components),
        ));
    }
    if big_component_size == 0 {
        return Err(NetgenError::Config(
            ErrorInfo::new("empty-component", "big components need at least one node")
                .with_context("big_component_size", big_component_size),
        ));
    }
    if gate_size < 2 || gate_size % 2 != 0 {
        return Err(NetgenError::Config(
            ErrorInfo::new("invalid-gate-size", "gate size must be an even number of at least 2")
                .with_context("gate_size", gate_size),
        ));
    }
    if gate_size / 2 > big_component_size {
        return Err(NetgenError::Config(
            ErrorInfo::new(
                "gate-exceeds-component",
                "half a gate must fit onto the nodes of a big component",
            )
            .with_context("gate_size", gate_size)
            .with_context("big_component_size", big_component_size)
            .with_hint("use a gate size of at most twice the big component size"),
        ));
    }
    Ok(())
}
