#![deny(missing_docs)]

//! Undirected graphs, the clique-gate composer, and the text interchange format
//! consumed by the downstream visualization and partitioning tools.

mod clique_gate;
mod connectivity;
mod graph;
mod hash;
pub mod interchange;
mod layout;
mod serialization;
mod union;

pub use clique_gate::{make_complete_clique_gate_graph, CliqueGateGraph};
pub use connectivity::{connected_components, is_connected};
pub use graph::Graph;
pub use hash::canonical_hash;
pub use interchange::{
    parse_interchange, to_interchange_string, write_interchange, InterchangeDocument,
};
pub use layout::{rescale_to_unit_square, ForceLayout, ForceParameters, Layout, Layouter};
pub use union::{union_disjoint, union_relabeled};

/// Re-export serialization helpers for downstream crates.
pub use serialization::{graph_from_json, graph_to_json, GraphDocument};
