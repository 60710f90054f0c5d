use std::collections::BTreeMap;

use netgen_core::NodeId;
use netgen_graph::{
    canonical_hash, graph_from_json, graph_to_json, make_complete_clique_gate_graph,
    parse_interchange, to_interchange_string, Graph, Layout,
};

fn node(raw: u64) -> NodeId {
    NodeId::from_raw(raw)
}

#[test]
fn sparse_ids_are_remapped_to_a_dense_range() {
    let mut graph = Graph::with_nodes([node(4), node(9), node(17), node(40)]);
    graph.add_edge(node(4), node(17)).unwrap();
    graph.add_edge(node(17), node(40)).unwrap();
    graph.add_edge(node(9), node(40)).unwrap();

    let text = to_interchange_string(&graph, None).unwrap();
    let document = parse_interchange(&text).unwrap();
    assert_eq!(document.node_count, 4);

    let remap: BTreeMap<NodeId, usize> =
        graph.nodes().enumerate().map(|(i, n)| (n, i)).collect();
    let mut expected: Vec<(usize, usize)> = graph
        .edges()
        .map(|(a, b)| (remap[&a], remap[&b]))
        .collect();
    let mut parsed = document.edges.clone();
    expected.sort();
    parsed.sort();
    assert_eq!(parsed, expected);
}

#[test]
fn isolated_nodes_survive_serialization() {
    let mut graph = Graph::with_nodes((0..5).map(node));
    graph.add_edge(node(1), node(3)).unwrap();
    let layout: Layout = graph
        .nodes()
        .map(|n| (n, (n.as_raw() as f64 / 4.0, 0.0)))
        .collect();

    let text = to_interchange_string(&graph, Some(&layout)).unwrap();
    let document = parse_interchange(&text).unwrap();
    assert_eq!(document.node_count, 5);
    assert_eq!(document.positions.len(), 5);

    let restored = document.to_graph().unwrap();
    assert_eq!(restored, graph);
    assert_eq!(document.layout(), layout);
}

#[test]
fn clique_gate_round_trips_through_both_formats() {
    let built = make_complete_clique_gate_graph(3, 4, 2).unwrap();
    let text = to_interchange_string(&built.graph, None).unwrap();
    let restored = parse_interchange(&text).unwrap().to_graph().unwrap();
    // ids are already dense, so the remap is the identity
    assert_eq!(canonical_hash(&restored), canonical_hash(&built.graph));

    let json = graph_to_json(&built.graph).unwrap();
    let from_json = graph_from_json(&json).unwrap();
    assert_eq!(from_json, built.graph);
}

#[test]
fn json_rejects_unknown_schema_major() {
    let json = r#"{"schema_version":{"major":9,"minor":0,"patch":0},"nodes":[0,1],"edges":[[0,1]]}"#;
    let err = graph_from_json(json).unwrap_err();
    assert_eq!(err.code(), "schema-mismatch");
}

#[test]
fn json_rejects_dangling_edges() {
    let json = r#"{"schema_version":{"major":1,"minor":0,"patch":0},"nodes":[0],"edges":[[0,1]]}"#;
    let err = graph_from_json(json).unwrap_err();
    assert_eq!(err.code(), "unknown-node");
}
