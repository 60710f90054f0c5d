//! Line oriented text format read by the graph visualizer and the partitioning
//! tools.
//!
//! ```text
//! <N>
//! <id_a> <id_b>        one line per edge
//!
//! <id> <x> <y>         one line per node with a layout coordinate
//!
//! ```
//!
//! Identifiers are dense integers in `[0, N)`. They are assigned from the full
//! node set in ascending node order, so nodes without edges keep their place.

use std::collections::BTreeMap;
use std::io::Write;

use netgen_core::errors::{ErrorInfo, NetgenError};
use netgen_core::{Coordinate, NodeId};

use crate::graph::Graph;
use crate::layout::Layout;

/// Writes the graph, and optionally its layout, in the interchange format.
///
/// When a layout is supplied it must cover every node; the check happens
/// before anything is written.
pub fn write_interchange<W: Write>(
    graph: &Graph,
    layout: Option<&Layout>,
    writer: &mut W,
) -> Result<(), NetgenError> {
    let dense: BTreeMap<NodeId, usize> = graph
        .nodes()
        .enumerate()
        .map(|(index, node)| (node, index))
        .collect();

    let mut positions: Vec<(usize, Coordinate)> = Vec::new();
    if let Some(layout) = layout {
        for (&node, &index) in &dense {
            let coordinate = layout.get(&node).copied().ok_or_else(|| {
                NetgenError::Serde(
                    ErrorInfo::new("layout-missing-node", "layout has no coordinate for node")
                        .with_context("node", node),
                )
            })?;
            positions.push((index, coordinate));
        }
    }

    writeln!(writer, "{}", graph.node_count())?;
    for (a, b) in graph.edges() {
        writeln!(writer, "{} {}", dense[&a], dense[&b])?;
    }
    writeln!(writer)?;
    for (index, (x, y)) in positions {
        writeln!(writer, "{index} {x} {y}")?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Renders the interchange format into a string.
pub fn to_interchange_string(
    graph: &Graph,
    layout: Option<&Layout>,
) -> Result<String, NetgenError> {
    let mut buffer = Vec::new();
    write_interchange(graph, layout, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| NetgenError::Serde(ErrorInfo::new("invalid-utf8", err.to_string())))
}

/// Parsed contents of an interchange document.
#[derive(Debug, Clone, PartialEq)]
pub struct InterchangeDocument {
    /// Declared number of nodes.
    pub node_count: usize,
    /// Edge lines in file order.
    pub edges: Vec<(usize, usize)>,
    /// Coordinate lines in file order.
    pub positions: Vec<(usize, Coordinate)>,
}

impl InterchangeDocument {
    /// Rebuilds a graph over the dense identifiers `[0, node_count)`.
    pub fn to_graph(&self) -> Result<Graph, NetgenError> {
        let mut graph = Graph::with_nodes((0..self.node_count).map(NodeId::from_index));
        for &(a, b) in &self.edges {
            graph.add_edge(NodeId::from_index(a), NodeId::from_index(b))?;
        }
        Ok(graph)
    }

    /// Returns the coordinates keyed by dense identifier.
    pub fn layout(&self) -> Layout {
        self.positions
            .iter()
            .map(|&(index, coordinate)| (NodeId::from_index(index), coordinate))
            .collect()
    }
}

/// Parses a document produced by [`write_interchange`].
pub fn parse_interchange(text: &str) -> Result<InterchangeDocument, NetgenError> {
    let mut lines = text.lines().enumerate();
    let node_count = match lines.next() {
        Some((_, header)) if !header.trim().is_empty() => {
            header.trim().parse::<usize>().map_err(|err| {
                NetgenError::Serde(
                    ErrorInfo::new("missing-node-count", "first line must hold the node count")
                        .with_context("line", 1)
                        .with_context("reason", err),
                )
            })?
        }
        _ => {
            return Err(NetgenError::Serde(ErrorInfo::new(
                "missing-node-count",
                "document is empty",
            )))
        }
    };

    let mut edges = Vec::new();
    for (index, line) in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let ids = match fields.as_slice() {
            [a, b] => a.parse::<usize>().ok().zip(b.parse::<usize>().ok()),
            _ => None,
        };
        let (a, b) = ids.ok_or_else(|| {
            NetgenError::Serde(
                ErrorInfo::new("bad-edge-line", "edge lines hold two integer identifiers")
                    .with_context("line", index + 1),
            )
        })?;
        for id in [a, b] {
            check_range(id, node_count, index, "edge-out-of-range")?;
        }
        edges.push((a, b));
    }

    let mut positions = Vec::new();
    for (index, line) in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let parsed = match fields.as_slice() {
            [id, x, y] => match (id.parse::<usize>(), x.parse::<f64>(), y.parse::<f64>()) {
                (Ok(id), Ok(x), Ok(y)) => Some((id, (x, y))),
                _ => None,
            },
            _ => None,
        };
        let (id, coordinate) = parsed.ok_or_else(|| {
            NetgenError::Serde(
                ErrorInfo::new(
                    "bad-position-line",
                    "position lines hold an identifier and two coordinates",
                )
                .with_context("line", index + 1),
            )
        })?;
        check_range(id, node_count, index, "position-out-of-range")?;
        positions.push((id, coordinate));
    }

    Ok(InterchangeDocument {
        node_count,
        edges,
        positions,
    })
}

fn check_range(id: usize, node_count: usize, index: usize, code: &str) -> Result<(), NetgenError> {
    if id < node_count {
        return Ok(());
    }
    Err(NetgenError::Serde(
        ErrorInfo::new(code, "identifier exceeds the declared node count")
            .with_context("id", id)
            .with_context("node_count", node_count)
            .with_context("line", index + 1),
    ))
}
