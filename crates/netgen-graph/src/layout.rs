use std::collections::BTreeMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use netgen_core::errors::{ErrorInfo, NetgenError};
use netgen_core::{Coordinate, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::Graph;

/// Mapping from node to its 2D coordinate.
pub type Layout = BTreeMap<NodeId, Coordinate>;

/// Computes 2D coordinates for the nodes of a graph.
pub trait Layouter {
    /// Returns a coordinate for every node of `graph`.
    fn layout(&self, graph: &Graph) -> Result<Layout, NetgenError>;
}

const INITIAL_RADIUS: f64 = 100.0;
const NODE_MASS: f32 = 10.0;

/// Tuning knobs forwarded to the force simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceParameters {
    /// Repulsion between every pair of nodes.
    pub charge: f32,
    /// Spring constant along edges.
    pub spring: f32,
    /// Upper bound on the force applied to a node per step.
    pub max_force: f32,
    /// Upper bound on node speed.
    pub node_speed: f32,
    /// Velocity damping per step.
    pub damping: f32,
}

impl Default for ForceParameters {
    fn default() -> Self {
        Self {
            charge: 150.0,
            spring: 0.05,
            max_force: 100.0,
            node_speed: 3000.0,
            damping: 0.9,
        }
    }
}

impl ForceParameters {
    fn to_simulation(self) -> SimulationParameters {
        SimulationParameters {
            force_charge: self.charge,
            force_spring: self.spring,
            force_max: self.max_force,
            node_speed: self.node_speed,
            damping_factor: self.damping,
        }
    }
}

/// Force-directed layout rescaled to `[-1, 1]²`.
///
/// Nodes start evenly spaced on a circle in ascending id order and the
/// simulation is advanced a fixed number of steps, so the result is fully
/// deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceLayout {
    /// Number of simulation steps.
    pub iterations: usize,
    /// Time step passed to every simulation update.
    pub time_step: f32,
    /// Simulation parameters.
    pub parameters: ForceParameters,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            iterations: 500,
            time_step: 0.035,
            parameters: ForceParameters::default(),
        }
    }
}

impl Layouter for ForceLayout {
    fn layout(&self, graph: &Graph) -> Result<Layout, NetgenError> {
        if graph.node_count() == 0 {
            return Ok(Layout::new());
        }
        let mut simulation: ForceGraph<u64, ()> =
            ForceGraph::new(self.parameters.to_simulation());
        let count = graph.node_count() as f64;
        let mut indices = BTreeMap::new();
        for (position, node) in graph.nodes().enumerate() {
            let angle = position as f64 * 2.0 * PI / count;
            let index = simulation.add_node(NodeData {
                x: (INITIAL_RADIUS * angle.cos()) as f32,
                y: (INITIAL_RADIUS * angle.sin()) as f32,
                mass: NODE_MASS,
                is_anchor: false,
                user_data: node.as_raw(),
            });
            indices.insert(node, index);
        }
        for (a, b) in graph.edges() {
            if let (Some(&src), Some(&dst)) = (indices.get(&a), indices.get(&b)) {
                simulation.add_edge(src, dst, EdgeData::default());
            }
        }
        for _ in 0..self.iterations {
            simulation.update(self.time_step);
        }

        let mut raw = Layout::new();
        simulation.visit_nodes(|node| {
            raw.insert(
                NodeId::from_raw(node.data.user_data),
                (node.x() as f64, node.y() as f64),
            );
        });
        if let Some((node, _)) = raw
            .iter()
            .find(|(_, (x, y))| !x.is_finite() || !y.is_finite())
        {
            return Err(NetgenError::Layout(
                ErrorInfo::new("non-finite-coordinate", "force simulation diverged")
                    .with_context("node", node)
                    .with_hint("lower the time step or the charge"),
            ));
        }
        debug!(nodes = raw.len(), iterations = self.iterations, "force layout settled");
        Ok(rescale_to_unit_square(&raw))
    }
}

/// Rescales every axis independently onto `[-1, 1]`.
///
/// An axis without spread collapses to `0`.
pub fn rescale_to_unit_square(layout: &Layout) -> Layout {
    let bounds = |pick: fn(&Coordinate) -> f64| {
        layout.values().map(pick).fold(None, |acc: Option<(f64, f64)>, v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        })
    };
    let (Some(x_bounds), Some(y_bounds)) = (bounds(|c| c.0), bounds(|c| c.1)) else {
        return Layout::new();
    };
    let scale = |v: f64, (lo, hi): (f64, f64)| {
        let span = hi - lo;
        if span <= f64::EPSILON {
            0.0
        } else {
            2.0 * (v - lo) / span - 1.0
        }
    };
    layout
        .iter()
        .map(|(&node, &(x, y))| (node, (scale(x, x_bounds), scale(y, y_bounds))))
        .collect()
}
