//! Retry-until-connected social circles generator.

use std::collections::HashMap;

use netgen_core::errors::{ErrorInfo, NetgenError};
use netgen_core::rng::RngHandle;
use netgen_core::NodeId;
use netgen_graph::{connected_components, Graph, Layout};
use tracing::{debug, info, warn};

use crate::agents::AgentPopulation;
use crate::grid::{
    choose_empty_spot, search_for_neighbors, GridBackend, NeighborhoodBounds, PlacementGrid,
};

/// Knobs of [`make_social_circles_network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialCirclesOptions {
    /// Only accept networks with a single connected component.
    pub force_connected: bool,
    /// Number of generation attempts before giving up.
    pub max_tries: usize,
    /// Treatment of the far edge of every reach bounding box.
    pub neighborhood: NeighborhoodBounds,
    /// Upper bound on rejection-sampling draws per placed agent.
    pub max_placement_draws: usize,
}

impl Default for SocialCirclesOptions {
    fn default() -> Self {
        Self {
            force_connected: true,
            max_tries: 5,
            neighborhood: NeighborhoodBounds::Inclusive,
            max_placement_draws: 1_000_000,
        }
    }
}

/// A generated social circles network.
#[derive(Debug, Clone, PartialEq)]
pub struct SocialCirclesNetwork {
    /// Friendship graph over nodes `0..n`, numbered in placement order.
    pub graph: Graph,
    /// Grid positions rescaled to `[-1, 1)` per axis.
    pub layout: Layout,
    /// Color of every node, indexed by node id.
    pub colors: Vec<String>,
    /// Raw grid cell of every node, indexed by node id.
    pub positions: Vec<(usize, usize)>,
    /// Attempt (1-based) that produced the network.
    pub attempts: usize,
}

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub enum SocialCirclesOutcome {
    /// A network satisfying the connectivity requirement.
    Generated(SocialCirclesNetwork),
    /// Every attempt produced a disconnected network.
    Exhausted {
        /// Number of attempts made.
        attempts: usize,
    },
}

impl SocialCirclesOutcome {
    /// Returns the network, if one was generated.
    pub fn into_network(self) -> Option<SocialCirclesNetwork> {
        match self {
            SocialCirclesOutcome::Generated(network) => Some(network),
            SocialCirclesOutcome::Exhausted { .. } => None,
        }
    }
}

/// Generates a social circles network.
///
/// Agents are placed on an empty `grid_size` grid, widest reach first, each in
/// a uniformly random empty cell. Once every agent of a type is placed, each of
/// them is linked to every other agent within its reach. When
/// `force_connected` is set, disconnected results are discarded and the whole
/// construction is repeated up to `max_tries` times; running out of attempts
/// yields [`SocialCirclesOutcome::Exhausted`], never a disconnected graph.
pub fn make_social_circles_network(
    population: &AgentPopulation,
    grid_size: (usize, usize),
    options: &SocialCirclesOptions,
    rng: &mut RngHandle,
) -> Result<SocialCirclesOutcome, NetgenError> {
    validate(population, grid_size, options)?;

    for attempt in 1..=options.max_tries {
        let mut network = build_attempt(population, grid_size, options, rng)?;
        network.attempts = attempt;
        if !options.force_connected {
            info!(attempt, nodes = network.graph.node_count(), "social circles network generated");
            return Ok(SocialCirclesOutcome::Generated(network));
        }
        let components = connected_components(&network.graph).len();
        if components == 1 {
            info!(
                attempt,
                nodes = network.graph.node_count(),
                edges = network.graph.edge_count(),
                "connected social circles network generated"
            );
            return Ok(SocialCirclesOutcome::Generated(network));
        }
        info!(attempt, components, "network is disconnected, retrying");
    }

    warn!(attempts = options.max_tries, "no connected network within the attempt budget");
    Ok(SocialCirclesOutcome::Exhausted {
        attempts: options.max_tries,
    })
}

fn build_attempt(
    population: &AgentPopulation,
    grid_size: (usize, usize),
    options: &SocialCirclesOptions,
    rng: &mut RngHandle,
) -> Result<SocialCirclesNetwork, NetgenError> {
    let (width, height) = grid_size;
    let total = population.total();
    let mut grid = GridBackend::allocate(width, height);
    let mut graph = Graph::with_nodes((0..total).map(NodeId::from_index));
    let mut positions: Vec<(usize, usize)> = Vec::with_capacity(total);
    let mut colors: Vec<String> = Vec::with_capacity(total);
    let mut loc_to_id: HashMap<(usize, usize), NodeId> = HashMap::with_capacity(total);

    for (agent, quantity) in population.by_descending_reach() {
        debug!(color = %agent.color, reach = agent.reach, quantity, "placing agents");
        let first = positions.len();
        for _ in 0..quantity {
            let (x, y) = choose_empty_spot(&grid, rng, options.max_placement_draws)?;
            grid.set(x, y, agent.reach);
            loc_to_id.insert((x, y), NodeId::from_index(positions.len()));
            positions.push((x, y));
            colors.push(agent.color.clone());
        }

        debug!(color = %agent.color, "connecting agents");
        for (offset, &(x, y)) in positions[first..].iter().enumerate() {
            let id = NodeId::from_index(first + offset);
            for cell in search_for_neighbors(&grid, x, y, options.neighborhood) {
                if let Some(&other) = loc_to_id.get(&cell) {
                    graph.add_edge(id, other)?;
                }
            }
        }
    }

    let layout = positions
        .iter()
        .enumerate()
        .map(|(index, &(x, y))| {
            (
                NodeId::from_index(index),
                (
                    2.0 * x as f64 / width as f64 - 1.0,
                    2.0 * y as f64 / height as f64 - 1.0,
                ),
            )
        })
        .collect();

    Ok(SocialCirclesNetwork {
        graph,
        layout,
        colors,
        positions,
        attempts: 0,
    })
}

fn validate(
    population: &AgentPopulation,
    (width, height): (usize, usize),
    options: &SocialCirclesOptions,
) -> Result<(), NetgenError> {
    if population.is_empty() {
        return Err(NetgenError::Config(ErrorInfo::new(
            "empty-population",
            "at least one agent must be requested",
        )));
    }
    if let Some((agent, _)) = population.iter().find(|(agent, _)| agent.reach == 0) {
        return Err(NetgenError::Config(
            ErrorInfo::new("invalid-reach", "agent reach must be a positive radius")
                .with_context("color", &agent.color),
        ));
    }
    if width == 0 || height == 0 {
        return Err(NetgenError::Config(
            ErrorInfo::new("empty-grid", "grid dimensions must be positive")
                .with_context("width", width)
                .with_context("height", height),
        ));
    }
    if options.max_tries == 0 {
        return Err(NetgenError::Config(ErrorInfo::new(
            "no-attempts",
            "max_tries must allow at least one attempt",
        )));
    }
    let cells = width.saturating_mul(height);
    if population.total() > cells {
        return Err(NetgenError::Grid(
            ErrorInfo::new("grid-saturated", "more agents requested than the grid has cells")
                .with_context("agents", population.total())
                .with_context("cells", cells),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentType;

    fn population(entries: &[(&str, u32, usize)]) -> AgentPopulation {
        entries
            .iter()
            .fold(AgentPopulation::new(), |population, &(color, reach, quantity)| {
                population.with(AgentType::new(color, reach).unwrap(), quantity)
            })
    }

    #[test]
    fn colors_follow_placement_order() {
        let population = population(&[("green", 2, 3), ("purple", 5, 2)]);
        let options = SocialCirclesOptions {
            force_connected: false,
            ..SocialCirclesOptions::default()
        };
        let mut rng = RngHandle::from_seed(5);
        let network = make_social_circles_network(&population, (20, 20), &options, &mut rng)
            .unwrap()
            .into_network()
            .unwrap();
        assert_eq!(
            network.colors,
            vec!["purple", "purple", "green", "green", "green"]
        );
        assert_eq!(network.attempts, 1);
        assert_eq!(network.graph.node_count(), 5);
    }

    #[test]
    fn layout_is_rescaled_grid_position() {
        let population = population(&[("blue", 1, 4)]);
        let options = SocialCirclesOptions {
            force_connected: false,
            ..SocialCirclesOptions::default()
        };
        let mut rng = RngHandle::from_seed(9);
        let network = make_social_circles_network(&population, (8, 4), &options, &mut rng)
            .unwrap()
            .into_network()
            .unwrap();
        for (index, &(x, y)) in network.positions.iter().enumerate() {
            let (lx, ly) = network.layout[&NodeId::from_index(index)];
            assert_eq!(lx, 2.0 * x as f64 / 8.0 - 1.0);
            assert_eq!(ly, 2.0 * y as f64 / 4.0 - 1.0);
            assert!((-1.0..1.0).contains(&lx) && (-1.0..1.0).contains(&ly));
        }
    }

    #[test]
    fn grids_too_large_to_count_still_generate() {
        let population = population(&[("green", 3, 2)]);
        let options = SocialCirclesOptions {
            force_connected: false,
            ..SocialCirclesOptions::default()
        };
        let mut rng = RngHandle::from_seed(21);
        let side = 10_000_000_000;
        let network = make_social_circles_network(&population, (side, side), &options, &mut rng)
            .unwrap()
            .into_network()
            .unwrap();
        assert_eq!(network.graph.node_count(), 2);
        assert_ne!(network.positions[0], network.positions[1]);
        for &(x, y) in &network.positions {
            assert!(x < side && y < side);
        }
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let mut rng = RngHandle::from_seed(1);
        let options = SocialCirclesOptions::default();
        let err = make_social_circles_network(&AgentPopulation::new(), (4, 4), &options, &mut rng)
            .unwrap_err();
        assert_eq!(err.code(), "empty-population");

        let crowd = population(&[("green", 1, 5)]);
        let err = make_social_circles_network(&crowd, (2, 2), &options, &mut rng).unwrap_err();
        assert_eq!(err.code(), "grid-saturated");

        let err = make_social_circles_network(&crowd, (0, 9), &options, &mut rng).unwrap_err();
        assert_eq!(err.code(), "empty-grid");

        let none = SocialCirclesOptions {
            max_tries: 0,
            ..options
        };
        let err = make_social_circles_network(&crowd, (9, 9), &none, &mut rng).unwrap_err();
        assert_eq!(err.code(), "no-attempts");
    }
}
