use netgen_core::rng::RngHandle;
use netgen_core::NodeId;
use netgen_graph::{connected_components, is_connected};
use netgen_social::{
    make_social_circles_network, AgentPopulation, AgentType, NeighborhoodBounds,
    SocialCirclesNetwork, SocialCirclesOptions, SocialCirclesOutcome,
};
use proptest::prelude::*;

fn population(entries: &[(&str, u32, usize)]) -> AgentPopulation {
    let mut population = AgentPopulation::new();
    for &(color, reach, quantity) in entries {
        population.insert(AgentType::new(color, reach).unwrap(), quantity);
    }
    population
}

fn reach_of(network: &SocialCirclesNetwork, population: &AgentPopulation, node: NodeId) -> u32 {
    let color = &network.colors[node.as_raw() as usize];
    population
        .iter()
        .find(|(agent, _)| &agent.color == color)
        .map(|(agent, _)| agent.reach)
        .unwrap()
}

fn distance_sq(network: &SocialCirclesNetwork, a: NodeId, b: NodeId) -> u64 {
    let (ax, ay) = network.positions[a.as_raw() as usize];
    let (bx, by) = network.positions[b.as_raw() as usize];
    let dx = ax.abs_diff(bx) as u64;
    let dy = ay.abs_diff(by) as u64;
    dx * dx + dy * dy
}

fn unconstrained(bounds: NeighborhoodBounds) -> SocialCirclesOptions {
    SocialCirclesOptions {
        force_connected: false,
        neighborhood: bounds,
        ..SocialCirclesOptions::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_edge_is_within_some_reach(
        seed in any::<u64>(),
        small in 1usize..25,
        large in 0usize..6
    ) {
        let population = population(&[("green", 3, small), ("purple", 6, large)]);
        let mut rng = RngHandle::from_seed(seed);
        let network = make_social_circles_network(
            &population,
            (24, 24),
            &unconstrained(NeighborhoodBounds::Inclusive),
            &mut rng,
        )
        .unwrap()
        .into_network()
        .unwrap();

        prop_assert_eq!(network.graph.node_count(), small + large);
        for (a, b) in network.graph.edges() {
            let reach = reach_of(&network, &population, a)
                .max(reach_of(&network, &population, b)) as u64;
            prop_assert!(distance_sq(&network, a, b) <= reach * reach);
        }
    }

    #[test]
    fn mixed_links_use_the_later_type_reach(
        seed in any::<u64>(),
        small in 1usize..25,
        large in 1usize..6
    ) {
        // purple agents are placed and scanned before any green exists, so a
        // purple-green link only comes from the green agent's reach
        let population = population(&[("green", 3, small), ("purple", 6, large)]);
        let mut rng = RngHandle::from_seed(seed);
        let network = make_social_circles_network(
            &population,
            (24, 24),
            &unconstrained(NeighborhoodBounds::Inclusive),
            &mut rng,
        )
        .unwrap()
        .into_network()
        .unwrap();

        let nodes: Vec<NodeId> = network.graph.nodes().collect();
        for (offset, &a) in nodes.iter().enumerate() {
            for &b in &nodes[offset + 1..] {
                let reach_a = reach_of(&network, &population, a);
                let reach_b = reach_of(&network, &population, b);
                if reach_a == reach_b {
                    continue;
                }
                let within = distance_sq(&network, a, b) <= 9;
                prop_assert_eq!(network.graph.contains_edge(a, b), within);
            }
        }
    }

    #[test]
    fn inclusive_bounds_link_every_pair_in_reach(seed in any::<u64>(), count in 2usize..20) {
        let population = population(&[("blue", 4, count)]);
        let mut rng = RngHandle::from_seed(seed);
        let network = make_social_circles_network(
            &population,
            (16, 16),
            &unconstrained(NeighborhoodBounds::Inclusive),
            &mut rng,
        )
        .unwrap()
        .into_network()
        .unwrap();

        let nodes: Vec<NodeId> = network.graph.nodes().collect();
        for (offset, &a) in nodes.iter().enumerate() {
            for &b in &nodes[offset + 1..] {
                let linked = network.graph.contains_edge(a, b);
                prop_assert_eq!(linked, distance_sq(&network, a, b) <= 16);
            }
        }
    }

    #[test]
    fn forced_runs_never_return_disconnected_graphs(seed in any::<u64>()) {
        let population = population(&[("green", 3, 12)]);
        let options = SocialCirclesOptions {
            max_tries: 3,
            ..SocialCirclesOptions::default()
        };
        let mut rng = RngHandle::from_seed(seed);
        match make_social_circles_network(&population, (14, 14), &options, &mut rng).unwrap() {
            SocialCirclesOutcome::Generated(network) => {
                prop_assert!(is_connected(&network.graph));
                prop_assert!(network.attempts >= 1 && network.attempts <= 3);
            }
            SocialCirclesOutcome::Exhausted { attempts } => prop_assert_eq!(attempts, 3),
        }
    }
}

#[test]
fn same_seed_reproduces_the_network() {
    let population = population(&[("green", 3, 30), ("blue", 5, 8)]);
    let options = unconstrained(NeighborhoodBounds::Inclusive);
    let run = |seed| {
        let mut rng = RngHandle::from_seed(seed);
        make_social_circles_network(&population, (40, 40), &options, &mut rng).unwrap()
    };
    let first = run(77);
    let second = run(77);
    assert_eq!(first, second);
}

#[test]
fn hopeless_density_exhausts_attempts() {
    // two agents of reach 1 on a huge grid essentially never touch
    let population = population(&[("grey", 1, 2)]);
    let options = SocialCirclesOptions {
        max_tries: 4,
        ..SocialCirclesOptions::default()
    };
    let mut rng = RngHandle::from_seed(2024);
    let outcome = make_social_circles_network(&population, (1_000, 1_000), &options, &mut rng)
        .unwrap();
    assert_eq!(outcome, SocialCirclesOutcome::Exhausted { attempts: 4 });
}

#[test]
fn saturated_grid_connects_on_first_attempt() {
    // every cell is filled, so every agent sees its grid neighbours
    let population = population(&[("green", 1, 16)]);
    let mut rng = RngHandle::from_seed(8);
    let network = make_social_circles_network(
        &population,
        (4, 4),
        &SocialCirclesOptions::default(),
        &mut rng,
    )
    .unwrap()
    .into_network()
    .unwrap();
    assert_eq!(network.attempts, 1);
    assert_eq!(connected_components(&network.graph).len(), 1);
    // 4x4 lattice: 2 * 4 * 3 orthogonal neighbours
    assert_eq!(network.graph.edge_count(), 24);
}

#[test]
fn half_open_bounds_drop_far_edge_links() {
    let population = population(&[("green", 1, 16)]);
    let mut rng = RngHandle::from_seed(8);
    let network = make_social_circles_network(
        &population,
        (4, 4),
        &unconstrained(NeighborhoodBounds::HalfOpen),
        &mut rng,
    )
    .unwrap()
    .into_network()
    .unwrap();
    // links only reach towards lower coordinates, and nothing scans the last
    // row or column
    assert!(network.graph.edge_count() < 24);
    for (a, b) in network.graph.edges() {
        assert!(distance_sq(&network, a, b) <= 1);
    }
}
