#![deny(missing_docs)]

//! Randomized "social circles" networks: agents are scattered over a sparse
//! 2D grid and befriend every other agent inside their reach.

pub mod agents;
pub mod config;
pub mod generator;
pub mod grid;

pub use agents::{AgentPopulation, AgentType};
pub use config::{AgentSpec, SocialCirclesConfig};
pub use generator::{
    make_social_circles_network, SocialCirclesNetwork, SocialCirclesOptions, SocialCirclesOutcome,
};
pub use grid::{
    choose_empty_spot, search_for_neighbors, DenseGrid, GridBackend, NeighborhoodBounds,
    PlacementGrid, SparseGrid, MAX_DENSE_CELLS,
};
