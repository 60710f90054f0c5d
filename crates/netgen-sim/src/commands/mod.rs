pub mod clique_gate;
pub mod export;
pub mod social_circles;
