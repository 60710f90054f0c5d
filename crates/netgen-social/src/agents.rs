//! Agent types and the population handed to the generator.

use indexmap::IndexMap;
use netgen_core::errors::{ErrorInfo, NetgenError};
use serde::{Deserialize, Serialize};

/// A kind of agent: a display color and the radius it reaches out to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentType {
    /// Color used when drawing agents of this type.
    pub color: String,
    /// Connection radius in grid cells.
    pub reach: u32,
}

impl AgentType {
    /// Creates an agent type, rejecting a zero reach.
    pub fn new(color: impl Into<String>, reach: u32) -> Result<Self, NetgenError> {
        let color = color.into();
        if reach == 0 {
            return Err(NetgenError::Config(
                ErrorInfo::new("invalid-reach", "agent reach must be a positive radius")
                    .with_context("color", &color),
            ));
        }
        Ok(Self { color, reach })
    }
}

/// Requested quantity per agent type, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentPopulation {
    quantities: IndexMap<AgentType, usize>,
}

impl AgentPopulation {
    /// Creates an empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` agents of the given type.
    pub fn insert(&mut self, agent: AgentType, quantity: usize) -> &mut Self {
        *self.quantities.entry(agent).or_insert(0) += quantity;
        self
    }

    /// Builder variant of [`AgentPopulation::insert`].
    pub fn with(mut self, agent: AgentType, quantity: usize) -> Self {
        self.insert(agent, quantity);
        self
    }

    /// Total number of agents across all types.
    pub fn total(&self) -> usize {
        self.quantities.values().sum()
    }

    /// Returns whether no agent was requested.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterates over agent types and quantities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&AgentType, usize)> + '_ {
        self.quantities.iter().map(|(agent, &quantity)| (agent, quantity))
    }

    /// Agent types ordered by descending reach.
    ///
    /// Types with equal reach keep their insertion order.
    pub fn by_descending_reach(&self) -> Vec<(&AgentType, usize)> {
        let mut ordered: Vec<_> = self.iter().collect();
        ordered.sort_by(|a, b| b.0.reach.cmp(&a.0.reach));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(color: &str, reach: u32) -> AgentType {
        AgentType::new(color, reach).unwrap()
    }

    #[test]
    fn zero_reach_is_rejected() {
        let err = AgentType::new("grey", 0).unwrap_err();
        assert_eq!(err.code(), "invalid-reach");
    }

    #[test]
    fn widest_reach_comes_first_and_ties_keep_order() {
        let population = AgentPopulation::new()
            .with(agent("green", 30), 7)
            .with(agent("purple", 50), 1)
            .with(agent("teal", 30), 2)
            .with(agent("blue", 40), 2);
        let order: Vec<&str> = population
            .by_descending_reach()
            .into_iter()
            .map(|(agent, _)| agent.color.as_str())
            .collect();
        assert_eq!(order, vec!["purple", "blue", "green", "teal"]);
        assert_eq!(population.total(), 12);
    }

    #[test]
    fn repeated_types_accumulate() {
        let mut population = AgentPopulation::new();
        population.insert(agent("green", 3), 2).insert(agent("green", 3), 5);
        assert_eq!(population.iter().count(), 1);
        assert_eq!(population.total(), 7);
    }
}
