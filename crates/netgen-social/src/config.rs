//! YAML configuration for social circles runs.

use std::fs;
use std::path::Path;

use netgen_core::errors::{ErrorInfo, NetgenError};
use serde::{Deserialize, Serialize};

use crate::agents::{AgentPopulation, AgentType};
use crate::generator::SocialCirclesOptions;
use crate::grid::NeighborhoodBounds;

/// Parameters of a social circles run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialCirclesConfig {
    /// Number of agents shared out among the agent specs.
    #[serde(default = "default_num_agents")]
    pub num_agents: usize,
    /// Target fraction of occupied grid cells, used when `grid` is absent.
    #[serde(default = "default_density")]
    pub density: f64,
    /// Explicit `[width, height]` of the grid.
    #[serde(default)]
    pub grid: Option<[usize; 2]>,
    /// Agent types and their share of `num_agents`.
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentSpec>,
    /// Only accept networks with a single connected component.
    #[serde(default = "default_force_connected")]
    pub force_connected: bool,
    /// Attempts before giving up on a connected network.
    #[serde(default = "default_max_tries")]
    pub max_tries: usize,
    /// Treatment of the far edge of reach bounding boxes.
    #[serde(default)]
    pub neighborhood: NeighborhoodBounds,
    /// Upper bound on rejection-sampling draws per agent.
    #[serde(default = "default_max_placement_draws")]
    pub max_placement_draws: usize,
    /// Master seed.
    #[serde(default)]
    pub seed: u64,
}

/// One agent type in a [`SocialCirclesConfig`].
///
/// Exactly one of `share` and `count` may be given; a spec with neither takes
/// whatever remains of `num_agents` after all other specs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Display color.
    pub color: String,
    /// Connection radius in grid cells.
    pub reach: u32,
    /// Fraction of `num_agents`, rounded down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<f64>,
    /// Absolute number of agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl AgentSpec {
    fn new(color: &str, reach: u32, share: Option<f64>) -> Self {
        Self {
            color: color.to_string(),
            reach,
            share,
            count: None,
        }
    }
}

fn default_num_agents() -> usize {
    10_000
}

fn default_density() -> f64 {
    0.003
}

fn default_agents() -> Vec<AgentSpec> {
    vec![
        AgentSpec::new("green", 30, None),
        AgentSpec::new("blue", 40, Some(0.2)),
        AgentSpec::new("purple", 50, Some(0.1)),
    ]
}

fn default_force_connected() -> bool {
    true
}

fn default_max_tries() -> usize {
    5
}

fn default_max_placement_draws() -> usize {
    1_000_000
}

impl Default for SocialCirclesConfig {
    fn default() -> Self {
        Self {
            num_agents: default_num_agents(),
            density: default_density(),
            grid: None,
            agents: default_agents(),
            force_connected: default_force_connected(),
            max_tries: default_max_tries(),
            neighborhood: NeighborhoodBounds::default(),
            max_placement_draws: default_max_placement_draws(),
            seed: 0,
        }
    }
}

impl SocialCirclesConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, NetgenError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|err| {
            NetgenError::Config(ErrorInfo::new("invalid-yaml", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a YAML file.
    pub fn load(path: &Path) -> Result<Self, NetgenError> {
        let yaml = fs::read_to_string(path).map_err(|err| {
            NetgenError::Io(
                ErrorInfo::new("read-config", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Checks value ranges and that the agent specs fit into `num_agents`.
    pub fn validate(&self) -> Result<(), NetgenError> {
        if self.grid.is_none() && !(self.density > 0.0 && self.density <= 1.0) {
            return Err(NetgenError::Config(
                ErrorInfo::new("invalid-density", "density must lie in (0, 1]")
                    .with_context("density", self.density),
            ));
        }
        if let Some([width, height]) = self.grid {
            if width == 0 || height == 0 {
                return Err(NetgenError::Config(
                    ErrorInfo::new("empty-grid", "grid dimensions must be positive")
                        .with_context("width", width)
                        .with_context("height", height),
                ));
            }
        }
        if self.max_tries == 0 {
            return Err(NetgenError::Config(ErrorInfo::new(
                "no-attempts",
                "max_tries must allow at least one attempt",
            )));
        }
        if self.agents.is_empty() {
            return Err(NetgenError::Config(ErrorInfo::new(
                "empty-population",
                "at least one agent type is required",
            )));
        }
        let mut remainders = 0;
        for spec in &self.agents {
            match (spec.share, spec.count) {
                (Some(_), Some(_)) => {
                    return Err(NetgenError::Config(
                        ErrorInfo::new(
                            "ambiguous-quantity",
                            "an agent spec takes either a share or a count",
                        )
                        .with_context("color", &spec.color),
                    ))
                }
                (Some(share), None) if !(0.0..=1.0).contains(&share) => {
                    return Err(NetgenError::Config(
                        ErrorInfo::new("invalid-share", "shares must lie in [0, 1]")
                            .with_context("color", &spec.color)
                            .with_context("share", share),
                    ))
                }
                (None, None) => remainders += 1,
                _ => {}
            }
        }
        if remainders > 1 {
            return Err(NetgenError::Config(ErrorInfo::new(
                "multiple-remainders",
                "only one agent spec may take the remaining agents",
            )));
        }
        self.population().map(|_| ())
    }

    /// Resolves the agent specs into concrete quantities.
    ///
    /// Shares are rounded down; the remainder spec, if any, receives
    /// `num_agents` minus everything assigned to the others.
    pub fn population(&self) -> Result<AgentPopulation, NetgenError> {
        let fixed: Vec<Option<usize>> = self
            .agents
            .iter()
            .map(|spec| match (spec.share, spec.count) {
                (_, Some(count)) => Some(count),
                (Some(share), None) => Some((self.num_agents as f64 * share) as usize),
                (None, None) => None,
            })
            .collect();
        let assigned: usize = fixed.iter().flatten().sum();
        let remainder = self.num_agents.checked_sub(assigned);
        if fixed.iter().any(Option::is_none) && remainder.is_none() {
            return Err(NetgenError::Config(
                ErrorInfo::new(
                    "agents-exceed-total",
                    "agent shares and counts exceed num_agents",
                )
                .with_context("assigned", assigned)
                .with_context("num_agents", self.num_agents),
            ));
        }

        let mut population = AgentPopulation::new();
        for (spec, quantity) in self.agents.iter().zip(fixed) {
            let agent = AgentType::new(spec.color.clone(), spec.reach)?;
            population.insert(agent, quantity.or(remainder).unwrap_or(0));
        }
        Ok(population)
    }

    /// Grid dimensions: explicit, or square with `density` occupied cells.
    pub fn grid_size(&self) -> (usize, usize) {
        if let Some([width, height]) = self.grid {
            return (width, height);
        }
        let total = self.population().map(|p| p.total()).unwrap_or(self.num_agents);
        let side = (total as f64 / self.density).sqrt().ceil() as usize;
        (side.max(1), side.max(1))
    }

    /// Generator options derived from the configuration.
    pub fn options(&self) -> SocialCirclesOptions {
        SocialCirclesOptions {
            force_connected: self.force_connected,
            max_tries: self.max_tries,
            neighborhood: self.neighborhood,
            max_placement_draws: self.max_placement_draws,
        }
    }
}
