use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use crate::sim_params::{NeighborBounds, SimParams};
use std::path::Path;

/// Number of candidate neighbors of an interior cell.
pub const MOORE_NEIGHBORS: f64 = 8.0;

// Grid dimensions and boundary handling
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GridConfig {
    #[serde(default = "default_grid_side")]
    pub rows: usize,
    #[serde(default = "default_grid_side")]
    pub cols: usize,
    #[serde(default)]
    pub neighbor_bounds: NeighborBounds,
}

// Agent counts and placement seed
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PopulationConfig {
    #[serde(default = "default_agents_per_type")]
    pub blue: usize,
    #[serde(default = "default_agents_per_type")]
    pub red: usize,
    #[serde(default)]
    pub seed: Option<u64>, // Feeds both initial placement and relocation
}

// Satisfaction rule and iteration cap
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DynamicsConfig {
    /// Raw threshold: max tolerated fraction of dissimilar neighbors.
    #[serde(default)]
    pub threshold: Option<f64>,
    /// Alternative spelling: tolerated dissimilar neighbors out of 8 (threshold = value / 8).
    #[serde(default)]
    pub max_dissimilar_neighbors: Option<f64>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    #[serde(default = "default_directory")]
    pub directory: String,
    #[serde(default = "default_true")]
    pub save_history: bool,
    #[serde(default = "default_true")]
    pub save_satisfaction: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

/// Optional batch of runs over several thresholds, all other parameters fixed.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SweepConfig {
    #[serde(default)]
    pub thresholds: Vec<f64>,
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub dynamics: DynamicsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub sweep: Option<SweepConfig>,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            rows: default_grid_side(),
            cols: default_grid_side(),
            neighbor_bounds: NeighborBounds::default(),
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        PopulationConfig {
            blue: default_agents_per_type(),
            red: default_agents_per_type(),
            seed: None,
        }
    }
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        DynamicsConfig {
            threshold: None,
            max_dissimilar_neighbors: None,
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: default_base_filename(),
            directory: default_directory(),
            save_history: true,
            save_satisfaction: true,
            format: None,
        }
    }
}

impl DynamicsConfig {
    /// Resolves the effective threshold from whichever field is set.
    pub fn effective_threshold(&self) -> f64 {
        match (self.threshold, self.max_dissimilar_neighbors) {
            (Some(t), _) => t,
            (None, Some(n)) => n / MOORE_NEIGHBORS,
            (None, None) => default_max_dissimilar_neighbors() / MOORE_NEIGHBORS,
        }
    }
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file '{}'", path_ref.display()))?;
        Self::parse(&config_str)
            .with_context(|| format!("Invalid configuration in '{}'", path_ref.display()))
    }

    /// Parses and sanity-checks a TOML document.
    pub fn parse(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str).context("Failed to parse TOML")?;

        // --- Validation ---
        // Population and threshold ranges are enforced by the engine when the run is built.
        if config.dynamics.threshold.is_some() && config.dynamics.max_dissimilar_neighbors.is_some() {
            anyhow::bail!("Set either dynamics.threshold or dynamics.max_dissimilar_neighbors, not both.");
        }
        if config.output.base_filename.trim().is_empty() {
            anyhow::bail!("output.base_filename must not be empty.");
        }
        if let Some(sweep) = &config.sweep {
            if sweep.thresholds.is_empty() {
                anyhow::bail!("sweep.thresholds must list at least one threshold.");
            }
        }

        Ok(config)
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        SimParams {
            rows: self.grid.rows,
            cols: self.grid.cols,
            neighbor_bounds: self.grid.neighbor_bounds,
            blue_agents: self.population.blue,
            red_agents: self.population.red,
            seed: self.population.seed,
            threshold: self.dynamics.effective_threshold(),
            max_iterations: self.dynamics.max_iterations,
        }
    }
}

fn default_grid_side() -> usize {
    10
}

fn default_agents_per_type() -> usize {
    40
}

fn default_max_dissimilar_neighbors() -> f64 {
    3.0
}

fn default_max_iterations() -> u32 {
    10_000
}

fn default_base_filename() -> String {
    "segregation".to_string()
}

fn default_directory() -> String {
    "backups".to_string()
}

fn default_true() -> bool {
    true
}
