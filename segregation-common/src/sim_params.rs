use serde::{Deserialize, Serialize};

/// Which lower-bound comparison the neighborhood evaluator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborBounds {
    /// Every in-grid neighbor is considered (`i - 1 >= 0` on the low side).
    #[default]
    Inclusive,
    /// Low-side neighbors count only when `i - 1 > 0`, so row/column 0 is never
    /// seen from row/column 1. Kept to reproduce historical runs.
    LegacyStrict,
}

/// Simulation parameters derived from the configuration, used by the engine at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    // Grid
    pub rows: usize,
    pub cols: usize,
    pub neighbor_bounds: NeighborBounds,

    // Population
    pub blue_agents: usize,
    pub red_agents: usize,
    pub seed: Option<u64>, // None = draw a fresh seed and log it

    // Dynamics
    pub threshold: f64, // Max tolerated fraction of dissimilar neighbors
    pub max_iterations: u32,
}

impl SimParams {
    /// Parameters for a run with inclusive bounds and no fixed seed.
    pub fn new(
        rows: usize,
        cols: usize,
        blue_agents: usize,
        red_agents: usize,
        threshold: f64,
        max_iterations: u32,
    ) -> Self {
        Self {
            rows,
            cols,
            neighbor_bounds: NeighborBounds::Inclusive,
            blue_agents,
            red_agents,
            seed: None,
            threshold,
            max_iterations,
        }
    }

    /// Total number of cells (`rows * cols`), saturating on overflow.
    pub fn capacity(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn total_agents(&self) -> usize {
        self.blue_agents.saturating_add(self.red_agents)
    }

    /// Empty cells left after placement, or 0 if the population does not fit.
    pub fn empty_cells(&self) -> usize {
        self.capacity().saturating_sub(self.total_agents())
    }
}
