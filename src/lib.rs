//! Schelling segregation model on a bounded two-dimensional grid.
//!
//! The engine places two agent types on a grid, then repeatedly scans it in
//! row-major order and relocates every unsatisfied agent to a random empty cell
//! until all agents are satisfied or an iteration cap is hit. Each step is
//! recorded as an independent [`GridSnapshot`] for external renderers.

pub mod error;
pub mod grid;
pub mod metrics;
pub mod neighborhood;
pub mod output;
pub mod placement;
pub mod relocation;
pub mod satisfaction;
pub mod simulation;
pub mod sweep;

pub use error::SimulationError;
pub use grid::Grid;
pub use neighborhood::{count_neighbors, count_neighbors_with, NeighborCounts};
pub use satisfaction::{is_satisfied, threshold_from_neighbors};
pub use simulation::{run_simulation, RunState, SegregationSimulation, StepReport};
pub use sweep::{run_sweep, SweepPoint};

pub use segregation_common::{CellState, GridSnapshot, HistoryEntry, NeighborBounds, SimParams, SimulationConfig, SimulationResult};
