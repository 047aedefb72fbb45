pub mod config;
pub mod sim_params;
pub mod snapshot;

// Re-export key types for easier use by dependent crates
pub use config::{SimulationConfig, GridConfig, PopulationConfig, DynamicsConfig, OutputConfig, SweepConfig};
pub use sim_params::{SimParams, NeighborBounds};
pub use snapshot::{CellState, GridSnapshot, HistoryEntry, SimulationResult};
