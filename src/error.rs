use thiserror::Error;

/// Failures surfaced by the segregation engine. None of them are retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Parameters that can never produce a valid run (raised before any grid mutation).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// An internal contract broke; the grid can no longer be trusted.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// Coordinate access outside the grid extent.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

pub type Result<T, E = SimulationError> = std::result::Result<T, E>;
