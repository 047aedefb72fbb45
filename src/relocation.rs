use crate::error::{Result, SimulationError};
use crate::grid::Grid;
use crate::neighborhood::count_neighbors_with;
use crate::satisfaction::counts_satisfied;
use log::trace;
use rand::Rng;
use segregation_common::{CellState, NeighborBounds};

/// Outcome of evaluating one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    /// Empty cell, or a satisfied agent that stays put.
    Stayed,
    /// An unsatisfied agent moved between the two coordinates.
    Moved { from: (usize, usize), to: (usize, usize) },
}

/// Moves the agent at `(row, col)` to a uniformly random empty cell if it is unsatisfied.
///
/// The target is drawn from every empty cell at call time, so it may lie ahead of
/// or behind the current scan position.
pub fn relocate_if_unsatisfied<R: Rng + ?Sized>(
    grid: &mut Grid,
    row: usize,
    col: usize,
    threshold: f64,
    bounds: NeighborBounds,
    rng: &mut R,
) -> Result<Relocation> {
    let state = grid.get(row, col)?;
    if !state.is_agent() {
        return Ok(Relocation::Stayed);
    }
    let counts = count_neighbors_with(grid, row, col, bounds)?;
    if counts_satisfied(counts, threshold) {
        return Ok(Relocation::Stayed);
    }

    let empties = grid.empty_cells();
    if empties.is_empty() {
        return Err(SimulationError::InvariantViolation(format!(
            "agent at ({}, {}) must relocate but the grid has no empty cell",
            row, col
        )));
    }
    let (to_row, to_col) = empties[rng.random_range(0..empties.len())];
    grid.set(to_row, to_col, state)?;
    grid.set(row, col, CellState::Empty)?;

    trace!(
        "{:?} agent ({}/{} alike) moved ({}, {}) -> ({}, {})",
        state, counts.same, counts.total, row, col, to_row, to_col
    );
    Ok(Relocation::Moved { from: (row, col), to: (to_row, to_col) })
}
