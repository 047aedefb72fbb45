use crate::error::Result;
use crate::grid::Grid;
use segregation_common::{CellState, NeighborBounds};

/// Occupied neighbors around one cell, split by whether they match its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborCounts {
    /// Neighbors with the same agent type as the center cell.
    pub same: u32,
    /// All occupied neighbors.
    pub total: u32,
}

impl NeighborCounts {
    #[inline(always)]
    pub fn different(&self) -> u32 {
        self.total - self.same
    }
}

/// Resolves `center + delta` along one axis of length `dim`, or `None` if it falls off the grid.
#[inline(always)]
fn offset_coord(center: usize, delta: isize, dim: usize, bounds: NeighborBounds) -> Option<usize> {
    match delta {
        -1 => {
            let low = center.checked_sub(1)?;
            match bounds {
                NeighborBounds::Inclusive => Some(low),
                // `center - 1 > 0`: index 0 is never reached from the low side.
                NeighborBounds::LegacyStrict => (low > 0).then_some(low),
            }
        }
        0 => Some(center),
        1 => {
            let high = center + 1;
            (high < dim).then_some(high)
        }
        _ => None,
    }
}

/// Calls `f(row, col, state)` for each of the up to 8 in-grid positions around `(row, col)`.
/// Edge and corner cells simply have fewer candidates; nothing wraps.
#[inline(always)]
pub fn for_each_neighbor<F>(grid: &Grid, row: usize, col: usize, bounds: NeighborBounds, mut f: F) -> Result<()>
where
    F: FnMut(usize, usize, CellState),
{
    // Validates the center before any neighbor is visited.
    grid.get(row, col)?;

    for dy in -1isize..=1 {
        for dx in -1isize..=1 {
            if dy == 0 && dx == 0 {
                continue;
            }
            let Some(n_row) = offset_coord(row, dy, grid.rows(), bounds) else { continue };
            let Some(n_col) = offset_coord(col, dx, grid.cols(), bounds) else { continue };
            f(n_row, n_col, grid.get(n_row, n_col)?);
        }
    }
    Ok(())
}

/// Counts same-type and total occupied neighbors of `(row, col)` with inclusive bounds.
pub fn count_neighbors(grid: &Grid, row: usize, col: usize) -> Result<NeighborCounts> {
    count_neighbors_with(grid, row, col, NeighborBounds::Inclusive)
}

/// Counts same-type and total occupied neighbors of `(row, col)` under the given bounds rule.
pub fn count_neighbors_with(grid: &Grid, row: usize, col: usize, bounds: NeighborBounds) -> Result<NeighborCounts> {
    let center = grid.get(row, col)?;
    let mut counts = NeighborCounts::default();
    for_each_neighbor(grid, row, col, bounds, |_, _, neighbor| {
        if neighbor.is_agent() {
            counts.total += 1;
            if neighbor == center {
                counts.same += 1;
            }
        }
    })?;
    Ok(counts)
}

/// Number of in-grid neighbor positions around `(row, col)`, regardless of their state.
pub fn candidate_count(grid: &Grid, row: usize, col: usize, bounds: NeighborBounds) -> Result<usize> {
    let mut candidates = 0;
    for_each_neighbor(grid, row, col, bounds, |_, _, _| candidates += 1)?;
    Ok(candidates)
}
