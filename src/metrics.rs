use crate::error::Result;
use crate::grid::Grid;
use crate::neighborhood::count_neighbors_with;
use segregation_common::{GridSnapshot, NeighborBounds};

/// Mean share of same-type neighbors over agents that have at least one neighbor.
///
/// 1.0 means every neighborhood is homogeneous. Returns 1.0 when no agent has a neighbor.
pub fn similarity_index(grid: &Grid, bounds: NeighborBounds) -> Result<f64> {
    let mut sum = 0.0;
    let mut counted = 0usize;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if !grid.get(row, col)?.is_agent() {
                continue;
            }
            let counts = count_neighbors_with(grid, row, col, bounds)?;
            if counts.total > 0 {
                sum += f64::from(counts.same) / f64::from(counts.total);
                counted += 1;
            }
        }
    }
    Ok(if counted == 0 { 1.0 } else { sum / counted as f64 })
}

/// [`similarity_index`] of a recorded snapshot.
pub fn snapshot_similarity(snapshot: &GridSnapshot, bounds: NeighborBounds) -> Result<f64> {
    similarity_index(&Grid::from_snapshot(snapshot)?, bounds)
}
