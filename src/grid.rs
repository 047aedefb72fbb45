use crate::error::{Result, SimulationError};
use segregation_common::{CellState, GridSnapshot};

/// Fixed-size rectangular grid of cell states, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates an all-empty `rows x cols` grid.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        let capacity = rows.checked_mul(cols).ok_or_else(|| {
            SimulationError::InvalidConfiguration(format!("grid {}x{} is too large", rows, cols))
        })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![CellState::Empty; capacity],
        })
    }

    /// Rebuilds a live grid from a recorded snapshot.
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Result<Self> {
        let mut grid = Self::new(snapshot.rows(), snapshot.cols())?;
        if snapshot.cells().len() != grid.capacity() {
            return Err(SimulationError::InvalidConfiguration(format!(
                "snapshot holds {} cells, expected {}",
                snapshot.cells().len(),
                grid.capacity()
            )));
        }
        grid.cells.copy_from_slice(snapshot.cells());
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if self.in_bounds(row, col) {
            Ok(row * self.cols + col)
        } else {
            Err(SimulationError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<CellState> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, state: CellState) -> Result<()> {
        let idx = self.index(row, col)?;
        self.cells[idx] = state;
        Ok(())
    }

    /// Coordinates of every currently empty cell, row-major. Computed on each call.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == CellState::Empty)
            .map(|(idx, _)| (idx / cols, idx % cols))
            .collect()
    }

    /// Number of cells in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Independent copy of the current cell states.
    pub fn snapshot(&self) -> GridSnapshot {
        // Dimensions always match `cells`, so `from_cells` cannot fail here.
        GridSnapshot::from_cells(self.rows, self.cols, self.cells.clone())
            .unwrap_or_else(|| unreachable!("grid dimensions out of sync with cell storage"))
    }
}
