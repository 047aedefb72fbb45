use serde::{Serialize, Deserialize};

/// State of a single grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    /// No agent lives here.
    #[default]
    Empty,
    /// First agent type ("blue").
    Blue,
    /// Second agent type ("red").
    Red,
}

impl CellState {
    /// Returns true for `Blue` and `Red`.
    #[inline(always)]
    pub fn is_agent(self) -> bool {
        self != CellState::Empty
    }
}

/// An immutable copy of the grid at one point in simulated time.
///
/// Cells are stored row-major. Renderers address them by `(row, col)` and pick
/// their own colors; the engine attaches no encoding policy to a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl GridSnapshot {
    /// Wraps a row-major cell vector. Returns `None` if `cells.len() != rows * cols`.
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<CellState>) -> Option<Self> {
        if rows.checked_mul(cols)? != cells.len() {
            return None;
        }
        Some(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// State at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<CellState> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// One row of cells, left to right.
    pub fn row(&self, row: usize) -> Option<&[CellState]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.cells.get(start..start + self.cols)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Iterates `(row, col, state)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellState)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &state)| (idx / cols, idx % cols, state))
    }

    /// Number of cells currently in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }
}

/// One recorded point of the simulation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Grid state after the step (entry 0 holds the initial placement).
    pub snapshot: GridSnapshot,
    /// Number of satisfied agents in `snapshot`.
    pub satisfied: usize,
}

/// Everything a run produces, handed to renderers and writers as a read-only artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Entry 0 is the initial placement; one more entry per completed step.
    pub history: Vec<HistoryEntry>,
    pub iterations_run: u32,
    pub converged: bool,
    // Configuration echo
    pub blue_agents: usize,
    pub red_agents: usize,
    pub empty_cell_count: usize,
    pub threshold: f64,
}

impl SimulationResult {
    pub fn total_agents(&self) -> usize {
        self.blue_agents + self.red_agents
    }

    /// Satisfied-agent count of every history entry, in order.
    pub fn satisfied_counts(&self) -> Vec<usize> {
        self.history.iter().map(|entry| entry.satisfied).collect()
    }

    /// Percentage of satisfied agents per history entry (100 when there are no agents).
    pub fn satisfaction_percentages(&self) -> Vec<f64> {
        let total = self.total_agents();
        self.history
            .iter()
            .map(|entry| {
                if total == 0 {
                    100.0
                } else {
                    entry.satisfied as f64 / total as f64 * 100.0
                }
            })
            .collect()
    }

    /// The last recorded grid state.
    pub fn final_entry(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GridSnapshot {
        use CellState::*;
        GridSnapshot::from_cells(2, 3, vec![Blue, Empty, Red, Empty, Red, Blue]).unwrap()
    }

    #[test]
    fn from_cells_rejects_mismatched_length() {
        assert!(GridSnapshot::from_cells(2, 2, vec![CellState::Empty; 3]).is_none());
        assert!(GridSnapshot::from_cells(0, 5, Vec::new()).is_some());
    }

    #[test]
    fn get_addresses_row_major_and_rejects_out_of_range() {
        let snap = sample();
        assert_eq!(snap.get(0, 0), Some(CellState::Blue));
        assert_eq!(snap.get(0, 2), Some(CellState::Red));
        assert_eq!(snap.get(1, 2), Some(CellState::Blue));
        assert_eq!(snap.get(2, 0), None);
        assert_eq!(snap.get(0, 3), None);
    }

    #[test]
    fn rows_and_iteration_agree() {
        let snap = sample();
        assert_eq!(snap.row(1), Some(&[CellState::Empty, CellState::Red, CellState::Blue][..]));
        assert!(snap.row(2).is_none());
        let collected: Vec<_> = snap.iter().filter(|(_, _, s)| s.is_agent()).map(|(r, c, _)| (r, c)).collect();
        assert_eq!(collected, vec![(0, 0), (0, 2), (1, 1), (1, 2)]);
    }

    #[test]
    fn result_reports_percentages_per_entry() {
        let snap = sample();
        let result = SimulationResult {
            history: vec![
                HistoryEntry { snapshot: snap.clone(), satisfied: 1 },
                HistoryEntry { snapshot: snap, satisfied: 4 },
            ],
            iterations_run: 1,
            converged: true,
            blue_agents: 2,
            red_agents: 2,
            empty_cell_count: 2,
            threshold: 0.0,
        };
        assert_eq!(result.satisfied_counts(), vec![1, 4]);
        assert_eq!(result.satisfaction_percentages(), vec![25.0, 100.0]);
        assert_eq!(result.final_entry().map(|e| e.satisfied), Some(4));
    }

    #[test]
    fn counts_by_state() {
        let snap = sample();
        assert_eq!(snap.count(CellState::Blue), 2);
        assert_eq!(snap.count(CellState::Red), 2);
        assert_eq!(snap.count(CellState::Empty), 2);
    }
}
