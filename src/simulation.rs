use crate::error::{Result, SimulationError};
use crate::grid::Grid;
use crate::neighborhood::count_neighbors_with;
use crate::placement::place_agents;
use crate::relocation::{relocate_if_unsatisfied, Relocation};
use crate::satisfaction::{counts_satisfied, validate_threshold};
use log::{debug, info, trace};
use rand::prelude::*;
use segregation_common::{CellState, HistoryEntry, NeighborBounds, SimParams, SimulationResult};

/// Iterations at which progress is reported at `info` level.
const PROGRESS_MILESTONES: [u32; 6] = [1, 10, 100, 500, 1000, 5000];

/// Lifecycle of a run. `Converged` and `Exhausted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Population placed, no step taken yet.
    Initialized,
    /// At least one step taken, not yet terminal.
    Stepping,
    /// Every agent is satisfied.
    Converged,
    /// The iteration cap was reached without convergence.
    Exhausted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Converged | RunState::Exhausted)
    }
}

/// Summary of one completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// 1-based index of the step.
    pub iteration: u32,
    /// Agents relocated during the scan.
    pub moves: usize,
    /// Satisfied agents after the scan.
    pub satisfied: usize,
    pub state: RunState,
}

/// Manages the state and execution of one segregation run.
///
/// The run owns its grid and random source exclusively. Steps mutate the grid in
/// place in row-major order, so a move made early in a scan is visible to every
/// cell evaluated after it in the same scan.
pub struct SegregationSimulation<R: Rng = StdRng> {
    /// Validated runtime parameters.
    params: SimParams,
    /// Live grid.
    grid: Grid,
    /// Feeds both initial placement and relocation targets.
    rng: R,
    state: RunState,
    /// Completed steps.
    iterations: u32,
    total_agents: usize,
    empty_cell_count: usize,
    /// One entry per completed step, plus the initial placement.
    history: Vec<HistoryEntry>,
}

impl SegregationSimulation<StdRng> {
    /// Builds a run seeded from `params.seed`, drawing (and logging) a fresh seed when none is set.
    pub fn from_params(params: SimParams) -> Result<Self> {
        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        info!("Using placement seed {}.", seed);
        Self::new(params, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SegregationSimulation<R> {
    /// Validates `params`, places the population and records history entry 0.
    ///
    /// Validation runs before the grid is touched; an invalid configuration never
    /// produces a partially populated run.
    pub fn new(params: SimParams, mut rng: R) -> Result<Self> {
        validate_params(&params)?;

        let mut grid = Grid::new(params.rows, params.cols)?;
        place_agents(&mut grid, params.blue_agents, CellState::Blue, &mut rng)?;
        place_agents(&mut grid, params.red_agents, CellState::Red, &mut rng)?;

        let total_agents = params.total_agents();
        let empty_cell_count = params.empty_cells();
        let satisfied = count_satisfied(&grid, params.threshold, params.neighbor_bounds)?;
        let history = vec![HistoryEntry { snapshot: grid.snapshot(), satisfied }];

        let state = if satisfied == total_agents {
            RunState::Converged
        } else if params.max_iterations == 0 {
            RunState::Exhausted
        } else {
            RunState::Initialized
        };
        info!(
            "Initialized {}x{} grid: {} blue, {} red, {} empty, T={:.4}. {}/{} agents satisfied.",
            params.rows, params.cols, params.blue_agents, params.red_agents,
            empty_cell_count, params.threshold, satisfied, total_agents
        );

        Ok(Self {
            params,
            grid,
            rng,
            state,
            iterations: 0,
            total_agents,
            empty_cell_count,
            history,
        })
    }

    /// Runs one scan-and-relocate pass followed by a fresh satisfaction count.
    ///
    /// On a terminal run this does nothing and reports the current state.
    pub fn step(&mut self) -> Result<StepReport> {
        if self.state.is_terminal() {
            return Ok(StepReport {
                iteration: self.iterations,
                moves: 0,
                satisfied: self.satisfied(),
                state: self.state,
            });
        }
        self.state = RunState::Stepping;

        // --- 1. Sequential scan, mutating in place ---
        let moves = scan_and_relocate(&mut self.grid, self.params.threshold, self.params.neighbor_bounds, &mut self.rng)?;

        // --- 2. Independent satisfaction pass ---
        let satisfied = count_satisfied(&self.grid, self.params.threshold, self.params.neighbor_bounds)?;

        // --- 3. Agents are moved, never created or destroyed ---
        self.check_conservation()?;

        self.history.push(HistoryEntry { snapshot: self.grid.snapshot(), satisfied });
        self.iterations += 1;

        if satisfied == self.total_agents {
            self.state = RunState::Converged;
        } else if self.iterations >= self.params.max_iterations {
            self.state = RunState::Exhausted;
        }

        if PROGRESS_MILESTONES.contains(&self.iterations) {
            info!(
                "i={} : {:.1}% agents satisfied",
                self.iterations,
                percent(satisfied, self.total_agents)
            );
        }
        debug!(
            "Step {} | moves: {} | satisfied: {}/{}",
            self.iterations, moves, satisfied, self.total_agents
        );

        Ok(StepReport { iteration: self.iterations, moves, satisfied, state: self.state })
    }

    /// Steps until the run converges or exhausts its iteration budget.
    pub fn run(&mut self) -> Result<RunState> {
        while !self.state.is_terminal() {
            self.step()?;
        }
        match self.state {
            RunState::Converged => info!("Converged after {} iterations.", self.iterations),
            _ => info!(
                "Stopped after {} iterations with {:.1}% agents satisfied.",
                self.iterations,
                percent(self.satisfied(), self.total_agents)
            ),
        }
        Ok(self.state)
    }

    /// Consumes the run and hands out its recorded history.
    pub fn into_result(self) -> SimulationResult {
        SimulationResult {
            history: self.history,
            iterations_run: self.iterations,
            converged: self.state == RunState::Converged,
            blue_agents: self.params.blue_agents,
            red_agents: self.params.red_agents,
            empty_cell_count: self.empty_cell_count,
            threshold: self.params.threshold,
        }
    }

    fn check_conservation(&self) -> Result<()> {
        let blue = self.grid.count(CellState::Blue);
        let red = self.grid.count(CellState::Red);
        let empty = self.grid.count(CellState::Empty);
        if blue != self.params.blue_agents || red != self.params.red_agents || empty != self.empty_cell_count {
            return Err(SimulationError::InvariantViolation(format!(
                "population drifted at step {}: blue {}/{}, red {}/{}, empty {}/{}",
                self.iterations + 1,
                blue, self.params.blue_agents,
                red, self.params.red_agents,
                empty, self.empty_cell_count
            )));
        }
        Ok(())
    }

    /// Satisfied agents in the latest history entry.
    pub fn satisfied(&self) -> usize {
        self.history.last().map_or(0, |entry| entry.satisfied)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Provides access to the simulation parameters.
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn total_agents(&self) -> usize {
        self.total_agents
    }
}

/// Rejects parameter sets that can never yield a valid run.
pub fn validate_params(params: &SimParams) -> Result<()> {
    if params.rows == 0 || params.cols == 0 {
        return Err(SimulationError::InvalidConfiguration(format!(
            "grid dimensions must be positive, got {}x{}",
            params.rows, params.cols
        )));
    }
    let capacity = params.rows.checked_mul(params.cols).ok_or_else(|| {
        SimulationError::InvalidConfiguration(format!("grid {}x{} is too large", params.rows, params.cols))
    })?;
    let total = params.blue_agents.checked_add(params.red_agents).ok_or_else(|| {
        SimulationError::InvalidConfiguration("agent count overflows".to_string())
    })?;
    // At least one cell must stay free or no unsatisfied agent could ever move.
    if total >= capacity {
        return Err(SimulationError::InvalidConfiguration(format!(
            "{} agents do not fit a {}x{} grid with room to move (capacity {})",
            total, params.rows, params.cols, capacity
        )));
    }
    validate_threshold(params.threshold)?;
    Ok(())
}

/// One row-major pass that relocates each unsatisfied agent as soon as it is visited.
/// Returns the number of moves made.
pub fn scan_and_relocate<R: Rng + ?Sized>(
    grid: &mut Grid,
    threshold: f64,
    bounds: NeighborBounds,
    rng: &mut R,
) -> Result<usize> {
    let mut moves = 0;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if let Relocation::Moved { .. } = relocate_if_unsatisfied(grid, row, col, threshold, bounds, rng)? {
                moves += 1;
            }
        }
    }
    trace!("Scan finished with {} moves.", moves);
    Ok(moves)
}

/// Counts satisfied agents without mutating the grid.
pub fn count_satisfied(grid: &Grid, threshold: f64, bounds: NeighborBounds) -> Result<usize> {
    let mut satisfied = 0;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if grid.get(row, col)?.is_agent()
                && counts_satisfied(count_neighbors_with(grid, row, col, bounds)?, threshold)
            {
                satisfied += 1;
            }
        }
    }
    Ok(satisfied)
}

/// Builds a run from `params` and `rng`, steps it to a terminal state, and returns its history.
pub fn run_simulation<R: Rng>(params: &SimParams, rng: R) -> Result<SimulationResult> {
    let mut sim = SegregationSimulation::new(params.clone(), rng)?;
    sim.run()?;
    Ok(sim.into_result())
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        100.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
