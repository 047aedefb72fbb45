use rand::rngs::StdRng;
use rand::SeedableRng;
use segregation_engine::simulation::{count_satisfied, scan_and_relocate};
use segregation_engine::{
    run_simulation, CellState, Grid, NeighborBounds, RunState, SegregationSimulation, SimParams, SimulationError,
};

fn params(rows: usize, cols: usize, blue: usize, red: usize, threshold: f64, max_iterations: u32) -> SimParams {
    SimParams::new(rows, cols, blue, red, threshold, max_iterations)
}

#[test]
fn small_grid_with_zero_tolerance_converges() {
    for seed in 0..20 {
        let result = run_simulation(&params(4, 4, 2, 2, 0.0, 50), StdRng::seed_from_u64(seed)).unwrap();
        assert!(result.converged, "seed {} did not converge", seed);
        assert!(result.iterations_run <= 50);
        assert_eq!(result.satisfied_counts().last().copied(), Some(4));
        assert_eq!(result.history.len(), result.iterations_run as usize + 1);
        assert_eq!(result.empty_cell_count, 12);
    }
}

#[test]
fn full_grid_is_an_invalid_configuration() {
    let err = run_simulation(&params(3, 3, 5, 4, 0.5, 10), StdRng::seed_from_u64(1));
    assert!(matches!(err, Err(SimulationError::InvalidConfiguration(_))));
}

#[test]
fn full_tolerance_is_satisfied_before_any_step() {
    let result = run_simulation(&params(10, 10, 40, 40, 1.0, 100), StdRng::seed_from_u64(3)).unwrap();
    assert!(result.converged);
    assert_eq!(result.iterations_run, 0);
    assert_eq!(result.history.len(), 1);
    assert_eq!(result.history[0].satisfied, 80);
}

#[test]
fn agent_counts_are_conserved_in_every_snapshot() {
    for bounds in [NeighborBounds::Inclusive, NeighborBounds::LegacyStrict] {
        let mut p = params(12, 12, 55, 45, 3.0 / 8.0, 40);
        p.neighbor_bounds = bounds;
        let result = run_simulation(&p, StdRng::seed_from_u64(21)).unwrap();
        for entry in &result.history {
            let snap = &entry.snapshot;
            assert_eq!(snap.count(CellState::Blue), 55);
            assert_eq!(snap.count(CellState::Red), 45);
            assert_eq!(snap.count(CellState::Empty), 144 - 100);
            assert!(entry.satisfied <= 100);
        }
    }
}

#[test]
fn fixed_seed_reproduces_history() {
    let p = params(15, 15, 80, 80, 0.3, 60);
    let a = run_simulation(&p, StdRng::seed_from_u64(77)).unwrap();
    let b = run_simulation(&p, StdRng::seed_from_u64(77)).unwrap();
    assert_eq!(a, b);

    let c = run_simulation(&p, StdRng::seed_from_u64(78)).unwrap();
    assert_ne!(a.history[0].snapshot, c.history[0].snapshot);
}

#[test]
fn configured_seed_reproduces_history() {
    let mut p = params(9, 9, 30, 30, 0.25, 30);
    p.seed = Some(5);
    let run = |p: &SimParams| {
        let mut sim = SegregationSimulation::from_params(p.clone()).unwrap();
        sim.run().unwrap();
        sim.into_result()
    };
    assert_eq!(run(&p), run(&p));
}

#[test]
fn converged_grid_is_a_fixed_point() {
    let p = params(10, 10, 30, 30, 0.5, 500);
    let result = (0..10)
        .map(|seed| run_simulation(&p, StdRng::seed_from_u64(seed)).unwrap())
        .find(|r| r.converged)
        .expect("no seed converged");

    let final_snapshot = &result.final_entry().unwrap().snapshot;
    let mut grid = Grid::from_snapshot(final_snapshot).unwrap();
    let mut rng = StdRng::seed_from_u64(999);
    let moves = scan_and_relocate(&mut grid, p.threshold, p.neighbor_bounds, &mut rng).unwrap();
    assert_eq!(moves, 0);
    assert_eq!(count_satisfied(&grid, p.threshold, p.neighbor_bounds).unwrap(), 60);
    assert_eq!(grid.snapshot(), *final_snapshot);
}

#[test]
fn recorded_snapshots_do_not_follow_the_live_grid() {
    let mut sim = SegregationSimulation::new(params(8, 8, 24, 24, 0.0, 5), StdRng::seed_from_u64(6)).unwrap();
    let first = sim.history()[0].snapshot.clone();
    sim.step().unwrap();
    assert_eq!(sim.history()[0].snapshot, first);
    assert_eq!(sim.history().len(), 2);
}

#[test]
fn total_counts_echo_the_configuration() {
    let mut sim = SegregationSimulation::new(params(7, 9, 20, 15, 0.25, 25), StdRng::seed_from_u64(2)).unwrap();
    let state = sim.run().unwrap();
    assert!(matches!(state, RunState::Converged | RunState::Exhausted));
    let result = sim.into_result();
    assert_eq!((result.blue_agents, result.red_agents), (20, 15));
    assert_eq!(result.empty_cell_count, 63 - 35);
    assert_eq!(result.converged, state == RunState::Converged);
}
