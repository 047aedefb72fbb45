use crate::error::{Result, SimulationError};
use crate::grid::Grid;
use log::debug;
use rand::Rng;
use segregation_common::CellState;

/// Places `count` agents of type `state` on distinct empty cells.
///
/// Coordinates are drawn uniformly over the whole grid and redrawn while the
/// cell is occupied, so earlier placements are never overwritten. Capacity is
/// checked up front; sampling always terminates once it passes.
pub fn place_agents<R: Rng + ?Sized>(grid: &mut Grid, count: usize, state: CellState, rng: &mut R) -> Result<()> {
    if !state.is_agent() {
        return Err(SimulationError::InvalidConfiguration(
            "cannot place agents of the empty state".to_string(),
        ));
    }
    let free = grid.count(CellState::Empty);
    if count > free {
        return Err(SimulationError::InvalidConfiguration(format!(
            "cannot place {} {:?} agents: only {} empty cells left",
            count, state, free
        )));
    }

    let (rows, cols) = (grid.rows(), grid.cols());
    let mut draws: u64 = 0;
    for _ in 0..count {
        loop {
            let row = rng.random_range(0..rows);
            let col = rng.random_range(0..cols);
            draws += 1;
            if grid.get(row, col)? == CellState::Empty {
                grid.set(row, col, state)?;
                break;
            }
        }
    }
    debug!("Placed {} {:?} agents using {} coordinate draws.", count, state, draws);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn places_exact_counts_without_collisions() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut grid = Grid::new(10, 10).unwrap();
        place_agents(&mut grid, 40, CellState::Blue, &mut rng).unwrap();
        place_agents(&mut grid, 40, CellState::Red, &mut rng).unwrap();
        assert_eq!(grid.count(CellState::Blue), 40);
        assert_eq!(grid.count(CellState::Red), 40);
        assert_eq!(grid.count(CellState::Empty), 20);
    }

    #[test]
    fn can_fill_every_remaining_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = Grid::new(3, 3).unwrap();
        place_agents(&mut grid, 4, CellState::Blue, &mut rng).unwrap();
        place_agents(&mut grid, 5, CellState::Red, &mut rng).unwrap();
        assert_eq!(grid.count(CellState::Empty), 0);
    }

    #[test]
    fn overfull_request_fails_before_any_placement() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = Grid::new(2, 2).unwrap();
        let err = place_agents(&mut grid, 5, CellState::Red, &mut rng);
        assert!(matches!(err, Err(SimulationError::InvalidConfiguration(_))));
        assert_eq!(grid.count(CellState::Empty), 4);
    }

    #[test]
    fn empty_state_is_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = Grid::new(2, 2).unwrap();
        assert!(place_agents(&mut grid, 1, CellState::Empty, &mut rng).is_err());
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let layout = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = Grid::new(6, 7).unwrap();
            place_agents(&mut grid, 10, CellState::Blue, &mut rng).unwrap();
            place_agents(&mut grid, 12, CellState::Red, &mut rng).unwrap();
            grid
        };
        assert_eq!(layout(99), layout(99));
    }
}
