use crate::core::{Grid, State};
use crate::rules::RuleSet;

use super::evaluator::next_state;
use super::neighborhood::count_neighbors_into;

/// Compute generation N+1 from generation N. The input grid is only read;
/// every cell sees the same unmodified neighbourhood.
pub fn step(grid: &Grid, rules: &RuleSet) -> Grid {
    let (width, height) = grid.dimensions();
    let k = rules.state_count();
    let mut counts = vec![0u8; k];
    let mut cells: Vec<State> = Vec::with_capacity(grid.len());

    for y in 0..height {
        for x in 0..width {
            let current = grid.cells()[y * width + x];
            let next = match rules.rules_for(current) {
                Some(list) => {
                    count_neighbors_into(grid, x, y, &mut counts);
                    next_state(current, &counts, list)
                }
                // Stale state with no definition: left alone.
                None => current,
            };
            cells.push(next);
        }
    }

    Grid::from_cells(width, height, cells)
}

/// Apply [`step`] `n` times.
pub fn step_n(grid: &Grid, rules: &RuleSet, n: usize) -> Grid {
    let mut current = grid.clone();
    for _ in 0..n {
        current = step(&current, rules);
    }
    current
}
