use crate::core::{Grid, State};

/// Moore neighbourhood, clockwise from top-left.
pub const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (1, 0), (1, 1), (0, 1),
    (-1, 1), (-1, 0),
];

/// For each state `0..k`, how many of the 8 toroidally wrapped neighbours of
/// `(x, y)` hold it. Neighbours holding a state `>= k` are not counted.
pub fn count_neighbors(grid: &Grid, x: usize, y: usize, k: usize) -> Vec<u8> {
    let mut counts = vec![0u8; k];
    count_neighbors_into(grid, x, y, &mut counts);
    counts
}

/// Same as [`count_neighbors`], writing into a caller-owned buffer whose
/// length is `k`.
#[inline]
pub fn count_neighbors_into(grid: &Grid, x: usize, y: usize, counts: &mut [u8]) {
    counts.iter_mut().for_each(|c| *c = 0);
    let (x, y) = (x as isize, y as isize);
    for &(dx, dy) in &MOORE_OFFSETS {
        let n: State = grid.get_wrapped(x + dx, y + dy);
        if let Some(slot) = counts.get_mut(n as usize) {
            *slot += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn interior_counts() {
        let grid = Grid::from_rows(vec![
            vec![1, 1, 0],
            vec![0, 1, 2],
            vec![2, 0, 1],
        ])
        .unwrap();
        // 3x3 torus: every other cell is a neighbour of the centre.
        assert_eq!(count_neighbors(&grid, 1, 1, 3), vec![3, 3, 2]);
    }

    #[test]
    fn corner_sees_opposite_corner() {
        let mut grid = Grid::new(10, 7);
        grid.set(9, 6, 1);
        assert_eq!(count_neighbors(&grid, 0, 0, 2), vec![7, 1]);
        // And the symmetric corners.
        let mut grid = Grid::new(10, 7);
        grid.set(0, 0, 1);
        for &(x, y) in &[(9, 6), (9, 0), (0, 6), (1, 1), (9, 1)] {
            assert_eq!(count_neighbors(&grid, x, y, 2)[1], 1, "at ({}, {})", x, y);
        }
    }

    #[test]
    fn out_of_range_states_excluded() {
        let mut grid = Grid::new(5, 5);
        grid.set(1, 1, 3);
        grid.set(2, 1, 1);
        let counts = count_neighbors(&grid, 2, 2, 2);
        assert_eq!(counts, vec![6, 1]);
        assert_eq!(counts.iter().map(|&c| c as u32).sum::<u32>(), 7);
    }

    #[test]
    fn center_is_not_counted() {
        let mut grid = Grid::new(4, 4);
        grid.set(2, 2, 1);
        assert_eq!(count_neighbors(&grid, 2, 2, 2), vec![8, 0]);
    }

    fn grid_strategy() -> impl Strategy<Value = (usize, Grid)> {
        (1usize..=5, 1usize..=12, 1usize..=12).prop_flat_map(|(k, w, h)| {
            prop::collection::vec(0..k as State, w * h)
                .prop_map(move |cells| (k, Grid::from_cells(w, h, cells)))
        })
    }

    proptest! {
        #[test]
        fn counts_always_sum_to_eight((k, grid) in grid_strategy(), sx in 0usize..64, sy in 0usize..64) {
            let (x, y) = (sx % grid.width(), sy % grid.height());
            let counts = count_neighbors(&grid, x, y, k);
            prop_assert_eq!(counts.len(), k);
            prop_assert_eq!(counts.iter().map(|&c| c as u32).sum::<u32>(), 8);
        }

        #[test]
        fn origin_includes_far_corner((k, grid) in grid_strategy()) {
            let (w, h) = grid.dimensions();
            let far = grid.get(w - 1, h - 1).unwrap();
            let counts = count_neighbors(&grid, 0, 0, k);
            prop_assert!(counts[far as usize] >= 1);
        }
    }
}
