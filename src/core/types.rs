use std::fmt;

/// A cell state. Valid values are `0..K` where `K` is the state count of the
/// active rule set.
pub type State = u8;

/// Fixed-size toroidal grid of cell states, stored row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<State>,
}

impl Grid {
    /// An all-zero grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![0; width * height] }
    }

    /// Build a grid from rows. Returns `None` for ragged input.
    pub fn from_rows(rows: Vec<Vec<State>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        let cells = rows.into_iter().flatten().collect();
        Some(Self { width, height, cells })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn dimensions(&self) -> (usize, usize) { (self.width, self.height) }
    pub fn len(&self) -> usize { self.cells.len() }
    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn contains(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<State> {
        (x < self.width && y < self.height).then(|| self.cells[self.index(x, y)])
    }

    /// Writes a cell; out-of-bounds writes are ignored and return `false`.
    pub fn set(&mut self, x: usize, y: usize, state: State) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = state;
        true
    }

    /// Map any signed coordinate onto the torus.
    #[inline]
    pub fn wrap(&self, x: isize, y: isize) -> (usize, usize) {
        (
            x.rem_euclid(self.width as isize) as usize,
            y.rem_euclid(self.height as isize) as usize,
        )
    }

    /// Toroidal read. Panics on an empty grid.
    #[inline]
    pub fn get_wrapped(&self, x: isize, y: isize) -> State {
        let (wx, wy) = self.wrap(x, y);
        self.cells[self.index(wx, wy)]
    }

    pub fn cells(&self) -> &[State] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[State]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn fill(&mut self, state: State) {
        self.cells.iter_mut().for_each(|c| *c = state);
    }

    pub fn map_in_place(&mut self, mut f: impl FnMut(State) -> State) {
        for c in self.cells.iter_mut() {
            *c = f(*c);
        }
    }

    /// Coordinates and state of every non-zero cell, row-major.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize, State)> + '_ {
        let w = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s != 0)
            .map(move |(i, &s)| (i % w, i / w, s))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&s| s != 0).count()
    }

    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<State>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self { width, height, cells }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.width, self.height)?;
        for row in self.rows() {
            let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            writeln!(f, "  {}", line.join(" "))?;
        }
        Ok(())
    }
}
