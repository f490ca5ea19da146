use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SimConfig;
use crate::core::{Grid, Result, State};
use crate::engine::step;
use crate::rules::{RuleLibrary, RuleSet};

/// Owns the grid and the active rule set. Every mutation of either goes
/// through here, and all of them take `&mut self`, so one owner serialises
/// them.
#[derive(Debug, Clone)]
pub struct Automaton {
    grid: Grid,
    rules: RuleSet,
    rule_name: Option<String>,
    generation: u64,
    cell_size: (u32, u32),
    rng: StdRng,
}

impl Automaton {
    /// All-zero `width` x `height` grid under `rules`.
    pub fn new(width: usize, height: usize, rules: RuleSet) -> Self {
        Self {
            grid: Grid::new(width, height),
            rules,
            rule_name: None,
            generation: 0,
            cell_size: (1, 1),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Pixel size of one cell, used by [`Automaton::cell_at_pixel`].
    pub fn with_cell_size(mut self, width: u32, height: u32) -> Self {
        self.cell_size = (width.max(1), height.max(1));
        self
    }

    pub fn from_config(config: &SimConfig, library: &RuleLibrary) -> Result<Self> {
        let (width, height) = config.grid_dimensions()?;
        let rules = library.require(&config.rule)?.clone();
        let mut automaton = Self::new(width, height, rules)
            .with_cell_size(config.cell_width, config.cell_height);
        automaton.rule_name = Some(config.rule.clone());
        if let Some(seed) = config.seed {
            automaton = automaton.with_seed(seed);
        }
        debug!(
            "automaton {}x{} cells under {:?}",
            width, height, config.rule
        );
        Ok(automaton)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rule_name(&self) -> Option<&str> {
        self.rule_name.as_deref()
    }

    /// `K` of the active rule set.
    pub fn state_count(&self) -> usize {
        self.rules.state_count()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, x: usize, y: usize) -> Option<State> {
        self.grid.get(x, y)
    }

    /// Display attribute of the cell at `(x, y)`.
    pub fn color_at(&self, x: usize, y: usize) -> Option<&str> {
        self.grid.get(x, y).and_then(|s| self.rules.color(s))
    }

    /// Makes `rules` active and clamps every cell into its state range.
    pub fn switch_rule_set(&mut self, rules: RuleSet) {
        let max = rules.max_state();
        self.grid.map_in_place(|s| s.min(max));
        self.rules = rules;
        self.rule_name = None;
        debug!("switched rule set, {} states", self.rules.state_count());
    }

    pub fn switch_rule_set_by_name(&mut self, library: &RuleLibrary, name: &str) -> Result<()> {
        let rules = library.require(name)?.clone();
        self.switch_rule_set(rules);
        self.rule_name = Some(name.to_string());
        Ok(())
    }

    fn in_bounds(&self, x: isize, y: isize) -> Option<(usize, usize)> {
        self.grid.contains(x, y).then(|| (x as usize, y as usize))
    }

    /// `(s + 1) mod K`. Out of bounds is a no-op returning `false`.
    pub fn cycle_cell(&mut self, x: isize, y: isize) -> bool {
        let Some((x, y)) = self.in_bounds(x, y) else { return false };
        let k = self.state_count();
        let current = self.grid.get(x, y).unwrap_or(0) as usize;
        self.grid.set(x, y, ((current + 1) % k) as State)
    }

    /// Flip between 0 and 1; any non-zero state goes to 0. A single-state
    /// rule set leaves the cell at 0.
    pub fn toggle_cell(&mut self, x: isize, y: isize) -> bool {
        let Some((x, y)) = self.in_bounds(x, y) else { return false };
        let next = match self.grid.get(x, y) {
            Some(0) if self.state_count() > 1 => 1,
            _ => 0,
        };
        self.grid.set(x, y, next)
    }

    /// No-op for coordinates outside the grid or `state >= K`.
    pub fn set_cell(&mut self, x: isize, y: isize, state: State) -> bool {
        let Some((x, y)) = self.in_bounds(x, y) else { return false };
        if state as usize >= self.state_count() {
            return false;
        }
        self.grid.set(x, y, state)
    }

    /// Uniform random state in `0..K` for every cell, from the automaton's
    /// own generator.
    pub fn randomize(&mut self) {
        let mut rng = self.rng.clone();
        self.randomize_with(&mut rng);
        self.rng = rng;
    }

    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) {
        let k = self.rules.state_count();
        self.grid.map_in_place(|_| rng.gen_range(0..k) as State);
        self.generation = 0;
        debug!("randomized grid over {} states", k);
    }

    pub fn clear(&mut self) {
        self.grid.fill(0);
        self.generation = 0;
        debug!("cleared grid");
    }

    /// Replace the grid with the next generation.
    pub fn advance(&mut self) {
        self.grid = step(&self.grid, &self.rules);
        self.generation += 1;
        trace!("generation {}", self.generation);
    }

    /// Number of cells in each state `0..K`.
    pub fn census(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.state_count()];
        for &s in self.grid.cells() {
            if let Some(c) = counts.get_mut(s as usize) {
                *c += 1;
            }
        }
        counts
    }

    /// Cell under a renderer pixel coordinate, if any.
    pub fn cell_at_pixel(&self, px: f64, py: f64) -> Option<(usize, usize)> {
        let (cw, ch) = self.cell_size;
        let x = (px / cw as f64).floor();
        let y = (py / ch as f64).floor();
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        self.in_bounds(x as isize, y as isize)
    }
}
