pub mod evaluator;
pub mod neighborhood;
pub mod step;

pub use evaluator::next_state;
pub use neighborhood::{count_neighbors, count_neighbors_into, MOORE_OFFSETS};
pub use step::{step, step_n};
