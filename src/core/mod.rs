pub mod error;
pub mod types;

pub use error::{Result, TesseraError};
pub use types::{Grid, State};
