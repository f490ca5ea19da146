pub mod automaton;
pub mod clock;
pub mod config;
pub mod driver;
pub mod text;

pub use automaton::Automaton;
pub use clock::Clock;
pub use config::SimConfig;
pub use driver::{Driver, Input, Renderer};
pub use text::TextRenderer;
