pub mod core;
pub mod engine;
pub mod rules;
pub mod sim;
