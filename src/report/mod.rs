//! Text renderings of the dashboard.

pub mod generator;

pub use generator::*;
