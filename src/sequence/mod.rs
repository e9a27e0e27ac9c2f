//! Frame sequence generation.
//!
//! The generator ties the other modules together: it parses the source
//! header, walks the planned path with a single [`crate::window::FrameWindow`]
//! and writes every frame once per output profile.

mod generator;
mod state;

pub use generator::{GeneratorError, RunSummary, SequenceGenerator};
pub use state::GeneratorState;
