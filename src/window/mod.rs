//! The movable frame window.
//!
//! A single window is created per run and repositioned for every frame.
//! It owns the only pixel buffer in the engine, so memory use stays
//! proportional to one frame regardless of how many frames are emitted.

mod frame;

pub use frame::{invert_sample, FrameWindow, WindowError};
