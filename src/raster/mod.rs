//! Source raster geometry and byte addressing.
//!
//! This module parses the textual header of a binary grayscale raster
//! (`P5`) and decides where in the source stream each row of a frame
//! window begins. The addressing policy is the only place where window
//! coordinates become byte positions.

mod addressing;
mod metadata;
mod reader;

pub use addressing::{AddressingMode, AddressingPolicy, RejectOutOfRange, Wraparound};
pub use metadata::{HeaderError, RasterMetadata, MAGIC, MAX_SAMPLE_VALUE};
pub use reader::RasterReader;
