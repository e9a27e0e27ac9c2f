//! Mapping window rows to byte positions in the source stream.

use super::RasterMetadata;
use serde::{Deserialize, Serialize};

/// Decides where a window row starts in the source stream.
///
/// `x` and `y` are the window origin, `row` is the window row being read
/// and `window_width` is the number of contiguous bytes that will be read
/// from the returned position. Returning `None` refuses the read.
pub trait AddressingPolicy {
    /// Returns the byte position of the first sample of `row`.
    fn row_start(
        &self,
        raster: &RasterMetadata,
        x: i64,
        y: i64,
        row: u32,
        window_width: u32,
    ) -> Option<u64>;
}

/// Toroidal addressing over the whole byte range of the source.
///
/// The linear position `data_offset + (y + row) * width + x` is reduced
/// modulo `width * height`. The data offset is part of the reduced value,
/// so a wrapped position may land inside the header, and only the row
/// start is wrapped: the `window_width` bytes that follow are read
/// contiguously even when they run into the next raster row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wraparound;

impl AddressingPolicy for Wraparound {
    fn row_start(
        &self,
        raster: &RasterMetadata,
        x: i64,
        y: i64,
        row: u32,
        _window_width: u32,
    ) -> Option<u64> {
        let linear = i128::from(raster.data_offset())
            + (i128::from(y) + i128::from(row)) * i128::from(raster.width())
            + i128::from(x);
        let wrapped = linear.rem_euclid(i128::from(raster.sample_count()));
        u64::try_from(wrapped).ok()
    }
}

/// Refuses any row that is not fully inside the raster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectOutOfRange;

impl AddressingPolicy for RejectOutOfRange {
    fn row_start(
        &self,
        raster: &RasterMetadata,
        x: i64,
        y: i64,
        row: u32,
        window_width: u32,
    ) -> Option<u64> {
        let row_y = y.checked_add(i64::from(row))?;
        let right = x.checked_add(i64::from(window_width))?;
        if x < 0
            || row_y < 0
            || right > i64::from(raster.width())
            || row_y >= i64::from(raster.height())
        {
            return None;
        }
        // Both coordinates are non-negative and in range here.
        Some(raster.data_offset() + row_y as u64 * u64::from(raster.width()) + x as u64)
    }
}

/// Configurable choice of addressing policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// [`Wraparound`] addressing.
    #[default]
    Wrap,
    /// [`RejectOutOfRange`] addressing.
    Reject,
}

impl AddressingPolicy for AddressingMode {
    fn row_start(
        &self,
        raster: &RasterMetadata,
        x: i64,
        y: i64,
        row: u32,
        window_width: u32,
    ) -> Option<u64> {
        match self {
            Self::Wrap => Wraparound.row_start(raster, x, y, row, window_width),
            Self::Reject => RejectOutOfRange.row_start(raster, x, y, row, window_width),
        }
    }
}

impl std::fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wrap => f.write_str("wrap"),
            Self::Reject => f.write_str("reject"),
        }
    }
}
