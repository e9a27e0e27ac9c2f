//! Frame window reading from and writing to byte streams.

use crate::raster::{AddressingPolicy, RasterMetadata, Wraparound};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use thiserror::Error;

/// Origin a window has before its first repositioning.
const UNPOSITIONED: i64 = -1;

/// Errors that can occur while preparing or filling a window.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("unable to allocate {bytes} bytes for frame buffer")]
    Allocation { bytes: usize },
    #[error("window row {row} at origin ({x}, {y}) is outside the source raster")]
    OutOfBounds { x: i64, y: i64, row: u32 },
    #[error("failed to read source raster: {0}")]
    Io(#[from] io::Error),
}

/// Inverts a grayscale sample.
#[inline]
pub fn invert_sample(sample: u8) -> u8 {
    u8::MAX - sample
}

/// A fixed-size rectangular window over a source raster.
///
/// The buffer is a single contiguous allocation addressed as
/// `row * width + col`. It is allocated on first use and never resized.
pub struct FrameWindow<P = Wraparound> {
    width: u32,
    height: u32,
    x: i64,
    y: i64,
    inverted: bool,
    source: RasterMetadata,
    pixels: Vec<u8>,
    policy: P,
}

impl FrameWindow<Wraparound> {
    /// Creates a window with toroidal addressing.
    pub fn new(width: u32, height: u32, source: RasterMetadata) -> Self {
        Self::with_policy(width, height, source, Wraparound)
    }
}

impl<P: AddressingPolicy> FrameWindow<P> {
    /// Creates a window that maps rows through `policy`.
    ///
    /// No memory is allocated until [`FrameWindow::prepare`] or the first
    /// [`FrameWindow::read_from`].
    pub fn with_policy(width: u32, height: u32, source: RasterMetadata, policy: P) -> Self {
        Self {
            width,
            height,
            x: UNPOSITIONED,
            y: UNPOSITIONED,
            inverted: false,
            source,
            pixels: Vec::new(),
            policy,
        }
    }

    /// Ensures the pixel buffer is allocated.
    ///
    /// Allocation failure is reported instead of aborting, and a later call
    /// will try again.
    pub fn prepare(&mut self) -> Result<(), WindowError> {
        let bytes = self.len_bytes().ok_or(WindowError::Allocation { bytes: usize::MAX })?;
        if self.pixels.len() == bytes {
            return Ok(());
        }
        self.pixels
            .try_reserve_exact(bytes)
            .map_err(|_| WindowError::Allocation { bytes })?;
        self.pixels.resize(bytes, 0);
        Ok(())
    }

    /// Moves the window's top-left corner. Coordinates are not validated.
    #[inline]
    pub fn set_origin(&mut self, x: i64, y: i64) {
        self.x = x;
        self.y = y;
    }

    /// Selects whether [`FrameWindow::write_to`] inverts samples.
    #[inline]
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Fills the buffer from `source` at the current origin.
    ///
    /// Each row seeks to the position chosen by the addressing policy and
    /// reads `width` contiguous bytes. Bytes past the end of the stream
    /// are zero.
    pub fn read_from<R: Read + Seek>(&mut self, source: &mut R) -> Result<(), WindowError> {
        self.prepare()?;
        let width = self.width as usize;
        for row in 0..self.height {
            let pos = self
                .policy
                .row_start(&self.source, self.x, self.y, row, self.width)
                .ok_or(WindowError::OutOfBounds {
                    x: self.x,
                    y: self.y,
                    row,
                })?;
            source.seek(SeekFrom::Start(pos))?;

            let start = row as usize * width;
            let filled = read_fully(source, &mut self.pixels[start..start + width])?;
            if filled < width {
                tracing::trace!(row, filled, "Short read at end of source");
                self.pixels[start + filled..start + width].fill(0);
            }
        }
        Ok(())
    }

    /// Writes the buffer row-major, inverting each sample if requested.
    ///
    /// No header is written.
    pub fn write_to<W: Write>(&self, dest: &mut W) -> io::Result<()> {
        if !self.inverted {
            return dest.write_all(&self.pixels);
        }
        let mut chunk = [0u8; 4096];
        for block in self.pixels.chunks(chunk.len()) {
            let out = &mut chunk[..block.len()];
            for (o, &b) in out.iter_mut().zip(block) {
                *o = invert_sample(b);
            }
            dest.write_all(out)?;
        }
        Ok(())
    }

    /// Returns one row of the buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is not prepared or `row >= height`.
    pub fn row(&self, row: u32) -> &[u8] {
        let width = self.width as usize;
        let start = row as usize * width;
        &self.pixels[start..start + width]
    }

    /// Returns the whole buffer, empty until prepared.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the window width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the window height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the current origin.
    #[inline]
    pub fn origin(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// Returns true if writes invert samples.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    fn len_bytes(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

impl<P> std::fmt::Debug for FrameWindow<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWindow")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("origin", &(self.x, self.y))
            .field("inverted", &self.inverted)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

/// Reads until `buf` is full or the stream ends; returns bytes read.
fn read_fully<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RejectOutOfRange;
    use proptest::prelude::*;
    use std::io::Cursor;

    /// Builds a raster whose sample at (x, y) is `(y * width + x) % 251`.
    fn source(width: u32, height: u32) -> (RasterMetadata, Cursor<Vec<u8>>) {
        let mut bytes = Vec::new();
        RasterMetadata::write(&mut bytes, width, height).unwrap();
        let offset = bytes.len() as u64;
        bytes.extend((0..width * height).map(|i| (i % 251) as u8));
        (RasterMetadata::new(width, height, offset), Cursor::new(bytes))
    }

    #[test]
    fn test_new_window_is_unpositioned_and_unallocated() {
        let (md, _) = source(10, 10);
        let window = FrameWindow::new(4, 3, md);
        assert_eq!(window.origin(), (-1, -1));
        assert!(window.pixels().is_empty());
        assert!(!window.is_inverted());
    }

    #[test]
    fn test_read_window_in_range() {
        let (md, mut src) = source(10, 10);
        let mut window = FrameWindow::new(3, 2, md);
        window.set_origin(2, 4);
        window.read_from(&mut src).unwrap();

        assert_eq!(window.row(0), &[42, 43, 44]);
        assert_eq!(window.row(1), &[52, 53, 54]);
    }

    #[test]
    fn test_buffer_is_reused_across_reads() {
        let (md, mut src) = source(10, 10);
        let mut window = FrameWindow::new(3, 3, md);
        window.set_origin(0, 0);
        window.read_from(&mut src).unwrap();
        let first = window.pixels().as_ptr();

        window.set_origin(5, 5);
        window.read_from(&mut src).unwrap();
        assert_eq!(window.pixels().as_ptr(), first);
        assert_eq!(window.pixels().len(), 9);
        assert_eq!(window.row(0), &[55, 56, 57]);
    }

    #[test]
    fn test_unallocatable_window_reports_allocation_error() {
        let (md, mut src) = source(10, 10);
        let mut window = FrameWindow::new(u32::MAX, u32::MAX, md);
        window.set_origin(0, 0);

        assert!(matches!(
            window.read_from(&mut src),
            Err(WindowError::Allocation { .. })
        ));
        assert!(window.pixels().is_empty());
        // Nothing was read from the source.
        assert_eq!(src.position(), 0);
    }

    #[test]
    fn test_row_crossing_right_edge_reads_into_next_row() {
        let (md, mut src) = source(10, 10);
        let mut window = FrameWindow::new(4, 1, md);
        window.set_origin(8, 0);
        window.read_from(&mut src).unwrap();
        assert_eq!(window.row(0), &[8, 9, 10, 11]);
    }

    #[test]
    fn test_origin_one_raster_below_aliases_top() {
        let (md, mut src) = source(100, 100);
        let mut window = FrameWindow::new(4, 4, md);
        window.set_origin(0, 0);
        window.read_from(&mut src).unwrap();
        let top = window.pixels().to_vec();

        window.set_origin(0, 100);
        window.read_from(&mut src).unwrap();
        assert_eq!(window.pixels(), top.as_slice());
    }

    #[test]
    fn test_wrapped_row_start_reads_header_bytes() {
        // 13 + 9 * 10 + 9 = 112 wraps to 12, the header's final newline.
        let (md, mut src) = source(10, 10);
        let mut window = FrameWindow::new(4, 1, md);
        window.set_origin(9, 9);
        window.read_from(&mut src).unwrap();
        assert_eq!(window.row(0), &[b'\n', 0, 1, 2]);
    }

    #[test]
    fn test_read_past_end_of_stream_zero_fills() {
        let (md, src) = source(10, 10);
        let mut bytes = src.into_inner();
        bytes.truncate(13 + 50);
        let mut truncated = Cursor::new(bytes);

        let mut window = FrameWindow::new(6, 1, md);
        window.set_origin(5, 4);
        window.read_from(&mut truncated).unwrap();
        assert_eq!(window.row(0), &[45, 46, 47, 48, 49, 0]);
    }

    #[test]
    fn test_reject_policy_refuses_out_of_range() {
        let (md, mut src) = source(10, 10);
        let mut window = FrameWindow::with_policy(4, 4, md, RejectOutOfRange);
        window.set_origin(8, 0);
        assert!(matches!(
            window.read_from(&mut src),
            Err(WindowError::OutOfBounds { x: 8, y: 0, row: 0 })
        ));

        window.set_origin(6, 6);
        assert!(window.read_from(&mut src).is_ok());
    }

    #[test]
    fn test_write_verbatim_and_inverted() {
        let (md, mut src) = source(10, 10);
        let mut window = FrameWindow::new(2, 2, md);
        window.set_origin(0, 0);
        window.read_from(&mut src).unwrap();

        let mut plain = Vec::new();
        window.write_to(&mut plain).unwrap();
        assert_eq!(plain, vec![0, 1, 10, 11]);

        window.set_inverted(true);
        let mut inverted = Vec::new();
        window.write_to(&mut inverted).unwrap();
        assert_eq!(inverted, vec![255, 254, 245, 244]);
    }

    #[test]
    fn test_inverted_write_spans_multiple_chunks() {
        let (md, mut src) = source(200, 100);
        let mut window = FrameWindow::new(100, 50, md);
        window.set_origin(10, 10);
        window.read_from(&mut src).unwrap();
        window.set_inverted(true);

        let mut out = Vec::new();
        window.write_to(&mut out).unwrap();
        assert_eq!(out.len(), 5000);
        assert!(out
            .iter()
            .zip(window.pixels())
            .all(|(&o, &p)| o == invert_sample(p)));
    }

    #[test]
    fn test_invert_is_an_involution() {
        for b in 0..=u8::MAX {
            assert_eq!(invert_sample(invert_sample(b)), b);
        }
    }

    proptest! {
        #[test]
        fn prop_any_origin_reads_without_error(x in -10_000i64..10_000, y in -10_000i64..10_000) {
            let (md, mut src) = source(30, 20);
            let mut window = FrameWindow::new(7, 5, md);
            window.set_origin(x, y);
            prop_assert!(window.read_from(&mut src).is_ok());
            prop_assert_eq!(window.pixels().len(), 35);
        }
    }
}
