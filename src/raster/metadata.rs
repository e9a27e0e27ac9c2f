//! Raster header parsing and serialization.
//!
//! The accepted layout is:
//!
//! ```text
//! P5\n
//! # optional comment lines\n
//! <width> <height>\n
//! 255\n
//! <binary row-major samples>
//! ```

use std::io::{self, BufRead, Seek, Write};
use thiserror::Error;

/// Magic line written at the top of every output raster.
pub const MAGIC: &str = "P5";

/// Maximum sample value written to every output raster.
pub const MAX_SAMPLE_VALUE: u8 = u8::MAX;

/// Errors that can occur while parsing a raster header.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("failed to read raster header: {0}")]
    Io(#[from] io::Error),
    #[error("raster header ended before the {0}")]
    Truncated(&'static str),
    #[error("invalid raster dimension {0:?}")]
    InvalidDimension(String),
    #[error("raster has no samples ({width}x{height})")]
    EmptyRaster { width: u32, height: u32 },
}

/// Geometry of a source raster.
///
/// Created once per run by [`RasterMetadata::parse`] and never mutated.
/// `width * height` is the number of samples and `data_offset` is the
/// byte position of the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterMetadata {
    width: u32,
    height: u32,
    data_offset: u64,
}

impl RasterMetadata {
    /// Creates metadata from known geometry.
    pub fn new(width: u32, height: u32, data_offset: u64) -> Self {
        Self {
            width,
            height,
            data_offset,
        }
    }

    /// Parses a raster header from the current position of `stream`.
    ///
    /// Consumes the magic line, any `#` comment lines directly after it,
    /// the `width height` pair and the maximum-sample-value line. The
    /// stream position afterwards is recorded as the data offset. Neither
    /// the magic value nor the maximum sample value is checked.
    pub fn parse<R: BufRead + Seek>(stream: &mut R) -> Result<Self, HeaderError> {
        let mut line = Vec::new();
        if stream.read_until(b'\n', &mut line)? == 0 {
            return Err(HeaderError::Truncated("magic line"));
        }

        while stream.fill_buf()?.first() == Some(&b'#') {
            line.clear();
            stream.read_until(b'\n', &mut line)?;
        }

        let width = read_dimension(stream, "width")?;
        let height = read_dimension(stream, "height")?;

        skip_whitespace(stream)?;
        line.clear();
        if stream.read_until(b'\n', &mut line)? == 0 {
            return Err(HeaderError::Truncated("maximum sample value"));
        }

        let data_offset = stream.stream_position()?;
        if width == 0 || height == 0 {
            return Err(HeaderError::EmptyRaster { width, height });
        }

        tracing::debug!(width, height, data_offset, "Parsed raster header");
        Ok(Self::new(width, height, data_offset))
    }

    /// Writes the canonical three-line header for an output raster.
    ///
    /// The dimensions are those of the output, not of any source.
    pub fn write<W: Write>(stream: &mut W, width: u32, height: u32) -> io::Result<()> {
        write!(stream, "{MAGIC}\n{width} {height}\n{MAX_SAMPLE_VALUE}\n")
    }

    /// Length in bytes of the header [`RasterMetadata::write`] emits.
    pub fn header_len(width: u32, height: u32) -> usize {
        format!("{MAGIC}\n{width} {height}\n{MAX_SAMPLE_VALUE}\n").len()
    }

    /// Returns the raster width in samples.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the raster height in samples.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the byte offset of the first sample.
    #[inline]
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Returns the total number of samples (width * height).
    #[inline]
    pub fn sample_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

fn skip_whitespace<R: BufRead>(stream: &mut R) -> io::Result<()> {
    loop {
        let buf = stream.fill_buf()?;
        if buf.is_empty() {
            return Ok(());
        }
        let n = buf.iter().take_while(|b| b.is_ascii_whitespace()).count();
        let done = n < buf.len();
        stream.consume(n);
        if done {
            return Ok(());
        }
    }
}

fn read_token<R: BufRead>(stream: &mut R) -> io::Result<Vec<u8>> {
    skip_whitespace(stream)?;
    let mut token = Vec::new();
    loop {
        let buf = stream.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        let n = buf.iter().take_while(|b| !b.is_ascii_whitespace()).count();
        token.extend_from_slice(&buf[..n]);
        let done = n < buf.len();
        stream.consume(n);
        if done {
            break;
        }
    }
    Ok(token)
}

fn read_dimension<R: BufRead>(stream: &mut R, what: &'static str) -> Result<u32, HeaderError> {
    let token = read_token(stream)?;
    if token.is_empty() {
        return Err(HeaderError::Truncated(what));
    }
    let text = String::from_utf8_lossy(&token);
    text.parse()
        .map_err(|_| HeaderError::InvalidDimension(text.into_owned()))
}
