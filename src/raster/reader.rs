//! Buffered source reader that survives nearby seeks.

use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// Buffered reader over a source raster.
///
/// Tracks its logical position, so an absolute seek to a byte that is
/// already buffered moves inside the buffer instead of discarding it.
/// Consecutive window rows taken from a narrow raster are then served
/// from one fill.
#[derive(Debug)]
pub struct RasterReader<R> {
    inner: BufReader<R>,
    pos: u64,
}

impl<R: Read + Seek> RasterReader<R> {
    /// Wraps `inner` with the default buffer size.
    pub fn new(inner: R) -> io::Result<Self> {
        Self::from_buf_reader(BufReader::new(inner))
    }

    /// Wraps `inner` with a buffer of `capacity` bytes.
    pub fn with_capacity(capacity: usize, inner: R) -> io::Result<Self> {
        Self::from_buf_reader(BufReader::with_capacity(capacity, inner))
    }

    fn from_buf_reader(mut inner: BufReader<R>) -> io::Result<Self> {
        let pos = inner.stream_position()?;
        Ok(Self { inner, pos })
    }

    /// Returns the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl<R: Read> Read for RasterReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R: Read> BufRead for RasterReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.inner.consume(amt);
        self.pos += amt as u64;
    }
}

impl<R: Read + Seek> Seek for RasterReader<R> {
    fn seek(&mut self, target: SeekFrom) -> io::Result<u64> {
        if let SeekFrom::Start(to) = target {
            if let Some(delta) = offset_between(self.pos, to) {
                self.inner.seek_relative(delta)?;
                self.pos = to;
                return Ok(to);
            }
        }
        self.pos = self.inner.seek(target)?;
        Ok(self.pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }
}

fn offset_between(from: u64, to: u64) -> Option<i64> {
    i64::try_from(to)
        .ok()?
        .checked_sub(i64::try_from(from).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterMetadata;
    use crate::window::FrameWindow;
    use std::io::Cursor;

    /// Cursor that counts how often it is asked to seek.
    struct CountingSeeks {
        inner: Cursor<Vec<u8>>,
        seeks: usize,
    }

    impl Read for CountingSeeks {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Seek for CountingSeeks {
        fn seek(&mut self, target: SeekFrom) -> io::Result<u64> {
            self.seeks += 1;
            self.inner.seek(target)
        }
    }

    fn raster_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        RasterMetadata::write(&mut bytes, width, height).unwrap();
        bytes.extend((0..width * height).map(|i| (i % 256) as u8));
        bytes
    }

    fn counting(bytes: Vec<u8>) -> CountingSeeks {
        CountingSeeks {
            inner: Cursor::new(bytes),
            seeks: 0,
        }
    }

    #[test]
    fn test_header_offset_matches_stream_position() {
        let mut reader = RasterReader::new(Cursor::new(raster_bytes(10, 10))).unwrap();
        let md = RasterMetadata::parse(&mut reader).unwrap();
        assert_eq!(md.data_offset(), RasterMetadata::header_len(10, 10) as u64);
        assert_eq!(reader.stream_position().unwrap(), md.data_offset());
    }

    #[test]
    fn test_buffered_rows_do_not_seek_the_source() {
        let mut reader = RasterReader::new(counting(raster_bytes(10, 10))).unwrap();
        let md = RasterMetadata::parse(&mut reader).unwrap();
        let before = reader.inner.get_ref().seeks;

        let mut window = FrameWindow::new(3, 4, md);
        window.set_origin(2, 3);
        window.read_from(&mut reader).unwrap();

        assert_eq!(reader.inner.get_ref().seeks, before);
        assert_eq!(window.row(0), &[32, 33, 34]);
        assert_eq!(window.row(3), &[62, 63, 64]);
    }

    #[test]
    fn test_far_seeks_read_the_same_window() {
        let bytes = raster_bytes(64, 64);
        let md = RasterMetadata::new(64, 64, RasterMetadata::header_len(64, 64) as u64);

        let mut direct = FrameWindow::new(5, 5, md);
        direct.set_origin(40, 50);
        direct.read_from(&mut Cursor::new(bytes.clone())).unwrap();

        let mut reader = RasterReader::with_capacity(16, counting(bytes)).unwrap();
        let mut buffered = FrameWindow::new(5, 5, md);
        buffered.set_origin(40, 50);
        buffered.read_from(&mut reader).unwrap();

        assert_eq!(buffered.pixels(), direct.pixels());
        assert!(reader.into_inner().seeks > 1);
    }

    #[test]
    fn test_backward_and_relative_seeks_track_position() {
        let bytes: Vec<u8> = (0u8..100).collect();
        let mut reader = RasterReader::with_capacity(8, Cursor::new(bytes)).unwrap();
        let mut byte = [0u8; 1];

        assert_eq!(reader.seek(SeekFrom::Start(50)).unwrap(), 50);
        reader.read_exact(&mut byte).unwrap();
        assert_eq!(byte[0], 50);

        assert_eq!(reader.seek(SeekFrom::Start(3)).unwrap(), 3);
        reader.read_exact(&mut byte).unwrap();
        assert_eq!(byte[0], 3);

        assert_eq!(reader.seek(SeekFrom::Current(10)).unwrap(), 14);
        assert_eq!(reader.stream_position().unwrap(), 14);
        reader.read_exact(&mut byte).unwrap();
        assert_eq!(byte[0], 14);

        assert_eq!(reader.seek(SeekFrom::End(-1)).unwrap(), 99);
        reader.read_exact(&mut byte).unwrap();
        assert_eq!(byte[0], 99);
    }
}
