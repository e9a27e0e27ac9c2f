use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pgm_pan::{
    path::{PathPlanner, Waypoint, MAX_PAN_SPEED},
    raster::{RasterMetadata, RasterReader},
    window::FrameWindow,
};
use std::io::Cursor;

fn source(width: u32, height: u32) -> (RasterMetadata, Cursor<Vec<u8>>) {
    let mut bytes = Vec::new();
    RasterMetadata::write(&mut bytes, width, height).unwrap();
    let offset = bytes.len() as u64;
    bytes.extend((0..width * height).map(|i| (i % 256) as u8));
    (RasterMetadata::new(width, height, offset), Cursor::new(bytes))
}

fn bench_window_read(c: &mut Criterion) {
    let (metadata, mut src) = source(2048, 2048);
    let mut window = FrameWindow::new(320, 240, metadata);
    let mut x = 0i64;

    c.bench_function("read 320x240 window", |b| {
        b.iter(|| {
            x = (x + 7) % 4096;
            window.set_origin(x, x / 2);
            window.read_from(&mut src).unwrap();
            black_box(window.pixels()[0])
        })
    });

    let mut buffered = RasterReader::new(src.clone()).unwrap();
    c.bench_function("read 320x240 window through RasterReader", |b| {
        b.iter(|| {
            x = (x + 7) % 4096;
            window.set_origin(x, x / 2);
            window.read_from(&mut buffered).unwrap();
            black_box(window.pixels()[0])
        })
    });

    let mut out = Vec::with_capacity(320 * 240);
    window.set_inverted(true);
    c.bench_function("write inverted 320x240 window", |b| {
        b.iter(|| {
            out.clear();
            window.write_to(&mut out).unwrap();
            black_box(out.len())
        })
    });
}

fn bench_path_planning(c: &mut Criterion) {
    let path = [
        Waypoint::new(0, 0),
        Waypoint::new(1500, 400),
        Waypoint::new(200, 1800),
        Waypoint::new(1900, 1900),
    ];
    c.bench_function("plan four-point path", |b| {
        b.iter(|| PathPlanner::new(black_box(&path), MAX_PAN_SPEED).steps().count())
    });
}

criterion_group!(benches, bench_window_read, bench_path_planning);
criterion_main!(benches);
