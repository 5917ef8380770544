//! Test utilities for integration tests.
//!
//! Helpers for building synthetic source images, encoding them the way a real
//! map file would arrive, and observing pyramid runs.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Mutex;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use map_cutter::observer::PyramidObserver;
use map_cutter::pyramid::{LevelReport, PyramidReport};
use map_cutter::tile::TileCoord;
use map_cutter::TileError;

// =============================================================================
// Source Images
// =============================================================================

/// A square image with no two neighbouring pixels alike.
pub fn gradient_image(side: u32) -> RgbaImage {
    RgbaImage::from_fn(side, side, |x, y| {
        Rgba([
            (x % 256) as u8,
            (y % 256) as u8,
            ((x / 256 + y / 256) * 40 % 256) as u8,
            255,
        ])
    })
}

/// Encode an RGBA image as PNG.
pub fn encode_png(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Encode a square RGB gradient of `side` pixels as JPEG.
pub fn encode_jpeg(side: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(side, side, |x, y| {
        Rgb([(x * 4 % 256) as u8, (y * 4 % 256) as u8, 100])
    });

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .encode_image(&img)
        .unwrap();
    buf
}

/// PNG source bytes for a gradient map.
pub fn png_source(side: u32) -> Vec<u8> {
    encode_png(&gradient_image(side))
}

// =============================================================================
// Tile Checks
// =============================================================================

/// Check for the 8-byte PNG signature.
pub fn is_valid_png(data: &[u8]) -> bool {
    data.len() > 8 && data[..8] == [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]
}

/// Decode an encoded tile to RGBA.
pub fn decode_tile(data: &[u8]) -> RgbaImage {
    image::load_from_memory(data).unwrap().into_rgba8()
}

// =============================================================================
// Recording Observer
// =============================================================================

/// Observer that remembers every event it receives.
#[derive(Default)]
pub struct RecordingObserver {
    started: Mutex<Vec<(u32, u64)>>,
    cut: Mutex<BTreeMap<u32, u64>>,
    failed: Mutex<Vec<TileCoord>>,
    finished: Mutex<Vec<LevelReport>>,
    pyramids: Mutex<Vec<PyramidReport>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> Vec<(u32, u64)> {
        let mut started = self.started.lock().unwrap().clone();
        started.sort();
        started
    }

    pub fn cut_per_level(&self) -> BTreeMap<u32, u64> {
        self.cut.lock().unwrap().clone()
    }

    pub fn failed(&self) -> Vec<TileCoord> {
        self.failed.lock().unwrap().clone()
    }

    pub fn finished(&self) -> Vec<LevelReport> {
        let mut finished = self.finished.lock().unwrap().clone();
        finished.sort_by_key(|r| r.zoom);
        finished
    }

    pub fn pyramid_count(&self) -> usize {
        self.pyramids.lock().unwrap().len()
    }
}

impl PyramidObserver for RecordingObserver {
    fn level_started(&self, zoom: u32, tiles_expected: u64) {
        self.started.lock().unwrap().push((zoom, tiles_expected));
    }

    fn tile_cut(&self, coord: TileCoord) {
        *self.cut.lock().unwrap().entry(coord.zoom).or_insert(0) += 1;
    }

    fn tile_failed(&self, coord: TileCoord, _error: &TileError) {
        self.failed.lock().unwrap().push(coord);
    }

    fn level_finished(&self, report: &LevelReport) {
        self.finished.lock().unwrap().push(report.clone());
    }

    fn pyramid_finished(&self, report: &PyramidReport) {
        self.pyramids.lock().unwrap().push(report.clone());
    }
}
