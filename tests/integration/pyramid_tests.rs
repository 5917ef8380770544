//! End-to-end pyramid tests.
//!
//! Tests verify:
//! - Zoom range and tile counts for power-of-two sources
//! - Every tile is delivered exactly once with a valid encoding
//! - Tiles of each level cover its raster with no gaps or overlaps
//! - Repeated runs are byte-identical
//! - Single-tile cuts agree with full-pyramid output

use std::collections::HashSet;
use std::sync::Arc;

use image::{GenericImage, RgbaImage};
use tokio_util::sync::CancellationToken;

use map_cutter::handler::MemoryTileHandler;
use map_cutter::pyramid::{LevelStatus, PyramidConfig, PyramidPlan, TileMap};
use map_cutter::tile::{TileCoord, TileFormat};
use map_cutter::{PyramidError, TileError};

use super::test_utils::{
    decode_tile, encode_jpeg, gradient_image, is_valid_png, png_source, RecordingObserver,
};

fn config(tile_size: u32) -> PyramidConfig {
    PyramidConfig::default().with_tile_size(tile_size)
}

// =============================================================================
// Zoom Range
// =============================================================================

#[test]
fn test_4096_source_plan() {
    let plan = PyramidPlan::new(4096, 256);

    assert_eq!(plan.max_zoom(), 4);
    assert_eq!(plan.total_tiles(), 1 + 4 + 16 + 64 + 256);
}

#[tokio::test]
async fn test_four_halvings_produce_341_tiles() {
    // Same shape as 4096px / 256px tiles, scaled down by 16.
    let map = TileMap::from_bytes(&png_source(256), config(16)).unwrap();
    assert_eq!(map.max_zoom(), 4);

    let handler = Arc::new(MemoryTileHandler::new());
    let report = map.cut_all_tiles(Arc::clone(&handler)).await.unwrap();

    assert_eq!(report.tiles_written(), 341);
    assert_eq!(handler.len(), 341);
    assert_eq!(handler.call_count(), 341);
}

// =============================================================================
// Full Pyramid
// =============================================================================

#[tokio::test]
async fn test_1024_source_delivers_21_unique_tiles() {
    let map = TileMap::from_bytes(&png_source(1024), PyramidConfig::default()).unwrap();
    assert_eq!(map.max_zoom(), 2);

    let handler = Arc::new(MemoryTileHandler::new());
    let report = map.cut_all_tiles(Arc::clone(&handler)).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.tiles_written(), 21);
    assert_eq!(handler.call_count(), 21);

    let coords: HashSet<TileCoord> = handler.coords().into_iter().collect();
    assert_eq!(coords.len(), 21);

    for (coord, data) in handler.snapshot() {
        assert!(coord.x < 1 << coord.zoom && coord.y < 1 << coord.zoom);
        assert!(is_valid_png(&data), "tile {} is not a PNG", coord);
        assert_eq!(decode_tile(&data).dimensions(), (256, 256));
    }
}

#[tokio::test]
async fn test_tiles_cover_each_level_exactly() {
    let tile_size = 16;
    let map = TileMap::from_bytes(&png_source(64), config(tile_size)).unwrap();

    let handler = Arc::new(MemoryTileHandler::new());
    map.cut_all_tiles(Arc::clone(&handler)).await.unwrap();

    for (zoom, raster) in map.levels() {
        let side = raster.width();
        let mut canvas = RgbaImage::new(side, side);
        let mut covered = vec![0u8; (side * side) as usize];

        for coord in handler.coords_at(zoom) {
            let tile = decode_tile(&handler.get(coord).unwrap());
            let (left, top) = (coord.x * tile_size, coord.y * tile_size);

            canvas.copy_from(&tile, left, top).unwrap();
            for py in top..top + tile_size {
                for px in left..left + tile_size {
                    covered[(py * side + px) as usize] += 1;
                }
            }
        }

        assert!(
            covered.iter().all(|&c| c == 1),
            "zoom {} has gaps or overlaps",
            zoom
        );
        assert_eq!(&canvas, &**raster, "zoom {} differs from its raster", zoom);
    }
}

#[tokio::test]
async fn test_runs_are_byte_identical() {
    let map = TileMap::from_bytes(&png_source(128), config(32)).unwrap();

    let first = Arc::new(MemoryTileHandler::new());
    let second = Arc::new(MemoryTileHandler::new());
    map.cut_all_tiles(Arc::clone(&first)).await.unwrap();
    map.cut_all_tiles(Arc::clone(&second)).await.unwrap();

    assert_eq!(first.snapshot(), second.snapshot());

    // A map rebuilt from the same bytes produces the same tiles too.
    let rebuilt = TileMap::from_bytes(&png_source(128), config(32)).unwrap();
    let third = Arc::new(MemoryTileHandler::new());
    rebuilt.cut_all_tiles(Arc::clone(&third)).await.unwrap();

    assert_eq!(first.snapshot(), third.snapshot());
}

#[tokio::test]
async fn test_observer_sees_every_level() {
    let map = TileMap::from_bytes(&png_source(64), config(16)).unwrap();
    let handler = Arc::new(MemoryTileHandler::new());
    let observer = Arc::new(RecordingObserver::new());

    map.cut_all_tiles_with(handler, observer.clone(), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(observer.started(), vec![(0, 1), (1, 4), (2, 16)]);
    assert_eq!(
        observer.cut_per_level().into_iter().collect::<Vec<_>>(),
        vec![(0, 1), (1, 4), (2, 16)]
    );
    assert!(observer.failed().is_empty());

    let finished = observer.finished();
    assert_eq!(finished.len(), 3);
    assert!(finished.iter().all(|r| r.status == LevelStatus::Complete));
    assert_eq!(observer.pyramid_count(), 1);
}

#[tokio::test]
async fn test_jpeg_output() {
    let config = config(16).with_format(TileFormat::Jpeg { quality: 75 });
    let map = TileMap::from_bytes(&png_source(32), config).unwrap();

    let handler = Arc::new(MemoryTileHandler::new());
    map.cut_all_tiles(Arc::clone(&handler)).await.unwrap();

    assert_eq!(handler.len(), 5);
    for (_, data) in handler.snapshot() {
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
        assert_eq!(decode_tile(&data).dimensions(), (16, 16));
    }
}

// =============================================================================
// Single Tiles
// =============================================================================

#[tokio::test]
async fn test_single_tile_matches_full_pyramid() {
    let map = TileMap::from_bytes(&png_source(64), config(16)).unwrap();
    let handler = Arc::new(MemoryTileHandler::new());
    map.cut_all_tiles(Arc::clone(&handler)).await.unwrap();

    for coord in [
        TileCoord::new(0, 0, 0),
        TileCoord::new(1, 1, 0),
        TileCoord::new(2, 3, 2),
    ] {
        let mut buf = Vec::new();
        map.cut_tile(&mut buf, coord).unwrap();
        assert_eq!(&buf[..], &handler.get(coord).unwrap()[..]);
    }
}

#[test]
fn test_origin_tile_is_one_tile_regardless_of_source() {
    for side in [32, 64, 256] {
        let map = TileMap::from_bytes(&png_source(side), config(32)).unwrap();
        let data = map.cut_tile_bytes(TileCoord::new(0, 0, 0)).unwrap();
        assert_eq!(decode_tile(&data).dimensions(), (32, 32));
    }
}

#[test]
fn test_out_of_grid_tile_fails() {
    let map = TileMap::from_bytes(&png_source(64), config(16)).unwrap();

    for coord in [
        TileCoord::new(1, 2, 0),
        TileCoord::new(1, 0, 2),
        TileCoord::new(0, 1, 1),
    ] {
        let mut buf = Vec::new();
        let result = map.cut_tile(&mut buf, coord);

        assert!(
            matches!(result, Err(TileError::OutOfBounds { .. })),
            "{} should be out of bounds",
            coord
        );
        assert!(buf.is_empty());
    }
}

#[test]
fn test_zoom_beyond_pyramid_fails() {
    let map = TileMap::from_bytes(&png_source(64), config(16)).unwrap();
    let result = map.cut_tile_bytes(TileCoord::new(3, 0, 0));

    assert!(matches!(
        result,
        Err(TileError::InvalidZoom {
            zoom: 3,
            max_zoom: 2
        })
    ));
}

// =============================================================================
// Sources
// =============================================================================

#[test]
fn test_jpeg_source() {
    let map = TileMap::from_bytes(&encode_jpeg(64), config(16)).unwrap();

    assert_eq!(map.max_zoom(), 2);
    assert_eq!(map.level(2).unwrap().width(), 64);
}

#[test]
fn test_undecodable_source() {
    let result = TileMap::from_bytes(b"GIF89a but not really", config(16));
    assert!(matches!(result, Err(PyramidError::Decode { .. })));
}

#[test]
fn test_non_power_of_two_source_rejected() {
    let result = TileMap::from_bytes(&png_source(48), config(16));

    match result {
        Err(PyramidError::UnsupportedDimensions { width, height, .. }) => {
            assert_eq!((width, height), (48, 48));
        }
        other => panic!("Expected UnsupportedDimensions, got {:?}", other),
    }
}

#[test]
fn test_non_square_source_rejected() {
    let img = RgbaImage::from_fn(64, 32, |x, y| gradient_image(64).get_pixel(x, y).to_owned());
    let data = super::test_utils::encode_png(&img);

    let result = TileMap::from_bytes(&data, config(16));
    assert!(matches!(
        result,
        Err(PyramidError::UnsupportedDimensions { .. })
    ));
}
