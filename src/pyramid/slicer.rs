//! Cropping a single tile out of a level raster.

use image::imageops;
use image::RgbaImage;

use crate::error::TileError;
use crate::tile::TileCoord;

/// Crop the `tile_size x tile_size` tile at `coord` out of `raster`.
///
/// The tile is anchored at pixel `(tile_size * x, tile_size * y)`. `raster` is
/// expected to be the level raster for `coord.zoom`.
///
/// # Errors
///
/// Returns [`TileError::OutOfBounds`] if any part of the tile falls outside the
/// raster.
pub fn cut_tile(raster: &RgbaImage, tile_size: u32, coord: TileCoord) -> Result<RgbaImage, TileError> {
    let (width, height) = raster.dimensions();

    let left = u64::from(tile_size) * u64::from(coord.x);
    let top = u64::from(tile_size) * u64::from(coord.y);
    let size = u64::from(tile_size);

    if tile_size == 0 || left + size > u64::from(width) || top + size > u64::from(height) {
        return Err(TileError::OutOfBounds {
            zoom: coord.zoom,
            x: coord.x,
            y: coord.y,
            tiles_per_side: width.checked_div(tile_size).unwrap_or(0),
        });
    }

    // Both offsets fit in u32 since they are bounded by the raster size.
    let tile = imageops::crop_imm(raster, left as u32, top as u32, tile_size, tile_size);
    Ok(tile.to_image())
}
