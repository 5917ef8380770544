//! Resolution arithmetic for a square tile pyramid.
//!
//! Zoom 0 is the coarsest level (one tile covers the map) and `max_zoom` is
//! the native resolution of the source. Level `z` is `tile_size * 2^z` pixels
//! wide and holds `2^z` tiles per side.

use crate::error::PyramidError;

/// Number of halvings needed to bring `source_res` down to `tile_size`.
///
/// Computes `floor(log2(source_res / tile_size))`. Returns 0 when the source
/// is not larger than one tile.
pub fn max_zoom(source_res: u32, tile_size: u32) -> u32 {
    if tile_size == 0 || source_res < tile_size {
        return 0;
    }
    (source_res / tile_size).ilog2()
}

/// Pixel edge length of zoom level `zoom`.
#[inline]
pub fn level_resolution(tile_size: u32, zoom: u32) -> u32 {
    tile_size << zoom
}

/// Number of tiles along each axis at `zoom`.
#[inline]
pub fn tiles_per_side(zoom: u32) -> u32 {
    1 << zoom
}

/// Number of tiles in the full grid at `zoom`.
#[inline]
pub fn tiles_at_level(zoom: u32) -> u64 {
    1u64 << (2 * zoom)
}

/// Number of tiles across all levels `0..=max_zoom`.
pub fn total_tiles(max_zoom: u32) -> u64 {
    (0..=max_zoom).map(tiles_at_level).sum()
}

/// Reject sources the pyramid cannot tile exactly.
///
/// The source must be square and its side must be `tile_size * 2^k` for some
/// `k >= 0`. A zero `tile_size` returns [`PyramidError::InvalidConfig`].
pub fn validate_source(width: u32, height: u32, tile_size: u32) -> Result<(), PyramidError> {
    let reject = |reason: String| PyramidError::UnsupportedDimensions {
        width,
        height,
        reason,
    };

    if tile_size == 0 {
        return Err(PyramidError::InvalidConfig(
            "tile_size must be greater than 0".to_string(),
        ));
    }
    if width != height {
        return Err(reject("source image must be square".to_string()));
    }
    if width < tile_size {
        return Err(reject(format!(
            "source is smaller than one {}px tile",
            tile_size
        )));
    }
    if width % tile_size != 0 || !(width / tile_size).is_power_of_two() {
        return Err(reject(format!(
            "side must be {} times a power of two",
            tile_size
        )));
    }

    Ok(())
}

// =============================================================================
// Pyramid Plan
// =============================================================================

/// Shape of a pyramid for one source resolution and tile size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PyramidPlan {
    source_res: u32,
    tile_size: u32,
    max_zoom: u32,
}

impl PyramidPlan {
    /// Plan the pyramid for a validated source.
    pub fn new(source_res: u32, tile_size: u32) -> Self {
        Self {
            source_res,
            tile_size,
            max_zoom: max_zoom(source_res, tile_size),
        }
    }

    pub fn source_res(&self) -> u32 {
        self.source_res
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn max_zoom(&self) -> u32 {
        self.max_zoom
    }

    /// Number of levels, `max_zoom + 1`.
    pub fn level_count(&self) -> usize {
        self.max_zoom as usize + 1
    }

    /// Pixel edge length of `zoom`.
    pub fn level_resolution(&self, zoom: u32) -> u32 {
        level_resolution(self.tile_size, zoom)
    }

    /// Whether `zoom` is one of this pyramid's levels.
    pub fn contains_zoom(&self, zoom: u32) -> bool {
        zoom <= self.max_zoom
    }

    /// Total tiles across all levels.
    pub fn total_tiles(&self) -> u64 {
        total_tiles(self.max_zoom)
    }
}
