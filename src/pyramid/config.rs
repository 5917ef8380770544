//! Build-time settings for a pyramid.

use serde::Serialize;

use crate::error::PyramidError;
use crate::tile::{is_valid_quality, TileFormat};

use super::resample::ResampleFilter;

/// Default edge length of a tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Settings passed to [`TileMap`](super::TileMap) at construction.
///
/// # Example
///
/// ```
/// use map_cutter::pyramid::{PyramidConfig, ResampleFilter};
/// use map_cutter::tile::TileFormat;
///
/// let config = PyramidConfig::default()
///     .with_tile_size(512)
///     .with_filter(ResampleFilter::Lanczos3)
///     .with_format(TileFormat::Jpeg { quality: 90 });
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PyramidConfig {
    /// Edge length of every tile, in pixels
    pub tile_size: u32,

    /// Interpolation used when shrinking one level into the next
    pub filter: ResampleFilter,

    /// Codec used for every emitted tile
    pub format: TileFormat,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            filter: ResampleFilter::default(),
            format: TileFormat::default(),
        }
    }
}

impl PyramidConfig {
    /// Set the tile edge length.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the resampling filter.
    pub fn with_filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the tile output format.
    pub fn with_format(mut self, format: TileFormat) -> Self {
        self.format = format;
        self
    }

    /// Check that the settings can produce a pyramid.
    pub fn validate(&self) -> Result<(), PyramidError> {
        if self.tile_size == 0 {
            return Err(PyramidError::InvalidConfig(
                "tile_size must be greater than 0".to_string(),
            ));
        }

        if let TileFormat::Jpeg { quality } = self.format {
            if !is_valid_quality(quality) {
                return Err(PyramidError::InvalidConfig(format!(
                    "jpeg quality must be between 1 and 100, got {}",
                    quality
                )));
            }
        }

        Ok(())
    }
}
