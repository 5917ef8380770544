//! Tile grid coordinates.

use std::fmt;

use serde::Serialize;

/// Position of one tile in the pyramid.
///
/// `x` grows to the right and `y` grows downward, both starting at 0 in the
/// top-left corner. At zoom `z` both axes range over `0..2^z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TileCoord {
    /// Zoom level (0 = whole map in one tile)
    pub zoom: u32,

    /// Column index
    pub x: u32,

    /// Row index
    pub y: u32,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(zoom: u32, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// File stem used by the filesystem sink, e.g. `3_5_2`.
    pub fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.zoom, self.x, self.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}
