//! Tile primitives.
//!
//! - [`TileCoord`]: `(zoom, x, y)` position of a tile in the pyramid
//! - [`TileEncoder`]: encodes cropped RGBA tiles to PNG (default) or JPEG
//! - [`TileFormat`]: the output codec policy

mod coord;
mod encoder;

pub use coord::TileCoord;
pub use encoder::{
    clamp_quality, is_valid_quality, TileEncoder, TileFormat, DEFAULT_JPEG_QUALITY,
    MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
