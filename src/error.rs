use std::path::PathBuf;

use thiserror::Error;

use crate::pyramid::{LevelFailure, PyramidReport};

/// I/O errors that can occur when reading the source image
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// Source does not exist
    #[error("Source not found: {0}")]
    NotFound(String),

    /// Any other failure while reading the source bytes
    #[error("Failed to read {identifier}: {message}")]
    Read { identifier: String, message: String },
}

/// Errors raised by a tile sink
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// Tile could not be persisted
    #[error("Failed to write tile to {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    /// Sink refused the tile
    #[error("Tile rejected: {0}")]
    Rejected(String),
}

/// Errors that can occur when cutting or delivering a single tile
#[derive(Debug, Clone, Error)]
pub enum TileError {
    /// Zoom level is outside the pyramid
    #[error("Invalid zoom level {zoom}: pyramid has levels 0..={max_zoom}")]
    InvalidZoom { zoom: u32, max_zoom: u32 },

    /// Tile lies outside the grid (or the raster) of its level
    #[error(
        "Tile ({x}, {y}) out of bounds at zoom {zoom}: grid is {tiles_per_side}x{tiles_per_side}"
    )]
    OutOfBounds {
        zoom: u32,
        x: u32,
        y: u32,
        tiles_per_side: u32,
    },

    /// Cropped tile could not be encoded
    #[error("Failed to encode tile: {message}")]
    EncodeError { message: String },

    /// The sink failed to accept the tile
    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),
}

/// Errors that can occur when building a pyramid or cutting all of its tiles
#[derive(Debug, Error)]
pub enum PyramidError {
    /// Source bytes could not be read
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Source bytes are not a decodable raster image
    #[error("Image decode error: {message}")]
    Decode { message: String },

    /// Source is not square or not a power-of-two multiple of the tile size
    #[error("Unsupported source dimensions {width}x{height}: {reason}")]
    UnsupportedDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Pyramid configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// One or more levels stopped on a failed tile
    #[error(
        "Pyramid incomplete: {} level(s) failed, {} of {} tiles written",
        .failures.len(),
        .report.tiles_written(),
        .report.tiles_expected()
    )]
    Incomplete {
        report: PyramidReport,
        failures: Vec<LevelFailure>,
    },

    /// Generation was cancelled before every level finished
    #[error("Pyramid generation cancelled after {} tiles", .report.tiles_written())]
    Cancelled { report: PyramidReport },

    /// A level worker panicked before returning its outcome
    ///
    /// `report` and `failures` still cover every level that returned.
    #[error("Worker for zoom {zoom} panicked: {message}")]
    WorkerPanicked {
        zoom: u32,
        message: String,
        report: PyramidReport,
        failures: Vec<LevelFailure>,
    },
}
