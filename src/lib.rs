//! # map-cutter
//!
//! Cuts one large square map image into a pyramid of fixed-size tiles for
//! tiled-map viewers.
//!
//! Zoom 0 is a single tile covering the whole map; each following level
//! doubles the resolution until the native resolution of the source is
//! reached. Every tile of every level is encoded (PNG by default) and handed to
//! a caller-supplied [`TileHandler`].
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`source`] - Reading and decoding the source image
//! - [`pyramid`] - Zoom math, resampling, tile slicing and concurrent dispatch
//! - [`tile`] - Tile coordinates and encoding
//! - [`handler`] - Tile sinks (filesystem, memory, closure)
//! - [`observer`] - Progress and diagnostics events
//! - [`config`] - CLI configuration for the binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use map_cutter::{FileImageSource, FileTileHandler, PyramidConfig, TileMap};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), map_cutter::PyramidError> {
//!     let config = PyramidConfig::default();
//!     let map = TileMap::open(&FileImageSource::new("world.png"), config).await?;
//!
//!     let handler = Arc::new(FileTileHandler::new("output", config.format));
//!     handler.ensure_output_dir().expect("create output directory");
//!
//!     let report = map.cut_all_tiles(handler).await?;
//!     println!("{} tiles", report.tiles_written());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod observer;
pub mod pyramid;
pub mod source;
pub mod tile;

// Re-export commonly used types
pub use config::{Config, OutputFormat, SummaryFormat};
pub use error::{HandlerError, IoError, PyramidError, TileError};
pub use handler::{from_fn, FileTileHandler, FnHandler, MemoryTileHandler, TileHandler};
pub use observer::{NoopObserver, PyramidObserver, TracingObserver};
pub use pyramid::{
    max_zoom, LevelFailure, LevelReport, LevelStatus, PyramidConfig, PyramidPlan, PyramidReport,
    ResampleFilter, TileMap, DEFAULT_TILE_SIZE,
};
pub use source::{decode_image, FileImageSource, ImageSource, MemoryImageSource};
pub use tile::{TileCoord, TileEncoder, TileFormat};
