//! Pyramid construction and tile dispatch.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            ImageSource (bytes)          │
//! └────────────────────┬────────────────────┘
//!                      │ decode
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │                 TileMap                 │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │ PyramidPlan  │  │   resample()    │  │
//! │  │ (zoom math)  │  │ (finest → 0)    │  │
//! │  └──────────────┘  └─────────────────┘  │
//! │        one Arc<RgbaImage> per zoom      │
//! └────────────────────┬────────────────────┘
//!                      │ cut_all_tiles / cut_tile
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │   slicer::cut_tile → TileEncoder        │
//! │   → TileHandler::handle_tile            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`plan`]: resolution arithmetic (`max_zoom`, grid sizes, source checks)
//! - [`resample`](mod@resample): square resize with a configurable filter
//! - [`slicer`]: crops one tile from a level raster
//! - [`TileMap`]: owns the level rasters, cuts single tiles
//! - [`TileMap::cut_all_tiles`]: concurrent per-level generation with an
//!   aggregate [`PyramidReport`]

mod builder;
mod config;
mod dispatch;
pub mod plan;
pub mod resample;
pub mod slicer;

pub use builder::TileMap;
pub use config::{PyramidConfig, DEFAULT_TILE_SIZE};
pub use dispatch::{LevelFailure, LevelReport, LevelStatus, PyramidReport};
pub use plan::{max_zoom, PyramidPlan};
pub use resample::{resample, ResampleFilter};
pub use slicer::cut_tile;
