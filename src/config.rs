//! Command-line configuration for map-cutter.
//!
//! This module provides the CLI surface of the binary:
//! - Command-line arguments via clap
//! - Environment variables with `MAPCUTTER_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Environment Variables
//!
//! - `MAPCUTTER_INPUT` - Source image path (required)
//! - `MAPCUTTER_OUTPUT` - Output directory (default: output)
//! - `MAPCUTTER_TILE_SIZE` - Tile edge length in pixels (default: 256)
//! - `MAPCUTTER_FILTER` - Resampling filter (default: bilinear)
//! - `MAPCUTTER_FORMAT` - Tile format, png or jpeg (default: png)
//! - `MAPCUTTER_JPEG_QUALITY` - JPEG quality when format is jpeg (default: 80)

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::pyramid::{PyramidConfig, ResampleFilter, DEFAULT_TILE_SIZE};
use crate::tile::{is_valid_quality, TileFormat, DEFAULT_JPEG_QUALITY};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Tile codec selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Lossless PNG tiles
    Png,
    /// JPEG tiles (no alpha)
    Jpeg,
}

/// How the final summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SummaryFormat {
    /// Log lines only
    #[default]
    Text,
    /// Pretty-printed JSON report on stdout
    Json,
}

/// map-cutter - Cut a large map image into zoomable tiles.
///
/// Reads one square image whose side is the tile size times a power of two
/// and writes every tile of every zoom level as `{zoom}_{x}_{y}.{ext}`.
#[derive(Parser, Debug, Clone)]
#[command(name = "map-cutter")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Source image (PNG or JPEG).
    #[arg(short, long = "in", env = "MAPCUTTER_INPUT")]
    pub input: PathBuf,

    /// Directory tiles are written to. Created if missing.
    #[arg(short, long = "out", default_value = DEFAULT_OUTPUT_DIR, env = "MAPCUTTER_OUTPUT")]
    pub output: PathBuf,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE, env = "MAPCUTTER_TILE_SIZE")]
    pub tile_size: u32,

    /// Interpolation used between zoom levels.
    #[arg(long, value_enum, default_value_t = ResampleFilter::Bilinear, env = "MAPCUTTER_FILTER")]
    pub filter: ResampleFilter,

    /// Tile output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Png, env = "MAPCUTTER_FORMAT")]
    pub format: OutputFormat,

    /// JPEG quality (1-100), only used with `--format jpeg`.
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, env = "MAPCUTTER_JPEG_QUALITY")]
    pub jpeg_quality: u8,

    /// Summary printed when the run ends.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.as_os_str().is_empty() {
            return Err("Input image is required. Set --in or MAPCUTTER_INPUT".to_string());
        }

        if self.output.as_os_str().is_empty() {
            return Err("Output directory must not be empty".to_string());
        }

        if self.tile_size == 0 {
            return Err("tile_size must be greater than 0".to_string());
        }

        if self.format == OutputFormat::Jpeg && !is_valid_quality(self.jpeg_quality) {
            return Err("jpeg_quality must be between 1 and 100".to_string());
        }

        Ok(())
    }

    /// Tile format selected by `--format` and `--jpeg-quality`.
    pub fn tile_format(&self) -> TileFormat {
        match self.format {
            OutputFormat::Png => TileFormat::Png,
            OutputFormat::Jpeg => TileFormat::Jpeg {
                quality: self.jpeg_quality,
            },
        }
    }

    /// Pyramid settings for this run.
    pub fn pyramid_config(&self) -> PyramidConfig {
        PyramidConfig::default()
            .with_tile_size(self.tile_size)
            .with_filter(self.filter)
            .with_format(self.tile_format())
    }
}

// =============================================================================
// Tests
// =============================================================================
