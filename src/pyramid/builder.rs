//! Pyramid builder.
//!
//! [`TileMap`] decodes the source once, builds one raster per zoom level and
//! keeps them for the lifetime of the map. Levels are built from the native
//! resolution downward, each one resampled from the level above it rather
//! than from the original, so every step is an exact halving.

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use image::{DynamicImage, RgbaImage};
use tracing::{debug, info};

use crate::error::{PyramidError, TileError};
use crate::source::{decode_image, ImageSource};
use crate::tile::{TileCoord, TileEncoder};

use super::config::PyramidConfig;
use super::plan::{tiles_per_side, validate_source, PyramidPlan};
use super::resample::resample;
use super::slicer;

/// A decoded map image and all of its zoom level rasters.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use map_cutter::handler::FileTileHandler;
/// use map_cutter::pyramid::{PyramidConfig, TileMap};
/// use map_cutter::source::FileImageSource;
/// use map_cutter::tile::TileFormat;
///
/// # async fn run() -> Result<(), map_cutter::PyramidError> {
/// let source = FileImageSource::new("world.png");
/// let map = TileMap::open(&source, PyramidConfig::default()).await?;
///
/// let handler = Arc::new(FileTileHandler::new("output", TileFormat::Png));
/// let report = map.cut_all_tiles(handler).await?;
/// println!("{} tiles written", report.tiles_written());
/// # Ok(())
/// # }
/// ```
pub struct TileMap {
    config: PyramidConfig,
    plan: PyramidPlan,

    /// Level rasters indexed by zoom
    levels: Vec<Arc<RgbaImage>>,

    encoder: TileEncoder,
}

impl TileMap {
    /// Read, decode and build a pyramid from `source`.
    pub async fn open<S>(source: &S, config: PyramidConfig) -> Result<Self, PyramidError>
    where
        S: ImageSource + ?Sized,
    {
        debug!("Reading source {}", source.identifier());
        let image = source.decode().await?;
        Self::from_image(image, config)
    }

    /// Decode `data` and build a pyramid from it.
    pub fn from_bytes(data: &[u8], config: PyramidConfig) -> Result<Self, PyramidError> {
        let image = decode_image(data)?;
        Self::from_image(image, config)
    }

    /// Build a pyramid from an already decoded image.
    ///
    /// # Errors
    ///
    /// - [`PyramidError::InvalidConfig`] if `config` does not validate
    /// - [`PyramidError::UnsupportedDimensions`] if the image is not square or
    ///   its side is not `tile_size * 2^k`
    pub fn from_image(image: DynamicImage, config: PyramidConfig) -> Result<Self, PyramidError> {
        config.validate()?;

        let source = image.into_rgba8();
        let (width, height) = source.dimensions();
        validate_source(width, height, config.tile_size)?;

        let plan = PyramidPlan::new(width, config.tile_size);
        let encoder = TileEncoder::new(config.format);
        info!(
            "Source {}x{}, tile size {}, max zoom {}, {} tiles",
            width,
            height,
            config.tile_size,
            plan.max_zoom(),
            encoder.format().extension()
        );

        let levels = build_levels(source, &plan, &config);

        Ok(Self {
            config,
            plan,
            levels,
            encoder,
        })
    }

    /// Finest zoom level (native resolution).
    pub fn max_zoom(&self) -> u32 {
        self.plan.max_zoom()
    }

    /// Side of the decoded source image in pixels.
    pub fn source_resolution(&self) -> u32 {
        self.plan.source_res()
    }

    pub fn tile_size(&self) -> u32 {
        self.config.tile_size
    }

    pub fn config(&self) -> &PyramidConfig {
        &self.config
    }

    pub fn plan(&self) -> &PyramidPlan {
        &self.plan
    }

    pub(crate) fn encoder(&self) -> TileEncoder {
        self.encoder
    }

    /// Raster for zoom level `zoom`.
    pub fn level(&self, zoom: u32) -> Result<&Arc<RgbaImage>, TileError> {
        self.levels
            .get(zoom as usize)
            .ok_or(TileError::InvalidZoom {
                zoom,
                max_zoom: self.max_zoom(),
            })
    }

    /// `(zoom, raster)` pairs from coarsest to finest.
    pub fn levels(&self) -> impl DoubleEndedIterator<Item = (u32, &Arc<RgbaImage>)> {
        self.levels
            .iter()
            .enumerate()
            .map(|(zoom, raster)| (zoom as u32, raster))
    }

    /// Crop the tile at `coord` without encoding it.
    pub fn tile_image(&self, coord: TileCoord) -> Result<RgbaImage, TileError> {
        let raster = self.level(coord.zoom)?;

        let per_side = tiles_per_side(coord.zoom);
        if coord.x >= per_side || coord.y >= per_side {
            return Err(TileError::OutOfBounds {
                zoom: coord.zoom,
                x: coord.x,
                y: coord.y,
                tiles_per_side: per_side,
            });
        }

        slicer::cut_tile(raster, self.config.tile_size, coord)
    }

    /// Cut and encode a single tile.
    pub fn cut_tile_bytes(&self, coord: TileCoord) -> Result<Bytes, TileError> {
        let tile = self.tile_image(coord)?;
        self.encoder.encode(&tile)
    }

    /// Cut a single tile and write its encoded bytes to `writer`.
    ///
    /// Nothing is written if the coordinate is invalid.
    pub fn cut_tile<W: Write>(&self, writer: W, coord: TileCoord) -> Result<(), TileError> {
        let tile = self.tile_image(coord)?;
        self.encoder.encode_to(&tile, writer)
    }
}

impl fmt::Debug for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileMap")
            .field("config", &self.config)
            .field("plan", &self.plan)
            .field("levels", &self.levels.len())
            .finish()
    }
}

/// Build level rasters from finest to coarsest, returned indexed by zoom.
fn build_levels(
    source: RgbaImage,
    plan: &PyramidPlan,
    config: &PyramidConfig,
) -> Vec<Arc<RgbaImage>> {
    let mut levels = Vec::with_capacity(plan.level_count());
    let mut working = Arc::new(source);

    for zoom in (0..=plan.max_zoom()).rev() {
        let target = plan.level_resolution(zoom);

        if working.width() != target {
            let started = Instant::now();
            let resized = resample(&working, target, config.filter);
            debug!(
                "Image resized {} -> {} in {}ms",
                working.width(),
                target,
                started.elapsed().as_millis()
            );
            working = Arc::new(resized);
        }

        levels.push(Arc::clone(&working));
    }

    levels.reverse();
    levels
}
