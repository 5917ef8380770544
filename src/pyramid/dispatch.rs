//! Whole-pyramid tile generation.
//!
//! One blocking worker is spawned per zoom level and every worker starts
//! immediately. Inside a level the grid is walked sequentially, x-major then
//! y, so a level's tiles always reach the handler in the same order.
//!
//! ```text
//!                      cut_all_tiles()
//!                            │
//!        ┌─────────────┬─────┴───────┬─────────────┐
//!        ▼             ▼             ▼             ▼
//!   ┌─────────┐   ┌─────────┐   ┌─────────┐   ┌─────────┐
//!   │ zoom 0  │   │ zoom 1  │   │   ...   │   │ zoom N  │   spawn_blocking
//!   │ 1 tile  │   │ 4 tiles │   │         │   │ 4^N     │
//!   └────┬────┘   └────┬────┘   └────┬────┘   └────┬────┘
//!        │  cut → encode → handler.handle_tile()   │
//!        └─────────────┴──────┬──────┴─────────────┘
//!                             ▼
//!                   join → PyramidReport
//! ```
//!
//! Levels are independent fault domains. A failed tile stops the rest of its
//! own level only. Once every worker has returned, the per-level outcomes are
//! folded into a [`PyramidReport`] and any failure turns the whole call into
//! [`PyramidError::Incomplete`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::{PyramidError, TileError};
use crate::handler::TileHandler;
use crate::observer::{PyramidObserver, TracingObserver};
use crate::tile::{TileCoord, TileEncoder};

use super::builder::TileMap;
use super::plan::{tiles_at_level, tiles_per_side};
use super::slicer;

// =============================================================================
// Reports
// =============================================================================

/// How a level worker ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelStatus {
    /// Every tile of the grid reached the handler
    Complete,

    /// A tile failed and the rest of the grid was skipped
    Failed,

    /// The cancellation token fired before the grid was done
    Cancelled,

    /// The worker panicked; `tiles_written` counts the tiles delivered before
    Panicked,
}

/// Outcome of one zoom level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelReport {
    pub zoom: u32,

    /// Edge length of the level raster in pixels
    pub resolution: u32,

    pub tiles_expected: u64,
    pub tiles_written: u64,
    pub status: LevelStatus,
    pub elapsed_ms: u64,
}

/// The tile that stopped a level.
#[derive(Debug, Clone)]
pub struct LevelFailure {
    pub coord: TileCoord,
    pub error: TileError,
}

impl LevelFailure {
    pub fn zoom(&self) -> u32 {
        self.coord.zoom
    }
}

/// Outcome of a whole-pyramid run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PyramidReport {
    pub source_resolution: u32,
    pub tile_size: u32,
    pub max_zoom: u32,

    /// One entry per level, ordered by zoom
    pub levels: Vec<LevelReport>,

    pub elapsed_ms: u64,
}

impl PyramidReport {
    /// Tiles delivered to the handler across all levels.
    pub fn tiles_written(&self) -> u64 {
        self.levels.iter().map(|l| l.tiles_written).sum()
    }

    /// Tiles a complete run delivers.
    pub fn tiles_expected(&self) -> u64 {
        self.levels.iter().map(|l| l.tiles_expected).sum()
    }

    /// Whether every level finished its grid.
    pub fn is_complete(&self) -> bool {
        self.levels
            .iter()
            .all(|l| l.status == LevelStatus::Complete)
    }

    /// Report for one level.
    pub fn level(&self, zoom: u32) -> Option<&LevelReport> {
        self.levels.iter().find(|l| l.zoom == zoom)
    }
}

// =============================================================================
// Level Worker
// =============================================================================

struct LevelJob<H: ?Sized> {
    zoom: u32,
    raster: Arc<RgbaImage>,
    tile_size: u32,
    encoder: TileEncoder,
    handler: Arc<H>,
    observer: Arc<dyn PyramidObserver>,
    cancel: CancellationToken,

    /// Tiles delivered so far, shared with the dispatcher
    progress: Arc<AtomicU64>,
}

struct LevelOutcome {
    report: LevelReport,
    failure: Option<LevelFailure>,
}

impl<H: TileHandler + ?Sized> LevelJob<H> {
    fn run(self) -> LevelOutcome {
        let started = Instant::now();
        let per_side = tiles_per_side(self.zoom);
        let tiles_expected = tiles_at_level(self.zoom);

        self.observer.level_started(self.zoom, tiles_expected);

        let mut tiles_written = 0u64;
        let mut status = LevelStatus::Complete;
        let mut failure = None;

        'grid: for x in 0..per_side {
            for y in 0..per_side {
                if self.cancel.is_cancelled() {
                    status = LevelStatus::Cancelled;
                    break 'grid;
                }

                let coord = TileCoord::new(self.zoom, x, y);
                match self.cut_one(coord) {
                    Ok(()) => {
                        tiles_written += 1;
                        self.progress.store(tiles_written, Ordering::Relaxed);
                        self.observer.tile_cut(coord);
                    }
                    Err(error) => {
                        self.observer.tile_failed(coord, &error);
                        status = LevelStatus::Failed;
                        failure = Some(LevelFailure { coord, error });
                        break 'grid;
                    }
                }
            }
        }

        let report = LevelReport {
            zoom: self.zoom,
            resolution: self.raster.width(),
            tiles_expected,
            tiles_written,
            status,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        self.observer.level_finished(&report);

        LevelOutcome { report, failure }
    }

    fn cut_one(&self, coord: TileCoord) -> Result<(), TileError> {
        let tile = slicer::cut_tile(&self.raster, self.tile_size, coord)?;
        let data = self.encoder.encode(&tile)?;
        self.handler.handle_tile(data, coord)?;
        Ok(())
    }
}

// =============================================================================
// Dispatch
// =============================================================================

impl TileMap {
    /// Cut every tile of every level and hand each one to `handler`.
    ///
    /// Progress is reported through [`TracingObserver`] and the run cannot be
    /// cancelled. See [`cut_all_tiles_with`](Self::cut_all_tiles_with).
    pub async fn cut_all_tiles<H>(&self, handler: Arc<H>) -> Result<PyramidReport, PyramidError>
    where
        H: TileHandler + ?Sized + 'static,
    {
        self.cut_all_tiles_with(
            handler,
            Arc::new(TracingObserver::new()),
            CancellationToken::new(),
        )
        .await
    }

    /// Cut every tile of every level with an explicit observer and
    /// cancellation token.
    ///
    /// Returns once all level workers have finished.
    ///
    /// # Errors
    ///
    /// - [`PyramidError::Incomplete`] if any level stopped on a failed tile;
    ///   the report still covers the levels that succeeded
    /// - [`PyramidError::Cancelled`] if `cancel` fired before all levels were
    ///   done
    /// - [`PyramidError::WorkerPanicked`] if a level worker panicked (usually
    ///   a panicking handler); the report and failures of every other level
    ///   are still attached
    pub async fn cut_all_tiles_with<H>(
        &self,
        handler: Arc<H>,
        observer: Arc<dyn PyramidObserver>,
        cancel: CancellationToken,
    ) -> Result<PyramidReport, PyramidError>
    where
        H: TileHandler + ?Sized + 'static,
    {
        let started = Instant::now();
        let mut handles = Vec::with_capacity(self.plan().level_count());

        for (zoom, raster) in self.levels().rev() {
            let progress = Arc::new(AtomicU64::new(0));
            let job = LevelJob {
                zoom,
                raster: Arc::clone(raster),
                tile_size: self.tile_size(),
                encoder: self.encoder(),
                handler: Arc::clone(&handler),
                observer: Arc::clone(&observer),
                cancel: cancel.clone(),
                progress: Arc::clone(&progress),
            };
            let handle = tokio::task::spawn_blocking(move || job.run());
            handles.push((zoom, raster.width(), progress, handle));
        }

        // Join every worker before looking at any result.
        let mut outcomes = Vec::with_capacity(handles.len());
        let mut panicked = None;
        for (zoom, resolution, progress, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    error!("Worker for zoom {} did not finish: {}", zoom, e);
                    let report = LevelReport {
                        zoom,
                        resolution,
                        tiles_expected: tiles_at_level(zoom),
                        tiles_written: progress.load(Ordering::Relaxed),
                        status: LevelStatus::Panicked,
                        elapsed_ms: started.elapsed().as_millis() as u64,
                    };
                    observer.level_finished(&report);
                    outcomes.push(LevelOutcome {
                        report,
                        failure: None,
                    });
                    panicked.get_or_insert((zoom, e.to_string()));
                }
            }
        }

        outcomes.sort_by_key(|o| o.report.zoom);

        let mut levels = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            levels.push(outcome.report);
            failures.extend(outcome.failure);
        }

        let report = PyramidReport {
            source_resolution: self.source_resolution(),
            tile_size: self.tile_size(),
            max_zoom: self.max_zoom(),
            levels,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        observer.pyramid_finished(&report);

        for failure in &failures {
            error!("Zoom {} failed at tile {}: {}", failure.zoom(), failure.coord, failure.error);
        }

        if let Some((zoom, message)) = panicked {
            return Err(PyramidError::WorkerPanicked {
                zoom,
                message,
                report,
                failures,
            });
        }

        if !failures.is_empty() {
            return Err(PyramidError::Incomplete { report, failures });
        }

        if !report.is_complete() {
            return Err(PyramidError::Cancelled { report });
        }

        Ok(report)
    }
}
