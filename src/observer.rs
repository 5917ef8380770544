//! Progress and diagnostics sink for pyramid generation.
//!
//! The dispatch layer never logs or counts through global state. Every event
//! goes to a [`PyramidObserver`] handed in by the caller:
//!
//! - [`TracingObserver`]: forwards events to `tracing` (used by the binary)
//! - [`NoopObserver`]: discards everything
//!
//! Observers are shared by all level workers, so implementations must be
//! `Send + Sync`. Calls for one level always come from the same worker.

use tracing::{debug, error, info, warn};

use crate::error::TileError;
use crate::pyramid::{LevelReport, LevelStatus, PyramidReport};
use crate::tile::TileCoord;

/// Receiver for pyramid generation events.
///
/// All methods have empty default bodies so implementations only override
/// what they need.
pub trait PyramidObserver: Send + Sync {
    /// A level worker is about to cut its first tile.
    fn level_started(&self, _zoom: u32, _tiles_expected: u64) {}

    /// A tile was encoded and accepted by the handler.
    fn tile_cut(&self, _coord: TileCoord) {}

    /// A tile failed; its level stops after this call.
    fn tile_failed(&self, _coord: TileCoord, _error: &TileError) {}

    /// A level worker returned.
    fn level_finished(&self, _report: &LevelReport) {}

    /// Every level worker has returned.
    fn pyramid_finished(&self, _report: &PyramidReport) {}
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PyramidObserver for NoopObserver {}

/// Observer that reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl PyramidObserver for TracingObserver {
    fn level_started(&self, zoom: u32, tiles_expected: u64) {
        info!("Beginning zoom {} ({} tiles)", zoom, tiles_expected);
    }

    fn tile_cut(&self, coord: TileCoord) {
        debug!("Cut tile {}", coord);
    }

    fn tile_failed(&self, coord: TileCoord, error: &TileError) {
        warn!("Tile {} failed: {}", coord, error);
    }

    fn level_finished(&self, report: &LevelReport) {
        match report.status {
            LevelStatus::Complete => info!(
                "{} tiles cut for zoom {} in {}ms",
                report.tiles_written, report.zoom, report.elapsed_ms
            ),
            LevelStatus::Failed => warn!(
                "Zoom {} stopped after {} of {} tiles",
                report.zoom, report.tiles_written, report.tiles_expected
            ),
            LevelStatus::Cancelled => warn!(
                "Zoom {} cancelled after {} of {} tiles",
                report.zoom, report.tiles_written, report.tiles_expected
            ),
            LevelStatus::Panicked => error!(
                "Zoom {} worker panicked after {} of {} tiles",
                report.zoom, report.tiles_written, report.tiles_expected
            ),
        }
    }

    fn pyramid_finished(&self, report: &PyramidReport) {
        info!(
            "Pyramid finished: {} of {} tiles across {} levels in {}ms",
            report.tiles_written(),
            report.tiles_expected(),
            report.levels.len(),
            report.elapsed_ms
        );
    }
}
