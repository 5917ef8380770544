//! In-memory tile sink.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;

use crate::error::HandlerError;
use crate::tile::TileCoord;

use super::TileHandler;

/// Collects every tile it receives, keyed by coordinate.
///
/// The number of calls is tracked separately from the number of stored tiles,
/// so a coordinate delivered twice shows up as `call_count() > len()`.
#[derive(Debug, Default)]
pub struct MemoryTileHandler {
    tiles: Mutex<BTreeMap<TileCoord, Bytes>>,
    calls: AtomicUsize,
}

impl MemoryTileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<TileCoord, Bytes>> {
        // A poisoned map still holds every tile stored before the panic.
        self.tiles.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of `handle_tile` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of distinct coordinates stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Encoded tile at `coord`, if received.
    pub fn get(&self, coord: TileCoord) -> Option<Bytes> {
        self.lock().get(&coord).cloned()
    }

    /// Sorted coordinates of all received tiles.
    pub fn coords(&self) -> Vec<TileCoord> {
        self.lock().keys().copied().collect()
    }

    /// Sorted coordinates received for one zoom level.
    pub fn coords_at(&self, zoom: u32) -> Vec<TileCoord> {
        self.lock()
            .keys()
            .filter(|coord| coord.zoom == zoom)
            .copied()
            .collect()
    }

    /// Copy of every received tile.
    pub fn snapshot(&self) -> BTreeMap<TileCoord, Bytes> {
        self.lock().clone()
    }
}

impl TileHandler for MemoryTileHandler {
    fn handle_tile(&self, tile: Bytes, coord: TileCoord) -> Result<(), HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lock().insert(coord, tile);
        Ok(())
    }
}
