//! Tile sinks.
//!
//! A [`TileHandler`] receives every encoded tile produced by
//! [`TileMap::cut_all_tiles`](crate::pyramid::TileMap::cut_all_tiles) together
//! with its grid position. What happens next (disk, memory, network) is up to
//! the implementation:
//!
//! - [`FileTileHandler`]: writes `{zoom}_{x}_{y}.{ext}` under an output directory
//! - [`MemoryTileHandler`]: keeps tiles in a map, mostly for tests and embedding
//! - [`FnHandler`]: wraps a closure
//!
//! # Concurrency
//!
//! Handlers are invoked from one blocking worker per zoom level, so several
//! levels call `handle_tile` at the same time. Calls for the same level are
//! sequential. Implementations may block on I/O but should not spawn
//! unbounded work of their own.

mod file;
mod memory;

use bytes::Bytes;

use crate::error::HandlerError;
use crate::tile::TileCoord;

pub use file::FileTileHandler;
pub use memory::MemoryTileHandler;

/// Consumer of encoded tiles.
pub trait TileHandler: Send + Sync {
    /// Accept one encoded tile.
    ///
    /// Returning an error stops the tile's level; other levels keep going.
    fn handle_tile(&self, tile: Bytes, coord: TileCoord) -> Result<(), HandlerError>;
}

/// Handler backed by a closure.
///
/// # Example
///
/// ```
/// use map_cutter::handler::{from_fn, TileHandler};
/// use map_cutter::tile::TileCoord;
///
/// let handler = from_fn(|tile, coord| {
///     println!("{}: {} bytes", coord, tile.len());
///     Ok(())
/// });
/// handler.handle_tile(bytes::Bytes::new(), TileCoord::new(0, 0, 0)).unwrap();
/// ```
pub struct FnHandler<F> {
    f: F,
}

impl<F> TileHandler for FnHandler<F>
where
    F: Fn(Bytes, TileCoord) -> Result<(), HandlerError> + Send + Sync,
{
    fn handle_tile(&self, tile: Bytes, coord: TileCoord) -> Result<(), HandlerError> {
        (self.f)(tile, coord)
    }
}

/// Wrap a closure as a [`TileHandler`].
pub fn from_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(Bytes, TileCoord) -> Result<(), HandlerError> + Send + Sync,
{
    FnHandler { f }
}
