//! Filesystem tile sink.

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::error::HandlerError;
use crate::tile::{TileCoord, TileFormat};

use super::TileHandler;

/// Writes each tile to `{output_dir}/{zoom}_{x}_{y}.{ext}`.
///
/// Existing files are overwritten.
#[derive(Debug, Clone)]
pub struct FileTileHandler {
    output_dir: PathBuf,
    extension: &'static str,
}

impl FileTileHandler {
    /// Create a handler writing tiles of `format` into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, format: TileFormat) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: format.extension(),
        }
    }

    /// Directory tiles are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory (and parents) if missing.
    pub fn ensure_output_dir(&self) -> Result<(), HandlerError> {
        fs::create_dir_all(&self.output_dir).map_err(|e| HandlerError::Write {
            path: self.output_dir.clone(),
            message: e.to_string(),
        })
    }

    /// Path a tile is written to.
    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", coord.file_stem(), self.extension))
    }
}

impl TileHandler for FileTileHandler {
    fn handle_tile(&self, tile: Bytes, coord: TileCoord) -> Result<(), HandlerError> {
        let path = self.tile_path(coord);

        fs::write(&path, &tile).map_err(|e| HandlerError::Write {
            path: path.clone(),
            message: e.to_string(),
        })?;

        debug!("Wrote {} ({} bytes)", path.display(), tile.len());
        Ok(())
    }
}
