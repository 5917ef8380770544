//! Local file source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::IoError;

use super::ImageSource;

/// Reads the source image from a local file.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    path: PathBuf,
    identifier: String,
}

impl FileImageSource {
    /// Create a source for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let identifier = path.display().to_string();
        Self { path, identifier }
    }

    /// Path of the source file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn read_all(&self) -> Result<Bytes, IoError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(IoError::NotFound(self.identifier.clone()))
            }
            Err(e) => Err(IoError::Read {
                identifier: self.identifier.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
