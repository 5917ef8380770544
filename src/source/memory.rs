//! In-memory source.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::IoError;

use super::ImageSource;

/// Serves an already loaded encoded image.
#[derive(Debug, Clone)]
pub struct MemoryImageSource {
    identifier: String,
    data: Bytes,
}

impl MemoryImageSource {
    pub fn new(identifier: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            identifier: identifier.into(),
            data: data.into(),
        }
    }
}

#[async_trait]
impl ImageSource for MemoryImageSource {
    async fn read_all(&self) -> Result<Bytes, IoError> {
        Ok(self.data.clone())
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
