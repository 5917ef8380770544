//! Source image access.
//!
//! An [`ImageSource`] hands the pyramid builder the raw encoded bytes of the
//! map image. Decoding happens once, here, before any level is built:
//!
//! ```text
//! ┌──────────────────┐   read_all()   ┌──────────┐  decode()  ┌──────────┐
//! │   ImageSource    │ ─────────────▶ │  Bytes   │ ─────────▶ │  Raster  │
//! │ (file / memory)  │                └──────────┘            └──────────┘
//! └──────────────────┘
//! ```
//!
//! PNG and JPEG sources are supported; the format is sniffed from the bytes.

mod file;
mod memory;

use std::io::Cursor;

use async_trait::async_trait;
use bytes::Bytes;
use image::{DynamicImage, ImageReader};

use crate::error::{IoError, PyramidError};

pub use file::FileImageSource;
pub use memory::MemoryImageSource;

/// Provider of an encoded source image.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Read the complete encoded image.
    async fn read_all(&self) -> Result<Bytes, IoError>;

    /// Identifier for logging (a path, a URL, a label).
    fn identifier(&self) -> &str;

    /// Read and decode the image.
    ///
    /// Fails with [`PyramidError::Io`] if the bytes cannot be read and
    /// [`PyramidError::Decode`] if they are not a supported raster format.
    async fn decode(&self) -> Result<DynamicImage, PyramidError> {
        let data = self.read_all().await?;
        decode_image(&data)
    }
}

/// Decode an encoded raster image, sniffing its format.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, PyramidError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| PyramidError::Decode {
            message: e.to_string(),
        })?;

    if reader.format().is_none() {
        return Err(PyramidError::Decode {
            message: "unrecognized image format".to_string(),
        });
    }

    reader.decode().map_err(|e| PyramidError::Decode {
        message: e.to_string(),
    })
}
