//! Tile encoder.
//!
//! Turns cropped RGBA tiles into an output byte stream.
//!
//! # Design Decisions
//!
//! - **Lossless by default**: Tiles are written as PNG unless the caller
//!   explicitly asks for JPEG. PNG output is byte-for-byte deterministic for a
//!   given tile, so re-running a pyramid yields identical files.
//!
//! - **No resizing**: The encoder never changes tile dimensions. Resampling is
//!   done once per level by the pyramid builder.
//!
//! - **Alpha handling**: JPEG has no alpha channel, so JPEG tiles drop it.

use std::io::Write;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use serde::Serialize;

use crate::error::TileError;

/// Default JPEG quality (1-100).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Minimum allowed JPEG quality.
pub const MIN_JPEG_QUALITY: u8 = 1;

/// Maximum allowed JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

// =============================================================================
// Tile Format
// =============================================================================

/// Output codec for encoded tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase", tag = "codec")]
pub enum TileFormat {
    /// Lossless PNG (RGBA)
    #[default]
    Png,

    /// Lossy JPEG (RGB) at the given quality
    Jpeg { quality: u8 },
}

impl TileFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg { .. } => "jpg",
        }
    }
}

// =============================================================================
// Tile Encoder
// =============================================================================

/// Encoder for cropped tiles.
///
/// # Example
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use map_cutter::tile::{TileEncoder, TileFormat};
///
/// let encoder = TileEncoder::new(TileFormat::Png);
/// let tile = RgbaImage::from_pixel(16, 16, Rgba([10, 20, 30, 255]));
///
/// let png = encoder.encode(&tile).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TileEncoder {
    format: TileFormat,
}

impl TileEncoder {
    /// Create an encoder for the given output format.
    pub fn new(format: TileFormat) -> Self {
        let format = match format {
            TileFormat::Jpeg { quality } => TileFormat::Jpeg {
                quality: clamp_quality(quality),
            },
            TileFormat::Png => TileFormat::Png,
        };
        Self { format }
    }

    /// The output format of this encoder.
    pub fn format(&self) -> TileFormat {
        self.format
    }

    /// Encode a tile into a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TileError::EncodeError`] if the codec rejects the tile.
    pub fn encode(&self, tile: &RgbaImage) -> Result<Bytes, TileError> {
        let mut output = Vec::new();
        self.encode_to(tile, &mut output)?;
        Ok(Bytes::from(output))
    }

    /// Encode a tile straight into `writer`.
    pub fn encode_to<W: Write>(&self, tile: &RgbaImage, writer: W) -> Result<(), TileError> {
        let (width, height) = tile.dimensions();

        let result = match self.format {
            TileFormat::Png => PngEncoder::new(writer).write_image(
                tile.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            TileFormat::Jpeg { quality } => {
                let rgb = DynamicImage::ImageRgba8(tile.clone()).into_rgb8();
                JpegEncoder::new_with_quality(writer, quality).encode_image(&rgb)
            }
        };

        result.map_err(|e| TileError::EncodeError {
            message: e.to_string(),
        })
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Validate JPEG quality parameter.
///
/// Returns `true` if quality is in the valid range (1-100).
#[inline]
pub fn is_valid_quality(quality: u8) -> bool {
    (MIN_JPEG_QUALITY..=MAX_JPEG_QUALITY).contains(&quality)
}

/// Clamp quality to valid range.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_JPEG_QUALITY, MAX_JPEG_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
