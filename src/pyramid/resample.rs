//! Square raster resampling.

use clap::ValueEnum;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::Serialize;

/// Interpolation policy used between pyramid levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    /// Nearest neighbour
    Nearest,

    /// Bilinear interpolation
    #[default]
    Bilinear,

    /// Catmull-Rom cubic
    CatmullRom,

    /// Lanczos with a window of 3
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Bilinear => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Resize `raster` to exactly `target_side x target_side`.
///
/// The output is a fresh buffer: every destination pixel is written from the
/// filtered source, nothing is blended with prior contents. A raster that
/// already has the target side is returned as a pixel-identical copy without
/// running the filter.
pub fn resample(raster: &RgbaImage, target_side: u32, filter: ResampleFilter) -> RgbaImage {
    if raster.dimensions() == (target_side, target_side) {
        return raster.clone();
    }
    imageops::resize(raster, target_side, target_side, filter.into())
}
