//! Binary asset transforms

use image::codecs::avif::AvifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::error::ImageFormatHint;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat};
use thiserror::Error;
use tracing::debug;

/// Widest raster image the build emits
pub const MAX_IMAGE_WIDTH: u32 = 2560;

/// Failure of a single file's transform; never fatal to the build
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A deterministic content transform applied to one file
pub trait Transform: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    fn apply(&self, input: &[u8]) -> Result<Vec<u8>, TransformError>;
}

/// Target encoding of a raster image, chosen from its source extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterEncoding {
    Jpeg { quality: u8 },
    Png,
    Avif { quality: u8 },
    Webp,
    /// Unrecognized extension; bytes pass through untouched
    Passthrough,
}

impl RasterEncoding {
    pub fn for_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => RasterEncoding::Jpeg { quality: 50 },
            "png" => RasterEncoding::Png,
            "avif" => RasterEncoding::Avif { quality: 50 },
            "webp" => RasterEncoding::Webp,
            _ => RasterEncoding::Passthrough,
        }
    }

    fn is_avif(self) -> bool {
        matches!(self, RasterEncoding::Avif { .. })
    }
}

/// Decode, shrink to `max_width` without upscaling
fn decode_fitted(input: &[u8], max_width: u32) -> Result<DynamicImage, TransformError> {
    let img = image::load_from_memory(input).map_err(TransformError::Decode)?;
    if img.width() <= max_width {
        return Ok(img);
    }
    Ok(img.resize(max_width, u32::MAX, FilterType::Lanczos3))
}

/// AVIF recognised but not decodable by the enabled codecs
fn is_undecodable_avif(err: &TransformError) -> bool {
    match err {
        TransformError::Decode(ImageError::Unsupported(e)) => {
            matches!(e.format_hint(), ImageFormatHint::Exact(ImageFormat::Avif))
        }
        _ => false,
    }
}

fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>, TransformError> {
    let mut buf = Vec::new();
    // The pure-Rust WebP encoder is lossless only
    DynamicImage::ImageRgba8(img.to_rgba8())
        .write_with_encoder(WebPEncoder::new_lossless(&mut buf))
        .map_err(TransformError::Encode)?;
    Ok(buf)
}

/// Resize and re-encode a raster image in its own format
#[derive(Debug, Clone, Copy)]
pub struct RasterTransform {
    pub max_width: u32,
    pub encoding: RasterEncoding,
}

impl RasterTransform {
    pub fn for_extension(ext: &str) -> Self {
        Self {
            max_width: MAX_IMAGE_WIDTH,
            encoding: RasterEncoding::for_extension(ext),
        }
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }
}

impl Transform for RasterTransform {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn apply(&self, input: &[u8]) -> Result<Vec<u8>, TransformError> {
        if self.encoding == RasterEncoding::Passthrough {
            return Ok(input.to_vec());
        }
        let img = match decode_fitted(input, self.max_width) {
            Ok(img) => img,
            // Still an AVIF, just not resized or recompressed
            Err(e) if self.encoding.is_avif() && is_undecodable_avif(&e) => {
                debug!("AVIF decoding unavailable, emitting source bytes");
                return Ok(input.to_vec());
            }
            Err(e) => return Err(e),
        };
        let mut buf = Vec::new();
        let written = match self.encoding {
            RasterEncoding::Jpeg { quality } => DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality)),
            RasterEncoding::Png => img.write_with_encoder(PngEncoder::new_with_quality(
                &mut buf,
                CompressionType::Best,
                PngFilter::Adaptive,
            )),
            RasterEncoding::Avif { quality } => DynamicImage::ImageRgba8(img.to_rgba8())
                .write_with_encoder(AvifEncoder::new_with_speed_quality(&mut buf, 6, quality)),
            RasterEncoding::Webp => return encode_webp(&img),
            RasterEncoding::Passthrough => unreachable!("handled above"),
        };
        written.map_err(TransformError::Encode)?;
        Ok(buf)
    }
}

/// Resize any raster image and re-encode it as lossless WebP
#[derive(Debug, Clone, Copy)]
pub struct WebpCopyTransform {
    pub max_width: u32,
}

impl Default for WebpCopyTransform {
    fn default() -> Self {
        Self {
            max_width: MAX_IMAGE_WIDTH,
        }
    }
}

impl Transform for WebpCopyTransform {
    fn name(&self) -> &'static str {
        "webp"
    }

    fn apply(&self, input: &[u8]) -> Result<Vec<u8>, TransformError> {
        let img = decode_fitted(input, self.max_width)?;
        encode_webp(&img)
    }
}
