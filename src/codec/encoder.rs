//! Raster codec: decode a source image, render one window of it.
//!
//! # Design Decisions
//!
//! - **Full-width windows only**: a slice is a band of rows, so the render
//!   rectangle is always `x = 0, width = image width`.
//!
//! - **JPEG flattening**: JPEG has no alpha channel. Pixels are composited
//!   over the requested background color before encoding, so transparent
//!   regions come out as that color instead of black.
//!
//! - **PNG keeps alpha**: slices are written as RGBA8 regardless of the
//!   source color type.

use std::io::Cursor;
use std::sync::Arc;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage, RgbaImage, Rgba};

use crate::error::{DecodeError, RenderError};

use super::detect::{detect_format, SourceFormat};
use super::format::{jpeg_quality, BackgroundColor, OutputFormat};

// =============================================================================
// Types
// =============================================================================

/// A decoded source image shared between render calls.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: Arc<DynamicImage>,
    format: SourceFormat,
}

impl DecodedImage {
    pub fn new(pixels: DynamicImage, format: SourceFormat) -> Self {
        Self {
            pixels: Arc::new(pixels),
            format,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Format the source was decoded from.
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}

/// Pixel rectangle of the source to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    /// A full-width band of `height` rows starting at row `y`.
    pub fn band(y: u32, width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y,
            width,
            height,
        }
    }
}

/// Per-render encoding settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub format: OutputFormat,

    /// Quality fraction, used for JPEG only
    pub quality: f32,

    /// Fill under transparent pixels, used for JPEG only
    pub background: BackgroundColor,
}

// =============================================================================
// RasterCodec
// =============================================================================

/// Decoding and window rendering.
///
/// Implementations must be stateless with respect to individual calls so
/// that slices can be rendered on any thread.
pub trait RasterCodec: Send + Sync {
    /// Decode raw file bytes.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;

    /// Extract `rect` from `image` and encode it.
    fn render(
        &self,
        image: &DecodedImage,
        rect: SourceRect,
        settings: &RenderSettings,
    ) -> Result<Bytes, RenderError>;
}

// =============================================================================
// ImageCodec
// =============================================================================

/// [`RasterCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Default)]
pub struct ImageCodec {}

impl ImageCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self {}
    }
}

impl RasterCodec for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        let format = detect_format(bytes)?;

        let reader = ImageReader::with_format(Cursor::new(bytes), format.image_format());
        let pixels = reader.decode().map_err(|e| DecodeError::Corrupt {
            message: e.to_string(),
        })?;

        Ok(DecodedImage::new(pixels, format))
    }

    fn render(
        &self,
        image: &DecodedImage,
        rect: SourceRect,
        settings: &RenderSettings,
    ) -> Result<Bytes, RenderError> {
        validate_rect(image, rect)?;

        let window = image
            .pixels()
            .crop_imm(rect.x, rect.y, rect.width, rect.height)
            .to_rgba8();

        let mut output = Vec::new();
        match settings.format {
            OutputFormat::Png => {
                DynamicImage::ImageRgba8(window)
                    .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
                    .map_err(|e| RenderError::Encode {
                        message: e.to_string(),
                    })?;
            }
            OutputFormat::Jpeg => {
                let flat = flatten(&window, settings.background.rgb());
                let mut encoder =
                    JpegEncoder::new_with_quality(&mut output, jpeg_quality(settings.quality));
                encoder
                    .encode_image(&flat)
                    .map_err(|e| RenderError::Encode {
                        message: e.to_string(),
                    })?;
            }
        }

        Ok(Bytes::from(output))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn validate_rect(image: &DecodedImage, rect: SourceRect) -> Result<(), RenderError> {
    if rect.width == 0 || rect.height == 0 {
        return Err(RenderError::ZeroArea {
            width: rect.width,
            height: rect.height,
        });
    }

    let fits_rows = rect.y as u64 + rect.height as u64 <= image.height() as u64;
    let fits_cols = rect.x as u64 + rect.width as u64 <= image.width() as u64;
    if !fits_rows || !fits_cols {
        return Err(RenderError::OutOfBounds {
            y: rect.y,
            height: rect.height,
            image_height: image.height(),
        });
    }

    Ok(())
}

/// Composite RGBA pixels over an opaque color.
fn flatten(window: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    let Rgb([bg_r, bg_g, bg_b]) = background;
    RgbImage::from_fn(window.width(), window.height(), |x, y| {
        let Rgba([r, g, b, a]) = *window.get_pixel(x, y);
        let blend = |fg: u8, bg: u8| -> u8 {
            let a = a as u32;
            ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
        };
        Rgb([blend(r, bg_r), blend(g, bg_g), blend(b, bg_b)])
    })
}

// =============================================================================
// Tests
// =============================================================================
