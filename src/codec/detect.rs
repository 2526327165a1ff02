//! Source format detection.
//!
//! Looks at the leading magic bytes of an upload to decide whether it is an
//! image we can decode. Anything else is reported as
//! [`DecodeError::UnsupportedFormat`], which maps to HTTP 415.

use image::ImageFormat;

use crate::error::DecodeError;

/// Decodable source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    WebP,
}

impl SourceFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            SourceFormat::Png => "PNG",
            SourceFormat::Jpeg => "JPEG",
            SourceFormat::Gif => "GIF",
            SourceFormat::Bmp => "BMP",
            SourceFormat::WebP => "WebP",
        }
    }

    /// The matching `image` crate format.
    pub const fn image_format(&self) -> ImageFormat {
        match self {
            SourceFormat::Png => ImageFormat::Png,
            SourceFormat::Jpeg => ImageFormat::Jpeg,
            SourceFormat::Gif => ImageFormat::Gif,
            SourceFormat::Bmp => ImageFormat::Bmp,
            SourceFormat::WebP => ImageFormat::WebP,
        }
    }
}

/// Detect the format of an uploaded image from its magic bytes.
///
/// # Errors
///
/// * `DecodeError::Empty` - no bytes at all
/// * `DecodeError::UnsupportedFormat` - unknown signature, or a known image
///   format this build cannot decode
pub fn detect_format(bytes: &[u8]) -> Result<SourceFormat, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let format = image::guess_format(bytes).map_err(|_| DecodeError::UnsupportedFormat {
        reason: "unrecognized image signature".to_string(),
    })?;

    match format {
        ImageFormat::Png => Ok(SourceFormat::Png),
        ImageFormat::Jpeg => Ok(SourceFormat::Jpeg),
        ImageFormat::Gif => Ok(SourceFormat::Gif),
        ImageFormat::Bmp => Ok(SourceFormat::Bmp),
        ImageFormat::WebP => Ok(SourceFormat::WebP),
        other => Err(DecodeError::UnsupportedFormat {
            reason: format!("{:?} images are not supported", other),
        }),
    }
}
