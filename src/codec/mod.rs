//! Raster codec layer.
//!
//! Everything that touches pixels lives here: format sniffing, decoding the
//! source, and rendering one band of rows into an encoded slice.
//!
//! ```text
//! ┌──────────────┐   detect_format   ┌──────────────┐   render(rect)   ┌──────────┐
//! │ upload bytes │ ────────────────▶ │ DecodedImage │ ───────────────▶ │  Bytes   │
//! └──────────────┘      decode       └──────────────┘   png / jpeg     └──────────┘
//! ```
//!
//! # Components
//!
//! - [`RasterCodec`]: trait used by the slice service
//! - [`ImageCodec`]: implementation on top of the `image` crate
//! - [`OutputFormat`], [`BackgroundColor`]: per-split encoding settings
//! - [`detect_format`]: magic-byte sniffing of the upload

mod detect;
mod encoder;
mod format;

pub use detect::{detect_format, SourceFormat};
pub use encoder::{DecodedImage, ImageCodec, RasterCodec, RenderSettings, SourceRect};
pub use format::{
    is_valid_quality, jpeg_quality, BackgroundColor, OutputFormat, DEFAULT_QUALITY, MAX_QUALITY,
    MIN_QUALITY,
};
