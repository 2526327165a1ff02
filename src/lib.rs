//! # Image Splitter
//!
//! Cuts a raster image into horizontal slices and bundles them into one ZIP
//! archive.
//!
//! The image height is divided into `N` integer slice heights, every slice
//! spans the full image width, and each one is encoded independently as PNG
//! or JPEG. Slices are named so that a plain lexicographic sort gives the
//! original top-to-bottom order.
//!
//! ## Features
//!
//! - **Two partition modes**: spread the remainder over the first slices
//!   (`balanced`) or put it all on the last slice (`last`)
//! - **Format sniffing**: PNG, JPEG, GIF, BMP and WebP sources detected from
//!   magic bytes
//! - **JPEG flattening**: transparent pixels composited over a configurable
//!   background color
//! - **Deterministic archives**: same slices in, same ZIP bytes out
//! - **HTTP service**: upload an image, download the archive
//!
//! ## Architecture
//!
//! - [`codec`] - Format detection, decoding and per-slice encoding
//! - [`slice`] - Partitioning, naming and the split pipeline
//! - [`archive`] - ZIP packaging
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use image_splitter::{SliceService, SplitMode, SplitOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = Bytes::from(std::fs::read("banner.png")?);
//!     let options = SplitOptions::new(4)
//!         .with_mode(SplitMode::Balanced)
//!         .with_prefix("banner");
//!
//!     let archive = SliceService::new().split_to_archive(bytes, &options).await?;
//!     std::fs::write(&archive.name, &archive.data)?;
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod codec;
pub mod config;
pub mod error;
pub mod server;
pub mod slice;

// Re-export commonly used types
pub use archive::{build_archive, Archive, ARCHIVE_MIME_TYPE};
pub use codec::{
    detect_format, BackgroundColor, DecodedImage, ImageCodec, OutputFormat, RasterCodec,
    SourceFormat,
};
pub use config::{Cli, Command, PlanConfig, ServeConfig, SplitConfig};
pub use error::{ArchiveError, DecodeError, RenderError, SplitError};
pub use server::{create_router, AppState, RouterConfig};
pub use slice::{
    assign_filename, compute_heights, package, summarize, SliceArtifact, SliceService,
    SplitMode, SplitOptions,
};
