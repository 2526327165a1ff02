//! Slice Service for orchestrating a split.
//!
//! The SliceService is the main entry point for split requests. It
//! orchestrates:
//! - Option validation
//! - Decoding the source image
//! - Partitioning the height into slices
//! - Rendering each slice in index order
//! - Optional packaging into an archive
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         SliceService                            │
//! │  ┌─────────────────────────────────────────────────────────┐    │
//! │  │                  process_image()                        │    │
//! │  │  1. Validate options   4. Render slice i at offset(i)   │    │
//! │  │  2. Decode source      5. Name slice i                  │    │
//! │  │  3. Compute heights    6. Collect in order              │    │
//! │  └─────────────────────────────────────────────────────────┘    │
//! │           │                    │                    │           │
//! │           ▼                    ▼                    ▼           │
//! │    ┌────────────┐      ┌──────────────┐    ┌──────────────────┐ │
//! │    │ partition  │      │ RasterCodec  │    │ build_archive    │ │
//! │    └────────────┘      └──────────────┘    └──────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decoding, rendering and packaging are CPU-bound and run on tokio's
//! blocking pool. Slices are rendered one at a time in index order; a
//! failure on any slice aborts the whole request.

use std::sync::Arc;

use bytes::Bytes;
use tokio::task::{spawn_blocking, JoinError};
use tracing::{debug, info};

use crate::archive::{build_archive, Archive};
use crate::codec::{DecodedImage, ImageCodec, RasterCodec, SourceRect};
use crate::error::{ArchiveError, DecodeError, RenderError, SplitError};

use super::naming::assign_filename;
use super::options::{SliceArtifact, SplitOptions};
use super::partition::{compute_heights, slice_windows, SliceWindow};

// =============================================================================
// Progress
// =============================================================================

/// Reported after each slice is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceProgress {
    /// Slices finished so far, including this one
    pub completed: usize,

    /// Total slices in the request
    pub total: usize,

    /// Rows covered by the slice just finished
    pub window: SliceWindow,
}

// =============================================================================
// Slice Service
// =============================================================================

/// Service that turns one image into ordered slice artifacts.
///
/// # Type Parameters
///
/// * `C` - The raster codec (defaults to [`ImageCodec`])
///
/// # Example
///
/// ```ignore
/// use image_splitter::slice::{SliceService, SplitOptions, SplitMode};
///
/// let service = SliceService::new();
/// let options = SplitOptions::new(3).with_mode(SplitMode::Last).with_prefix("banner");
///
/// let artifacts = service.process_image(bytes, &options).await?;
/// for artifact in &artifacts {
///     println!("{}: {}x{}", artifact.filename, artifact.width, artifact.height);
/// }
/// ```
pub struct SliceService<C: RasterCodec = ImageCodec> {
    codec: Arc<C>,
}

impl SliceService<ImageCodec> {
    /// Create a service using the `image` crate codec.
    pub fn new() -> Self {
        Self::with_codec(ImageCodec::new())
    }
}

impl Default for SliceService<ImageCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RasterCodec> Clone for SliceService<C> {
    fn clone(&self) -> Self {
        Self {
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<C: RasterCodec + 'static> SliceService<C> {
    /// Create a service with a custom codec.
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }

    /// Decode the source on the blocking pool.
    pub async fn decode(&self, bytes: Bytes) -> Result<DecodedImage, SplitError> {
        let codec = Arc::clone(&self.codec);
        let image = spawn_blocking(move || codec.decode(&bytes))
            .await
            .map_err(|e| DecodeError::Corrupt {
                message: task_failure("decoder", e),
            })??;
        Ok(image)
    }

    /// Split an encoded image into ordered slice artifacts.
    ///
    /// All-or-nothing: either every slice is returned, or the first error.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the options are invalid or the image has fewer
    ///   rows than requested slices
    /// - `Decode` if the bytes are not a supported image
    /// - `Render` if any slice fails to render
    pub async fn process_image(
        &self,
        bytes: Bytes,
        options: &SplitOptions,
    ) -> Result<Vec<SliceArtifact>, SplitError> {
        self.process_image_with_progress(bytes, options, |_| {})
            .await
    }

    /// Same as [`process_image`](Self::process_image), calling `on_progress`
    /// after each slice.
    pub async fn process_image_with_progress<F>(
        &self,
        bytes: Bytes,
        options: &SplitOptions,
        on_progress: F,
    ) -> Result<Vec<SliceArtifact>, SplitError>
    where
        F: FnMut(SliceProgress),
    {
        options.validate()?;

        let image = self.decode(bytes).await?;
        info!(
            width = image.width(),
            height = image.height(),
            source = image.format().name(),
            slices = options.slice_count,
            mode = %options.mode,
            format = %options.format,
            "Splitting image"
        );

        self.render_slices(&image, options, on_progress).await
    }

    /// Render every slice of an already decoded image.
    pub async fn render_slices<F>(
        &self,
        image: &DecodedImage,
        options: &SplitOptions,
        mut on_progress: F,
    ) -> Result<Vec<SliceArtifact>, SplitError>
    where
        F: FnMut(SliceProgress),
    {
        options.validate()?;

        let total_height = image.height();
        if total_height < options.slice_count {
            return Err(SplitError::invalid(format!(
                "image height {} is smaller than slice count {}",
                total_height, options.slice_count
            )));
        }

        let heights = compute_heights(total_height, options.slice_count, options.mode)?;
        let windows = slice_windows(&heights);
        let total = windows.len();
        let width = image.width();
        let settings = options.render_settings();
        let extension = options.format.extension();

        let mut artifacts = Vec::with_capacity(total);
        for window in windows {
            let codec = Arc::clone(&self.codec);
            let source = image.clone();
            let rect = SourceRect::band(window.offset_y, width, window.height);

            let data = spawn_blocking(move || codec.render(&source, rect, &settings))
                .await
                .map_err(|e| {
                    SplitError::render(
                        window.index,
                        RenderError::Encode {
                            message: task_failure("render", e),
                        },
                    )
                })?
                .map_err(|e| SplitError::render(window.index, e))?;

            let filename = assign_filename(&options.prefix, window.index, total, extension);
            debug!(
                index = window.index,
                offset_y = window.offset_y,
                height = window.height,
                bytes = data.len(),
                filename = %filename,
                "Rendered slice"
            );

            artifacts.push(SliceArtifact {
                index: window.index,
                width,
                height: window.height,
                data,
                filename,
            });

            on_progress(SliceProgress {
                completed: artifacts.len(),
                total,
                window,
            });
        }

        Ok(artifacts)
    }

    /// Split an image and package the slices in one step.
    pub async fn split_to_archive(
        &self,
        bytes: Bytes,
        options: &SplitOptions,
    ) -> Result<Archive, SplitError> {
        let artifacts = self.process_image(bytes, options).await?;
        package(artifacts, options.archive_name()).await
    }
}

/// Build an archive on the blocking pool.
pub async fn package(artifacts: Vec<SliceArtifact>, name: String) -> Result<Archive, SplitError> {
    spawn_blocking(move || build_archive(&artifacts, name))
        .await
        .map_err(|e| ArchiveError::Zip {
            message: task_failure("archive", e),
        })?
}

fn task_failure(task: &str, err: JoinError) -> String {
    if err.is_panic() {
        format!("{} task panicked", task)
    } else {
        format!("{} task was cancelled", task)
    }
}

// =============================================================================
// Tests
// =============================================================================
